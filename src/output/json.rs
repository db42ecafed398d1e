//! JSON output formatter

use serde::Serialize;

/// Render any result as pretty JSON
pub fn to_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Print a result as JSON to stdout
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", to_json(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BatchResult, CheckResult};
    use crate::utils::CheckError;

    #[test]
    fn test_failure_uses_camel_case_fields() {
        let result = CheckResult::failure("example.invalid", &CheckError::domain_not_found("example.invalid"));
        let json = to_json(&result).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["domain"], "example.invalid");
        assert_eq!(value["success"], false);
        assert_eq!(value["errorKind"], "DomainNotFound");
        assert!(value["checkedAt"].is_string());
        assert!(value["certificate"].is_null());
    }

    #[test]
    fn test_batch_shape() {
        let results = vec![CheckResult::failure("a.com", &CheckError::Timeout)];
        let batch = BatchResult::from_results(&results);
        let value: serde_json::Value = serde_json::from_str(&to_json(&batch).unwrap()).unwrap();

        assert_eq!(value["total"], 1);
        assert_eq!(value["results"][0]["status"], "error");
        assert!(value["results"][0].get("daysRemaining").is_none());
    }
}

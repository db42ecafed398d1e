//! Outcome of checking a single domain

use crate::models::certificate::{Certificate, Warning};
use crate::utils::{CheckError, CheckErrorKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of one domain check.
///
/// `certificate` is present iff `success`; `error` and `error_kind` are
/// present iff not.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub domain: String,
    pub success: bool,
    pub certificate: Option<Certificate>,
    pub error: Option<String>,
    pub error_kind: Option<CheckErrorKind>,
    pub checked_at: DateTime<Utc>,
    pub warnings: Vec<String>,
}

impl CheckResult {
    pub fn success(domain: &str, certificate: Certificate, warnings: &[Warning]) -> Self {
        Self {
            domain: domain.to_string(),
            success: true,
            certificate: Some(certificate),
            error: None,
            error_kind: None,
            checked_at: Utc::now(),
            warnings: warnings.iter().map(|w| w.to_string()).collect(),
        }
    }

    pub fn failure(domain: &str, error: &CheckError) -> Self {
        Self {
            domain: domain.to_string(),
            success: false,
            certificate: None,
            error: Some(error.to_string()),
            error_kind: Some(error.kind()),
            checked_at: Utc::now(),
            warnings: Vec::new(),
        }
    }

    /// Successful check of a certificate that is not expired
    pub fn is_healthy(&self) -> bool {
        self.certificate.as_ref().is_some_and(|c| c.is_valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_carries_kind_and_detail() {
        let result = CheckResult::failure("a.com", &CheckError::domain_not_found("a.com"));
        assert!(!result.success);
        assert!(result.certificate.is_none());
        assert!(result.warnings.is_empty());
        assert_eq!(result.error_kind, Some(CheckErrorKind::DomainNotFound));
        assert_eq!(
            result.error.as_deref(),
            Some("Domain not found (DNS error): a.com")
        );
        assert!(!result.is_healthy());
    }

    #[test]
    fn test_serializes_camel_case() {
        let result = CheckResult::failure("a.com", &CheckError::Timeout);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["errorKind"], "Timeout");
        assert!(json.get("checkedAt").is_some());
        assert!(json["certificate"].is_null());
    }
}

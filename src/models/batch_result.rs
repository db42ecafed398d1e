//! Multi-domain check report

use crate::models::check_result::CheckResult;
use crate::utils::CheckErrorKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status label of one domain in a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    Valid,
    Invalid,
    Error,
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchStatus::Valid => write!(f, "Valid"),
            BatchStatus::Invalid => write!(f, "Invalid"),
            BatchStatus::Error => write!(f, "Error"),
        }
    }
}

/// Lightweight per-domain summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchEntry {
    pub domain: String,
    pub status: BatchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_remaining: Option<i64>,
    /// Expiry date as `YYYY-MM-DD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,
    #[serde(default)]
    pub expiring_soon: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<CheckErrorKind>,
}

impl From<&CheckResult> for BatchEntry {
    fn from(result: &CheckResult) -> Self {
        match &result.certificate {
            Some(cert) if result.success => BatchEntry {
                domain: result.domain.clone(),
                status: if cert.is_valid {
                    BatchStatus::Valid
                } else {
                    BatchStatus::Invalid
                },
                days_remaining: Some(cert.days_until_expiry),
                expires: Some(cert.expiry_date()),
                expiring_soon: cert.is_expiring_soon,
                error: None,
                error_kind: None,
            },
            _ => BatchEntry {
                domain: result.domain.clone(),
                status: BatchStatus::Error,
                days_remaining: None,
                expires: None,
                expiring_soon: false,
                error: result.error.clone(),
                error_kind: result.error_kind,
            },
        }
    }
}

/// Aggregation over N domains, in input order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub total: usize,
    pub results: Vec<BatchEntry>,
}

/// Counts derived from a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub errors: usize,
    pub expiring_soon: usize,
}

impl BatchResult {
    pub fn from_results(results: &[CheckResult]) -> Self {
        Self {
            total: results.len(),
            results: results.iter().map(BatchEntry::from).collect(),
        }
    }

    pub fn summary(&self) -> BatchSummary {
        let count = |status: BatchStatus| self.results.iter().filter(|r| r.status == status).count();
        BatchSummary {
            total: self.total,
            valid: count(BatchStatus::Valid),
            invalid: count(BatchStatus::Invalid),
            errors: count(BatchStatus::Error),
            expiring_soon: self.results.iter().filter(|r| r.expiring_soon).count(),
        }
    }

    /// Entries that need attention: invalid, errored, or expiring soon
    pub fn issues(&self) -> impl Iterator<Item = &BatchEntry> {
        self.results
            .iter()
            .filter(|r| r.status != BatchStatus::Valid || r.expiring_soon)
    }

    /// Every domain was reached and holds an unexpired certificate
    pub fn all_valid(&self) -> bool {
        self.results.iter().all(|r| r.status == BatchStatus::Valid)
    }
}

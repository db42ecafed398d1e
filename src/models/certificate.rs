//! Certificate information types

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Leaf certificate as observed at check time.
///
/// Derived fields (`days_until_expiry`, `is_expired`, `is_expiring_soon`,
/// `is_valid`) are fixed when the record is built and never recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    /// Name the check was run against
    pub domain: String,
    /// Not expired at check time
    pub is_valid: bool,
    /// Issuer common name, or "Unknown"
    pub issuer: String,
    /// Subject common name, or the queried domain
    pub subject: String,
    /// Not valid before (UTC)
    pub not_before: NaiveDateTime,
    /// Not valid after (UTC)
    pub not_after: NaiveDateTime,
    /// Whole days until expiry, floored; negative once expired
    pub days_until_expiry: i64,
    pub is_expired: bool,
    pub is_expiring_soon: bool,
    /// Public key size in bits
    pub key_size: u32,
    pub signature_algorithm: String,
    /// DNS names from the Subject Alternative Name extension
    pub san_list: Vec<String>,
    /// Display-only serial: `0x` prefixed hex, at most 16 characters
    pub serial_number: String,
    /// SHA-256 over the DER encoding, lowercase hex
    pub fingerprint_sha256: String,
}

impl Certificate {
    /// Expiry date as `YYYY-MM-DD`
    pub fn expiry_date(&self) -> String {
        self.not_after.format("%Y-%m-%d").to_string()
    }

    /// Length of the validity window in days
    pub fn validity_period_days(&self) -> i64 {
        (self.not_after - self.not_before).num_days()
    }
}

/// How urgent a warning is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Expired,
    Critical,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Expired => write!(f, "expired"),
            Severity::Critical => write!(f, "critical"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A finding raised against an evaluated certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    Expired { days_ago: i64 },
    ExpiresVerySoon { days: i64 },
    ExpiringSoon { days: i64 },
    WeakKey { bits: u32 },
}

impl Warning {
    pub fn severity(&self) -> Severity {
        match self {
            Warning::Expired { .. } => Severity::Expired,
            Warning::ExpiresVerySoon { .. } => Severity::Critical,
            Warning::ExpiringSoon { .. } | Warning::WeakKey { .. } => Severity::Warning,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::Expired { days_ago } => {
                write!(f, "Certificate EXPIRED {} days ago", days_ago)
            }
            Warning::ExpiresVerySoon { days } => {
                write!(f, "Certificate expires in {} days (CRITICAL)", days)
            }
            Warning::ExpiringSoon { days } => write!(f, "Certificate expires in {} days", days),
            Warning::WeakKey { .. } => write!(f, "Weak key size (< 2048 bits)"),
        }
    }
}

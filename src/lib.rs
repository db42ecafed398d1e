//! SSL Guardian Library
//!
//! Inspects the TLS certificate a host presents and reports on it:
//! - Fetching the leaf certificate over a verified TLS handshake
//! - Evaluating validity window, key strength and identity fields
//! - Warning generation for expired, expiring and weak certificates
//! - Concurrent, order-preserving batch checks
//!
//! Every failure is captured per domain as a [`CheckResult`] with a
//! [`CheckErrorKind`]; checking never panics or aborts a batch.
//!
//! # Usage
//!
//! ```rust,no_run
//! use ssl_guardian::SslChecker;
//!
//! #[tokio::main]
//! async fn main() {
//!     let checker = SslChecker::new();
//!     let result = checker.check_one("example.com").await;
//!     println!("{} valid: {}", result.domain, result.is_healthy());
//! }
//! ```

pub mod checker;
pub mod checks;
pub mod cli;
pub mod config;
pub mod models;
pub mod output;
pub mod utils;

// Re-export commonly used types
pub use checker::{CheckOptions, SslChecker};
pub use checks::{CertificateEvaluator, CertificateSource, TlsFetcher};
pub use config::Settings;
pub use models::{BatchResult, BatchStatus, Certificate, CheckResult, Warning};
pub use utils::{CheckError, CheckErrorKind, GuardianError, Result};

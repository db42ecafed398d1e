//! Data models for SSL Guardian
//!
//! This module contains all the data structures returned by the checker.

pub mod batch_result;
pub mod certificate;
pub mod check_result;

pub use batch_result::{BatchEntry, BatchResult, BatchStatus, BatchSummary};
pub use certificate::{Certificate, Severity, Warning};
pub use check_result::CheckResult;

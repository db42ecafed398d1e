//! Utility modules for SSL Guardian
//!
//! This module contains error types, progress indicators, and other utilities.

pub mod error;
pub mod progress;

pub use error::{CheckError, CheckErrorKind, ConfigError, GuardianError, Result};
pub use progress::create_progress_bar;

//! Custom error types for SSL Guardian
//!
//! This module defines domain-specific error types using `thiserror` for
//! the failure modes of a certificate check and of the surrounding tooling.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Top-level error type for the library and the command-line caller
#[derive(Error, Debug)]
pub enum GuardianError {
    #[error("Certificate check error: {0}")]
    Check(#[from] CheckError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a single-domain check failed.
///
/// Every variant maps onto a stable [`CheckErrorKind`] so callers never have
/// to match on the rendered message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    #[error("Connection timeout")]
    Timeout,

    #[error("Domain not found (DNS error): {domain}")]
    DomainNotFound { domain: String },

    #[error("SSL error: {message}")]
    Tls { message: String },

    #[error("Certificate parse error: {message}")]
    Parse { message: String },

    #[error("Unexpected error: {message}")]
    Unexpected { message: String },
}

impl CheckError {
    pub fn domain_not_found(domain: impl Into<String>) -> Self {
        CheckError::DomainNotFound {
            domain: domain.into(),
        }
    }

    pub fn tls(message: impl Into<String>) -> Self {
        CheckError::Tls {
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        CheckError::Parse {
            message: message.into(),
        }
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        CheckError::Unexpected {
            message: message.into(),
        }
    }

    /// The discrete failure kind
    pub fn kind(&self) -> CheckErrorKind {
        match self {
            CheckError::Timeout => CheckErrorKind::Timeout,
            CheckError::DomainNotFound { .. } => CheckErrorKind::DomainNotFound,
            CheckError::Tls { .. } => CheckErrorKind::TlsError,
            CheckError::Parse { .. } => CheckErrorKind::ParseError,
            CheckError::Unexpected { .. } => CheckErrorKind::UnexpectedError,
        }
    }
}

/// Stable identifier for a failed check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckErrorKind {
    Timeout,
    DomainNotFound,
    TlsError,
    ParseError,
    UnexpectedError,
}

impl CheckErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckErrorKind::Timeout => "Timeout",
            CheckErrorKind::DomainNotFound => "DomainNotFound",
            CheckErrorKind::TlsError => "TlsError",
            CheckErrorKind::ParseError => "ParseError",
            CheckErrorKind::UnexpectedError => "UnexpectedError",
        }
    }

    /// JSON-RPC error code an agent front end reports for this kind.
    ///
    /// Application codes live in the -32000..-32099 band; anything the
    /// caller cannot attribute to the remote host is an internal error.
    pub fn rpc_code(&self) -> i32 {
        match self {
            CheckErrorKind::TlsError => -32001,
            CheckErrorKind::ParseError => -32002,
            CheckErrorKind::DomainNotFound => -32003,
            CheckErrorKind::Timeout => -32004,
            CheckErrorKind::UnexpectedError => -32603,
        }
    }
}

impl fmt::Display for CheckErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse configuration: {message}")]
    ParseError { message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias using GuardianError
pub type Result<T> = std::result::Result<T, GuardianError>;

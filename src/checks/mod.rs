//! Check modules for SSL Guardian
//!
//! This module contains the certificate fetcher, the evaluator and the batch
//! coordinator.

pub mod batch;
pub mod evaluator;
pub mod fetcher;

pub use batch::{check_all, read_domains_file, DEFAULT_PARALLEL};
pub use evaluator::{display_serial, generate_warnings, CertificateEvaluator, DEFAULT_WARNING_DAYS};
pub use fetcher::{load_pem_certificates, CertificateSource, TlsFetcher};

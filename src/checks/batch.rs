//! Batch coordination
//!
//! Fans a list of domains out to the checker with bounded concurrency.
//! Results come back in input order whatever order the checks finish in.

use crate::checker::{CheckOptions, SslChecker};
use crate::checks::CertificateSource;
use crate::models::CheckResult;
use crate::utils::Result;
use futures::stream::{self, StreamExt};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Default number of checks in flight at once
pub const DEFAULT_PARALLEL: usize = 10;

/// Check every domain, at most `parallel` at a time.
///
/// `on_result` sees each result as it is yielded, in input order.
pub async fn check_all<S, F>(
    checker: &SslChecker<S>,
    domains: &[String],
    options: &CheckOptions,
    parallel: usize,
    mut on_result: F,
) -> Vec<CheckResult>
where
    S: CertificateSource,
    F: FnMut(&CheckResult),
{
    stream::iter(domains)
        .map(|domain| checker.check_one_with(domain, options))
        .buffered(parallel.max(1))
        .inspect(|result| on_result(result))
        .collect()
        .await
}

/// Read domains from a file, one per line, skipping blanks and `#` comments
pub fn read_domains_file(path: &Path) -> Result<Vec<String>> {
    let reader = BufReader::new(File::open(path)?);
    let mut domains = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        domains.push(trimmed.to_string());
    }

    Ok(domains)
}

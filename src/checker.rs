//! Certificate checker service
//!
//! `SslChecker` wires the fetcher and the evaluator together and is the entry
//! point for callers: `check_one` for a single domain, `check_many` for a
//! batch. Every failure is caught at the single-domain boundary and returned
//! as a failed [`CheckResult`]; nothing here prints.

use crate::checks::batch::{self, DEFAULT_PARALLEL};
use crate::checks::{generate_warnings, CertificateEvaluator, CertificateSource, TlsFetcher};
use crate::checks::evaluator::DEFAULT_WARNING_DAYS;
use crate::config::Settings;
use crate::models::{BatchResult, Certificate, CheckResult, Warning};
use crate::utils::{CheckError, ConfigError};
use std::future::Future;
use std::time::Duration;
use tokio::runtime::{Handle, RuntimeFlavor};

pub const DEFAULT_PORT: u16 = 443;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Per-call parameters of a check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOptions {
    pub port: u16,
    /// Applies to each domain separately
    pub timeout: Duration,
    pub warning_days: i64,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT,
            warning_days: DEFAULT_WARNING_DAYS,
        }
    }
}

impl CheckOptions {
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_warning_days(mut self, warning_days: i64) -> Self {
        self.warning_days = warning_days;
        self
    }
}

/// Checks TLS certificates through a [`CertificateSource`]
pub struct SslChecker<S = TlsFetcher> {
    source: S,
    options: CheckOptions,
    parallel: usize,
}

impl SslChecker<TlsFetcher> {
    /// Network checker with default options
    pub fn new() -> Self {
        Self::with_source(TlsFetcher::new())
    }

    /// Network checker configured from settings
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let fetcher = match &settings.check.extra_ca_file {
            Some(path) => TlsFetcher::with_extra_roots(path)?,
            None => TlsFetcher::new(),
        };

        Ok(Self::with_source(fetcher)
            .with_options(settings.check_options())
            .with_parallel(settings.batch.parallel))
    }
}

impl Default for SslChecker<TlsFetcher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: CertificateSource> SslChecker<S> {
    pub fn with_source(source: S) -> Self {
        Self {
            source,
            options: CheckOptions::default(),
            parallel: DEFAULT_PARALLEL,
        }
    }

    /// Replace the default options used by `check_one` and `check_many`
    pub fn with_options(mut self, options: CheckOptions) -> Self {
        self.options = options;
        self
    }

    /// Bound the number of domains checked concurrently in a batch
    pub fn with_parallel(mut self, parallel: usize) -> Self {
        self.parallel = parallel.max(1);
        self
    }

    pub fn options(&self) -> &CheckOptions {
        &self.options
    }

    pub fn parallel(&self) -> usize {
        self.parallel
    }

    /// Check one domain with the default options
    pub async fn check_one(&self, domain: &str) -> CheckResult {
        self.check_one_with(domain, &self.options).await
    }

    /// Check one domain with explicit options
    pub async fn check_one_with(&self, domain: &str, options: &CheckOptions) -> CheckResult {
        match self.inspect(domain, options).await {
            Ok((certificate, warnings)) => CheckResult::success(domain, certificate, &warnings),
            Err(e) => CheckResult::failure(domain, &e),
        }
    }

    /// Check a list of domains; the report preserves input order
    pub async fn check_many(&self, domains: &[String]) -> BatchResult {
        self.check_many_with(domains, &self.options).await
    }

    pub async fn check_many_with(&self, domains: &[String], options: &CheckOptions) -> BatchResult {
        let results = batch::check_all(self, domains, options, self.parallel, |_| {}).await;
        BatchResult::from_results(&results)
    }

    /// Full per-domain results of a batch, in input order
    pub async fn check_all<F>(&self, domains: &[String], on_result: F) -> Vec<CheckResult>
    where
        F: FnMut(&CheckResult),
    {
        batch::check_all(self, domains, &self.options, self.parallel, on_result).await
    }

    /// Blocking `check_one` for synchronous callers.
    ///
    /// Inside a multi-threaded tokio runtime the check runs on the current
    /// worker through `block_in_place`; inside a current-thread runtime it
    /// cannot block and returns an `UnexpectedError` result instead.
    pub fn check_one_blocking(&self, domain: &str) -> CheckResult {
        match block_on(self.check_one(domain)) {
            Ok(result) => result,
            Err(e) => CheckResult::failure(domain, &e),
        }
    }

    /// Blocking `check_many`; same runtime rules as [`Self::check_one_blocking`]
    pub fn check_many_blocking(&self, domains: &[String]) -> BatchResult {
        match block_on(self.check_many(domains)) {
            Ok(batch) => batch,
            Err(e) => {
                let results: Vec<CheckResult> =
                    domains.iter().map(|d| CheckResult::failure(d, &e)).collect();
                BatchResult::from_results(&results)
            }
        }
    }

    async fn inspect(
        &self,
        domain: &str,
        options: &CheckOptions,
    ) -> Result<(Certificate, Vec<Warning>), CheckError> {
        let der = self
            .source
            .fetch(domain, options.port, options.timeout)
            .await?;
        let certificate = CertificateEvaluator::new(options.warning_days).evaluate(&der, domain)?;
        let warnings = generate_warnings(&certificate);
        Ok((certificate, warnings))
    }
}

/// Drive `future` to completion from synchronous code
fn block_on<F: Future>(future: F) -> Result<F::Output, CheckError> {
    match Handle::try_current() {
        Ok(handle) => match handle.runtime_flavor() {
            RuntimeFlavor::MultiThread => {
                Ok(tokio::task::block_in_place(|| handle.block_on(future)))
            }
            _ => Err(CheckError::unexpected(
                "blocking check called from a current-thread async runtime",
            )),
        },
        Err(_) => {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| CheckError::unexpected(format!("failed to start runtime: {}", e)))?;
            Ok(rt.block_on(future))
        }
    }
}

//! Checker and batch tests using an in-memory certificate source

use ssl_guardian::checks::CertificateSource;
use ssl_guardian::models::BatchStatus;
use ssl_guardian::utils::{CheckError, CheckErrorKind};
use ssl_guardian::{CheckOptions, SslChecker};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const LOCALHOST_EC: &[u8] = include_bytes!("fixtures/localhost_ec.der");
const EXPIRED_RSA: &[u8] = include_bytes!("fixtures/leaf_rsa2048.der");

#[derive(Clone)]
enum Reply {
    Cert(&'static [u8]),
    Fail(CheckError),
}

/// Serves canned replies after a per-domain delay
#[derive(Default)]
struct StubSource {
    replies: HashMap<String, (Duration, Reply)>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    seen: Mutex<Vec<(String, u16, Duration)>>,
}

impl StubSource {
    fn reply(mut self, domain: &str, delay_ms: u64, reply: Reply) -> Self {
        self.replies
            .insert(domain.to_string(), (Duration::from_millis(delay_ms), reply));
        self
    }
}

impl CertificateSource for StubSource {
    async fn fetch(
        &self,
        domain: &str,
        port: u16,
        timeout: Duration,
    ) -> Result<Vec<u8>, CheckError> {
        self.seen
            .lock()
            .unwrap()
            .push((domain.to_string(), port, timeout));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let (delay, reply) = self
            .replies
            .get(domain)
            .cloned()
            .unwrap_or((Duration::ZERO, Reply::Fail(CheckError::domain_not_found(domain))));
        tokio::time::sleep(delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        match reply {
            Reply::Cert(der) => Ok(der.to_vec()),
            Reply::Fail(e) => Err(e),
        }
    }
}

fn domains(names: &[&str]) -> Vec<String> {
    names.iter().map(|d| d.to_string()).collect()
}

#[tokio::test]
async fn test_check_one_success() {
    let checker =
        SslChecker::with_source(StubSource::default().reply("localhost", 0, Reply::Cert(LOCALHOST_EC)));

    let result = checker.check_one("localhost").await;

    assert!(result.success);
    assert!(result.error.is_none());
    assert!(result.error_kind.is_none());
    let cert = result.certificate.as_ref().unwrap();
    assert_eq!(cert.domain, "localhost");
    assert_eq!(cert.subject, "localhost");
    assert_eq!(cert.issuer, "Guardian Test CA");
    assert_eq!(cert.key_size, 256);
    assert!(cert.is_valid);
    assert!(!cert.is_expiring_soon);
    assert_eq!(result.warnings, vec!["Weak key size (< 2048 bits)".to_string()]);
    assert!(result.is_healthy());
}

#[tokio::test]
async fn test_check_one_expired_certificate() {
    let checker =
        SslChecker::with_source(StubSource::default().reply("test.example.com", 0, Reply::Cert(EXPIRED_RSA)));

    let result = checker.check_one("test.example.com").await;

    assert!(result.success);
    assert!(!result.is_healthy());
    let cert = result.certificate.as_ref().unwrap();
    assert!(cert.is_expired);
    assert!(!cert.is_expiring_soon);
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].starts_with("Certificate EXPIRED"));
}

#[tokio::test]
async fn test_check_one_failure_is_captured() {
    let checker = SslChecker::with_source(StubSource::default().reply(
        "slow.example.com",
        0,
        Reply::Fail(CheckError::Timeout),
    ));

    let result = checker.check_one("slow.example.com").await;

    assert!(!result.success);
    assert!(result.certificate.is_none());
    assert_eq!(result.error.as_deref(), Some("Connection timeout"));
    assert_eq!(result.error_kind, Some(CheckErrorKind::Timeout));
    assert!(result.warnings.is_empty());
}

#[tokio::test]
async fn test_garbage_der_is_parse_error() {
    let checker = SslChecker::with_source(
        StubSource::default().reply("junk.example.com", 0, Reply::Cert(b"not a certificate")),
    );

    let result = checker.check_one("junk.example.com").await;

    assert!(!result.success);
    assert_eq!(result.error_kind, Some(CheckErrorKind::ParseError));
}

#[tokio::test]
async fn test_options_reach_the_source() {
    let source = Arc::new(StubSource::default().reply("localhost", 0, Reply::Cert(LOCALHOST_EC)));
    let options = CheckOptions::default()
        .with_port(8443)
        .with_timeout(Duration::from_secs(3))
        .with_warning_days(100_000);
    let checker = SslChecker::with_source(SharedSource(source.clone())).with_options(options);

    let result = checker.check_one("localhost").await;

    // A window this wide flags the certificate as expiring soon
    assert!(result.certificate.as_ref().unwrap().is_expiring_soon);
    let seen = source.seen.lock().unwrap().clone();
    assert_eq!(seen, vec![("localhost".to_string(), 8443, Duration::from_secs(3))]);
}

#[tokio::test]
async fn test_check_many_preserves_input_order() {
    // a.com fails slowly, b.com answers immediately
    let source = StubSource::default()
        .reply("a.com", 150, Reply::Fail(CheckError::domain_not_found("a.com")))
        .reply("b.com", 0, Reply::Cert(LOCALHOST_EC));
    let checker = SslChecker::with_source(source);

    let batch = checker.check_many(&domains(&["a.com", "b.com"])).await;

    assert_eq!(batch.total, 2);
    assert_eq!(batch.results[0].domain, "a.com");
    assert_eq!(batch.results[0].status, BatchStatus::Error);
    assert_eq!(batch.results[0].error_kind, Some(CheckErrorKind::DomainNotFound));
    assert!(batch.results[0].days_remaining.is_none());
    assert_eq!(batch.results[1].domain, "b.com");
    assert_eq!(batch.results[1].status, BatchStatus::Valid);
    assert!(batch.results[1].days_remaining.unwrap() > 0);
    assert_eq!(batch.results[1].expires.as_deref(), Some("2099-12-31"));

    let summary = batch.summary();
    assert_eq!(summary.total, 2);
    assert_eq!(summary.valid, 1);
    assert_eq!(summary.errors, 1);
    assert!(!batch.all_valid());
}

#[tokio::test]
async fn test_check_many_keeps_duplicates() {
    let checker = SslChecker::with_source(
        StubSource::default().reply("localhost", 0, Reply::Cert(LOCALHOST_EC)),
    );

    let batch = checker
        .check_many(&domains(&["localhost", "localhost"]))
        .await;

    assert_eq!(batch.total, 2);
    assert!(batch.all_valid());
}

#[tokio::test]
async fn test_check_many_empty() {
    let checker = SslChecker::with_source(StubSource::default());
    let batch = checker.check_many(&[]).await;
    assert_eq!(batch.total, 0);
    assert!(batch.results.is_empty());
}

#[tokio::test]
async fn test_parallelism_is_bounded() {
    let names: Vec<String> = (0..8).map(|i| format!("host{}.example.com", i)).collect();
    let mut source = StubSource::default();
    for name in &names {
        source = source.reply(name, 40, Reply::Cert(LOCALHOST_EC));
    }
    let source = Arc::new(source);
    let checker = SslChecker::with_source(SharedSource(source.clone())).with_parallel(2);

    let mut order = Vec::new();
    let results = checker
        .check_all(&names, |result| order.push(result.domain.clone()))
        .await;

    assert_eq!(results.len(), 8);
    assert_eq!(order, names);
    let peak = source.max_in_flight.load(Ordering::SeqCst);
    assert!(peak <= 2, "peak concurrency was {}", peak);
    assert!(peak >= 1);
}

#[tokio::test]
async fn test_repeat_checks_agree() {
    let checker = SslChecker::with_source(
        StubSource::default().reply("localhost", 0, Reply::Cert(LOCALHOST_EC)),
    );

    let first = checker.check_one("localhost").await;
    let second = checker.check_one("localhost").await;

    assert_eq!(first.certificate, second.certificate);
    assert_eq!(first.warnings, second.warnings);
}

#[test]
fn test_check_one_blocking() {
    let checker = SslChecker::with_source(
        StubSource::default().reply("localhost", 0, Reply::Cert(LOCALHOST_EC)),
    );

    let result = checker.check_one_blocking("localhost");
    assert!(result.success);

    let batch = checker.check_many_blocking(&domains(&["localhost", "missing.example"]));
    assert_eq!(batch.results[0].status, BatchStatus::Valid);
    assert_eq!(batch.results[1].status, BatchStatus::Error);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_blocking_inside_multi_thread_runtime() {
    let checker = SslChecker::with_source(
        StubSource::default().reply("localhost", 0, Reply::Cert(LOCALHOST_EC)),
    );

    let result = checker.check_one_blocking("localhost");
    assert!(result.success);

    let batch = checker.check_many_blocking(&domains(&["localhost"]));
    assert!(batch.all_valid());
}

#[tokio::test]
async fn test_blocking_inside_current_thread_runtime_fails_cleanly() {
    let checker = SslChecker::with_source(
        StubSource::default().reply("localhost", 0, Reply::Cert(LOCALHOST_EC)),
    );

    let result = checker.check_one_blocking("localhost");
    assert!(!result.success);
    assert_eq!(result.error_kind, Some(CheckErrorKind::UnexpectedError));

    let batch = checker.check_many_blocking(&domains(&["a.com", "b.com"]));
    assert_eq!(batch.total, 2);
    assert!(batch
        .results
        .iter()
        .all(|r| r.error_kind == Some(CheckErrorKind::UnexpectedError)));
}

/// Lets a test keep a handle on the source after the checker takes it
struct SharedSource(Arc<StubSource>);

impl CertificateSource for SharedSource {
    async fn fetch(
        &self,
        domain: &str,
        port: u16,
        timeout: Duration,
    ) -> Result<Vec<u8>, CheckError> {
        self.0.fetch(domain, port, timeout).await
    }
}

//! Integration tests for the TLS fetcher against a local rustls server

use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use rustls::{RootCertStore, ServerConfig};
use ssl_guardian::checks::{CertificateSource, TlsFetcher};
use ssl_guardian::utils::CheckErrorKind;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;

const CA_DER: &[u8] = include_bytes!("fixtures/ca.der");
const LEAF_DER: &[u8] = include_bytes!("fixtures/localhost_ec.der");
const LEAF_KEY_DER: &[u8] = include_bytes!("fixtures/localhost_ec.key.der");

fn install_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// Serve the localhost fixture certificate until the test ends
async fn spawn_tls_server() -> SocketAddr {
    install_provider();

    let config = ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(
            vec![CertificateDer::from(LEAF_DER.to_vec())],
            PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(LEAF_KEY_DER.to_vec())),
        )
        .unwrap();
    let acceptor = TlsAcceptor::from(Arc::new(config));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            let acceptor = acceptor.clone();
            tokio::spawn(async move {
                let _ = acceptor.accept(stream).await;
            });
        }
    });

    addr
}

/// Accept TCP connections and never speak
async fn spawn_silent_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });

    addr
}

fn trusting_test_ca() -> TlsFetcher {
    install_provider();
    let mut roots = RootCertStore::empty();
    roots.add(CertificateDer::from(CA_DER.to_vec())).unwrap();
    TlsFetcher::with_roots(roots)
}

#[tokio::test]
async fn test_fetch_returns_leaf_from_trusted_server() {
    let addr = spawn_tls_server().await;
    let fetcher = trusting_test_ca();

    let der = fetcher
        .fetch("localhost", addr.port(), Duration::from_secs(5))
        .await
        .unwrap();

    assert_eq!(der, LEAF_DER);
}

#[tokio::test]
async fn test_untrusted_chain_is_tls_error() {
    let addr = spawn_tls_server().await;
    let fetcher = TlsFetcher::new();

    let err = fetcher
        .fetch("localhost", addr.port(), Duration::from_secs(5))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), CheckErrorKind::TlsError);
}

#[tokio::test]
async fn test_name_mismatch_is_tls_error() {
    let addr = spawn_tls_server().await;
    let fetcher = trusting_test_ca();

    // Certificate only names "localhost"
    let err = fetcher
        .fetch("127.0.0.1", addr.port(), Duration::from_secs(5))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), CheckErrorKind::TlsError);
}

#[tokio::test]
async fn test_silent_server_times_out() {
    let addr = spawn_silent_server().await;
    let fetcher = trusting_test_ca();

    let started = std::time::Instant::now();
    let err = fetcher
        .fetch("localhost", addr.port(), Duration::from_secs(1))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), CheckErrorKind::Timeout);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_refused_connection_is_unexpected() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    };
    let fetcher = trusting_test_ca();

    let err = fetcher
        .fetch("127.0.0.1", port, Duration::from_secs(5))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), CheckErrorKind::UnexpectedError);
}

#[tokio::test]
async fn test_unresolvable_domain_is_domain_not_found() {
    let fetcher = trusting_test_ca();

    let err = fetcher
        .fetch("no-such-host.invalid", 443, Duration::from_secs(10))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), CheckErrorKind::DomainNotFound);
    assert!(err.to_string().contains("no-such-host.invalid"));
}

#[tokio::test]
#[ignore = "requires internet access"]
async fn test_fetch_public_site() {
    let fetcher = TlsFetcher::new();
    let der = fetcher
        .fetch("google.com", 443, Duration::from_secs(10))
        .await
        .unwrap();
    assert!(!der.is_empty());
}

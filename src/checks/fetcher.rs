//! TLS certificate fetcher
//!
//! Resolves a domain, connects over TCP, completes a verified TLS handshake
//! with SNI set to the domain, and hands back the DER bytes of the leaf
//! certificate. Untrusted chains fail the handshake and are reported as TLS
//! errors; the peer certificate is never read from an unverified session.

use crate::utils::{CheckError, ConfigError};
use rustls::pki_types::{CertificateDer, ServerName};
use rustls::{ClientConfig, RootCertStore};
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tracing::debug;

/// Anything that can produce the leaf certificate a domain presents
pub trait CertificateSource: Send + Sync {
    /// DER bytes of the leaf certificate served at `domain:port`.
    ///
    /// `timeout` bounds the whole exchange: resolution, connect and handshake.
    fn fetch(
        &self,
        domain: &str,
        port: u16,
        timeout: Duration,
    ) -> impl Future<Output = Result<Vec<u8>, CheckError>> + Send;
}

/// Fetches certificates over the network with rustls
#[derive(Clone)]
pub struct TlsFetcher {
    connector: TlsConnector,
}

impl Default for TlsFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl TlsFetcher {
    /// Create a fetcher trusting the bundled Mozilla root set
    pub fn new() -> Self {
        Self::with_roots(mozilla_roots())
    }

    /// Create a fetcher trusting exactly `roots`
    pub fn with_roots(roots: RootCertStore) -> Self {
        // Ensure a default crypto provider is installed
        let _ = rustls::crypto::ring::default_provider().install_default();

        let config = ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth();

        Self {
            connector: TlsConnector::from(Arc::new(config)),
        }
    }

    /// Create a fetcher trusting the Mozilla roots plus the PEM anchors in `path`
    pub fn with_extra_roots(path: &Path) -> Result<Self, ConfigError> {
        let mut roots = mozilla_roots();
        for cert in load_pem_certificates(path)? {
            roots.add(cert).map_err(|e| ConfigError::InvalidValue {
                key: "check.extra_ca_file".to_string(),
                message: format!("{}: {}", path.display(), e),
            })?;
        }
        Ok(Self::with_roots(roots))
    }

    async fn fetch_leaf(&self, domain: &str, port: u16) -> Result<Vec<u8>, CheckError> {
        let addrs = resolve(domain, port).await?;

        let server_name = ServerName::try_from(domain.to_string())
            .map_err(|_| CheckError::tls(format!("invalid server name: {}", domain)))?;

        let tcp = connect(&addrs).await?;
        debug!(domain, peer = ?tcp.peer_addr().ok(), "TCP connected");

        let mut tls = self
            .connector
            .connect(server_name, tcp)
            .await
            .map_err(classify_handshake_error)?;

        let leaf = {
            let (_, conn) = tls.get_ref();
            debug!(
                domain,
                protocol = ?conn.protocol_version(),
                chain_len = conn.peer_certificates().map_or(0, |c| c.len()),
                "TLS handshake complete"
            );
            conn.peer_certificates()
                .and_then(|certs| certs.first())
                .map(|cert| cert.as_ref().to_vec())
        };

        // close_notify; the socket itself is released when `tls` drops
        let _ = tls.shutdown().await;

        leaf.ok_or_else(|| CheckError::tls("server presented no certificate"))
    }
}

impl CertificateSource for TlsFetcher {
    async fn fetch(
        &self,
        domain: &str,
        port: u16,
        timeout: Duration,
    ) -> Result<Vec<u8>, CheckError> {
        match tokio::time::timeout(timeout, self.fetch_leaf(domain, port)).await {
            Ok(result) => {
                if let Err(e) = &result {
                    debug!(domain, port, kind = %e.kind(), error = %e, "certificate fetch failed");
                }
                result
            }
            Err(_) => {
                debug!(domain, port, timeout_secs = timeout.as_secs(), "certificate fetch timed out");
                Err(CheckError::Timeout)
            }
        }
    }
}

fn mozilla_roots() -> RootCertStore {
    RootCertStore::from_iter(webpki_roots::TLS_SERVER_ROOTS.iter().cloned())
}

/// Read every `CERTIFICATE` block from a PEM file
pub fn load_pem_certificates(path: &Path) -> Result<Vec<CertificateDer<'static>>, ConfigError> {
    let content = std::fs::read(path).map_err(|_| ConfigError::FileNotFound {
        path: path.display().to_string(),
    })?;

    let blocks = ::pem::parse_many(&content).map_err(|e| ConfigError::ParseError {
        message: format!("{}: {}", path.display(), e),
    })?;

    let certs: Vec<CertificateDer<'static>> = blocks
        .into_iter()
        .filter(|block| block.tag() == "CERTIFICATE")
        .map(|block| CertificateDer::from(block.into_contents()))
        .collect();

    if certs.is_empty() {
        return Err(ConfigError::InvalidValue {
            key: "check.extra_ca_file".to_string(),
            message: format!("no certificates found in {}", path.display()),
        });
    }

    Ok(certs)
}

async fn resolve(domain: &str, port: u16) -> Result<Vec<SocketAddr>, CheckError> {
    let addrs: Vec<SocketAddr> = tokio::net::lookup_host((domain, port))
        .await
        .map_err(|e| {
            debug!(domain, error = %e, "DNS resolution failed");
            CheckError::domain_not_found(domain)
        })?
        .collect();

    if addrs.is_empty() {
        return Err(CheckError::domain_not_found(domain));
    }
    Ok(addrs)
}

/// Connect to the first address that accepts
async fn connect(addrs: &[SocketAddr]) -> Result<TcpStream, CheckError> {
    let mut last_error = None;

    for addr in addrs {
        match TcpStream::connect(addr).await {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                debug!(%addr, error = %e, "TCP connect failed");
                last_error = Some(e);
            }
        }
    }

    Err(match last_error {
        Some(e) => classify_connect_error(e),
        None => CheckError::unexpected("no addresses to connect to"),
    })
}

fn classify_connect_error(err: io::Error) -> CheckError {
    match err.kind() {
        io::ErrorKind::TimedOut => CheckError::Timeout,
        _ => CheckError::unexpected(err.to_string()),
    }
}

fn classify_handshake_error(err: io::Error) -> CheckError {
    let from_rustls = err
        .get_ref()
        .is_some_and(|inner| inner.is::<rustls::Error>());

    match err.kind() {
        io::ErrorKind::TimedOut => CheckError::Timeout,
        _ if from_rustls => CheckError::tls(err.to_string()),
        io::ErrorKind::InvalidData => CheckError::tls(err.to_string()),
        io::ErrorKind::UnexpectedEof => {
            CheckError::tls("peer closed connection during handshake")
        }
        _ => CheckError::unexpected(err.to_string()),
    }
}

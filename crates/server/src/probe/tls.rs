//! Raw TLS handshake for certificate expiry inspection, independent of the
//! HTTP probe.

use once_cell::sync::OnceCell;
use rustls::{ClientConfig, RootCertStore};
use rustls_pki_types::ServerName;
use std::sync::Arc;
use std::time::Duration;
use ::time::OffsetDateTime;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::TlsConnector;
use tracing::debug;
use x509_parser::prelude::*;

/// Shared TLS configuration to avoid rebuilding the root certificate store
/// on every connection.
static TLS_CONFIG: OnceCell<Arc<ClientConfig>> = OnceCell::new();

pub(crate) fn shared_tls_config() -> Arc<ClientConfig> {
    TLS_CONFIG
        .get_or_init(|| {
            let mut root_cert_store = RootCertStore::empty();
            root_cert_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

            let config = ClientConfig::builder()
                .with_root_certificates(root_cert_store)
                .with_no_client_auth();

            Arc::new(config)
        })
        .clone()
}

pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Days until the peer's leaf certificate expires, floored; negative once the
/// certificate has already expired.
///
/// Returns `None` on any failure (DNS, connect, handshake, parse). Absence of
/// a result is never itself a failure signal.
pub async fn certificate_days_remaining(host: &str, port: u16) -> Option<i64> {
    match timeout(HANDSHAKE_TIMEOUT, peer_not_after(host, port)).await {
        Ok(Some(not_after)) => {
            let now = OffsetDateTime::now_utc().unix_timestamp();
            Some((not_after - now).div_euclid(86_400))
        }
        Ok(None) => None,
        Err(_) => {
            debug!(host, port, "timed out reading peer certificate");
            None
        }
    }
}

async fn peer_not_after(host: &str, port: u16) -> Option<i64> {
    let stream = TcpStream::connect((host, port)).await.ok()?;
    let connector = TlsConnector::from(shared_tls_config());
    let sni = ServerName::try_from(host.to_string()).ok()?;
    let tls_stream = connector.connect(sni, stream).await.ok()?;

    let (_io, connection) = tls_stream.get_ref();
    let cert = connection.peer_certificates()?.first()?;
    let (_, parsed) = X509Certificate::from_der(cert.as_ref()).ok()?;
    Some(parsed.validity().not_after.timestamp())
}

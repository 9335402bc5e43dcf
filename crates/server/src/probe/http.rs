//! One bounded GET against a monitor's URL.
//!
//! Redirects are followed and the response body is fully read, since the
//! content rules need it. All failure is returned as [`ProbeError`] data;
//! nothing propagates past this boundary as a panic.

use crate::error::ProbeError;
use crate::probe::tls::shared_tls_config;
use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::body::Incoming;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use rustls_pki_types::ServerName;
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::TlsConnector;
use tracing::debug;
use url::Url;

pub const MAX_REDIRECTS: usize = 10;

const USER_AGENT: &str = concat!("uptime-monitor/", env!("CARGO_PKG_VERSION"));

#[derive(Debug)]
pub struct ProbeResponse {
    pub status: StatusCode,
    /// Wall clock from request start to response-body-complete.
    pub elapsed: Duration,
    pub body: String,
}

/// Perform one GET against `url`, bounded by `limit`.
///
/// The timeout covers the whole exchange including redirects and the body
/// read. Any status code, 2xx or not, is a successful probe; only transport
/// problems produce an `Err`.
#[tracing::instrument(name = "probe_url", level = "debug", skip(limit))]
pub async fn probe_url(url: &str, limit: Duration) -> Result<ProbeResponse, ProbeError> {
    let started = Instant::now();
    match timeout(limit, fetch_with_redirects(url)).await {
        Ok(Ok((status, body))) => Ok(ProbeResponse {
            status,
            elapsed: started.elapsed(),
            body,
        }),
        Ok(Err(e)) => Err(e),
        Err(_) => Err(ProbeError::Timeout(limit)),
    }
}

async fn fetch_with_redirects(url: &str) -> Result<(StatusCode, String), ProbeError> {
    let mut current = Url::parse(url).map_err(|e| ProbeError::InvalidUrl(e.to_string()))?;
    for _ in 0..MAX_REDIRECTS {
        let response = fetch_once(&current).await?;
        let status = response.status();
        if status.is_redirection()
            && let Some(location) = response.headers().get(hyper::header::LOCATION)
        {
            let location = location
                .to_str()
                .map_err(|e| ProbeError::Network(e.to_string()))?;
            current = current
                .join(location)
                .map_err(|e| ProbeError::InvalidUrl(e.to_string()))?;
            debug!(location = %current, "following redirect");
            continue;
        }
        let collected = response
            .into_body()
            .collect()
            .await
            .map_err(|e| ProbeError::Network(e.to_string()))?;
        let body = String::from_utf8_lossy(&collected.to_bytes()).into_owned();
        return Ok((status, body));
    }
    Err(ProbeError::RedirectLimit(MAX_REDIRECTS))
}

async fn fetch_once(url: &Url) -> Result<Response<Incoming>, ProbeError> {
    let host = url
        .host_str()
        .ok_or_else(|| ProbeError::InvalidUrl(format!("no host in {url}")))?;
    let port = url
        .port_or_known_default()
        .ok_or_else(|| ProbeError::UnsupportedScheme(url.scheme().to_string()))?;

    let stream = TcpStream::connect(format!("{host}:{port}"))
        .await
        .map_err(|e| ProbeError::Connect(e.to_string()))?;

    // Host header carries the port only when the URL spells one out.
    let host_header = match url.port() {
        Some(explicit) => format!("{host}:{explicit}"),
        None => host.to_string(),
    };
    let path = match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_string(),
    };

    match url.scheme() {
        "http" => request_over(TokioIo::new(stream), &path, &host_header).await,
        "https" => {
            let connector = TlsConnector::from(shared_tls_config());
            let sni_host = host.trim_start_matches('[').trim_end_matches(']');
            let sni = ServerName::try_from(sni_host.to_string())
                .map_err(|_| ProbeError::InvalidUrl(format!("invalid TLS server name {host}")))?;
            let tls_stream = connector
                .connect(sni, stream)
                .await
                .map_err(|e| ProbeError::Tls(e.to_string()))?;
            request_over(TokioIo::new(tls_stream), &path, &host_header).await
        }
        other => Err(ProbeError::UnsupportedScheme(other.to_string())),
    }
}

async fn request_over<S>(
    stream: TokioIo<S>,
    path: &str,
    host_header: &str,
) -> Result<Response<Incoming>, ProbeError>
where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin + Send + 'static,
{
    let (mut sender, conn) = hyper::client::conn::http1::handshake(stream)
        .await
        .map_err(|e| ProbeError::Network(e.to_string()))?;
    tokio::task::spawn(async move {
        if let Err(err) = conn.await {
            debug!("connection closed with error: {err:#?}");
        }
    });

    let request = Request::builder()
        .uri(path)
        .header(hyper::header::USER_AGENT, USER_AGENT)
        .header(hyper::header::HOST, host_header)
        .body(Empty::<Bytes>::new())
        .map_err(|e| ProbeError::Network(e.to_string()))?;

    sender
        .send_request(request)
        .await
        .map_err(|e| ProbeError::Network(e.to_string()))
}

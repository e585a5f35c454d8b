//! Readiness checks run against a freshly spawned rendering process.
//!
//! The channel listener and the HTTP server come up independently, so the
//! two probes run concurrently and the caller joins them under one deadline.

use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time::sleep;
use tracing::trace;
use url::Url;

use super::error::RenderError;

const LOG_TARGET: &str = "supervisor::handshake";
const HTTP_PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// `http://host:port/`, bracketing IPv6 literals.
pub fn page_url(host: &str, port: u16) -> Result<Url, RenderError> {
    let authority = if host.contains(':') && !host.starts_with('[') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    };
    Url::parse(&format!("http://{authority}/"))
        .map_err(|err| RenderError::initialization(format!("invalid viewer address {authority}: {err}")))
}

/// Retry connecting to the channel port until it accepts.
pub async fn connect_channel(host: &str, port: u16, poll_interval: Duration) -> TcpStream {
    let mut attempts = 0u32;
    loop {
        attempts += 1;
        match TcpStream::connect((host, port)).await {
            Ok(stream) => {
                trace!(target = LOG_TARGET, port, attempts, "state channel accepted");
                return stream;
            }
            Err(err) => {
                trace!(target = LOG_TARGET, port, attempts, error = %err, "state channel not ready");
                sleep(poll_interval).await;
            }
        }
    }
}

/// Retry `GET url` until the page is served with a success status.
pub async fn wait_for_page(url: &Url, poll_interval: Duration) -> Result<(), RenderError> {
    let client = reqwest::Client::builder()
        .no_proxy()
        .timeout(HTTP_PROBE_TIMEOUT)
        .build()
        .map_err(|err| RenderError::initialization(format!("failed to build http client: {err}")))?;

    let mut attempts = 0u32;
    loop {
        attempts += 1;
        match client.get(url.clone()).send().await {
            Ok(response) if response.status().is_success() => {
                trace!(target = LOG_TARGET, %url, attempts, "page served");
                return Ok(());
            }
            Ok(response) => {
                trace!(target = LOG_TARGET, %url, status = %response.status(), "page not ready");
            }
            Err(err) => {
                trace!(target = LOG_TARGET, %url, error = %err, "page not ready");
            }
        }
        sleep(poll_interval).await;
    }
}

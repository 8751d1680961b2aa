// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printer status via the embedded web interface.
//
// The printer has no status channel on the raw port, so faults are read off
// its HTML status page by looking for fixed marker strings. The two checks
// fail in opposite directions: an unreachable page must never pass for a
// closed head, but it must not stop feeding either.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use labelcount_core::CounterConfig;
use labelcount_core::error::{LabelCountError, Result};

/// Fault checks the feed worker runs every tick.
#[async_trait]
pub trait PrinterStatus: Send + Sync {
    /// `Ok(false)` when the head-open marker is on the page. Transport
    /// failures are returned as errors.
    async fn is_head_closed(&self) -> Result<bool>;

    /// `true` when the media-out marker is on the page. Transport failures
    /// count as "not out".
    async fn is_media_out(&self) -> bool;
}

/// Reads the status page over HTTP.
#[derive(Debug, Clone)]
pub struct StatusClient {
    client: reqwest::Client,
    url: String,
    head_open_marker: String,
    media_out_marker: String,
    head_timeout: Duration,
    media_timeout: Duration,
}

impl StatusClient {
    pub fn new(config: &CounterConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| LabelCountError::StatusRequest(format!("build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: config.status_url(),
            head_open_marker: config.head_open_marker.clone(),
            media_out_marker: config.media_out_marker.clone(),
            head_timeout: config.head_check_timeout(),
            media_timeout: config.media_check_timeout(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// GET the status page body. The HTTP status code is not checked.
    async fn fetch_page(&self, timeout: Duration) -> Result<String> {
        let response = self
            .client
            .get(&self.url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| LabelCountError::StatusRequest(format!("GET {}: {}", self.url, e)))?;

        response
            .text()
            .await
            .map_err(|e| LabelCountError::StatusRequest(format!("read body of {}: {}", self.url, e)))
    }
}

#[async_trait]
impl PrinterStatus for StatusClient {
    async fn is_head_closed(&self) -> Result<bool> {
        let page = self.fetch_page(self.head_timeout).await?;
        let closed = !page.contains(&self.head_open_marker);
        if !closed {
            debug!(url = %self.url, "status page reports head open");
        }
        Ok(closed)
    }

    async fn is_media_out(&self) -> bool {
        match self.fetch_page(self.media_timeout).await {
            Ok(page) => {
                let out = page.contains(&self.media_out_marker);
                if out {
                    warn!(url = %self.url, "status page reports media out");
                }
                out
            }
            Err(e) => {
                warn!(error = %e, "status page unreachable, assuming media present");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const HEAD_OPEN_PAGE: &str = "<html><body><p>Fehler: DRUCKKOPF OFFEN</p></body></html>";
    const MEDIA_OUT_PAGE: &str = "<html><body><p>Fehler: KEIN PAPIER</p></body></html>";
    const READY_PAGE: &str = "<html><body><p>Status: BEREIT</p></body></html>";

    async fn serve(body: &'static str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/index.html"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
            .mount(&server)
            .await;
        server
    }

    fn client_for(host: String) -> StatusClient {
        let config = CounterConfig {
            printer_host: host,
            head_check_timeout_ms: 1_000,
            media_check_timeout_ms: 1_000,
            ..CounterConfig::default()
        };
        StatusClient::new(&config).expect("client")
    }

    /// A host:port with nothing listening on it.
    async fn dead_host() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);
        addr.to_string()
    }

    #[tokio::test]
    async fn head_open_marker_means_not_closed() {
        let server = serve(HEAD_OPEN_PAGE).await;
        let client = client_for(server.address().to_string());
        assert!(!client.is_head_closed().await.expect("reachable"));
    }

    #[tokio::test]
    async fn head_closed_without_marker() {
        let server = serve(READY_PAGE).await;
        let client = client_for(server.address().to_string());
        assert!(client.is_head_closed().await.expect("reachable"));
    }

    #[tokio::test]
    async fn head_check_propagates_transport_error() {
        let client = client_for(dead_host().await);
        let result = client.is_head_closed().await;
        assert!(matches!(result, Err(LabelCountError::StatusRequest(_))));
    }

    #[tokio::test]
    async fn media_out_marker_detected() {
        let server = serve(MEDIA_OUT_PAGE).await;
        let client = client_for(server.address().to_string());
        assert!(client.is_media_out().await);
    }

    #[tokio::test]
    async fn media_present_without_marker() {
        let server = serve(READY_PAGE).await;
        let client = client_for(server.address().to_string());
        assert!(!client.is_media_out().await);
    }

    #[tokio::test]
    async fn media_check_fails_open_on_transport_error() {
        let client = client_for(dead_host().await);
        assert!(!client.is_media_out().await);
    }

    #[tokio::test]
    async fn error_status_body_is_still_scanned() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/index.html"))
            .respond_with(ResponseTemplate::new(503).set_body_raw(MEDIA_OUT_PAGE, "text/html"))
            .mount(&server)
            .await;
        let client = client_for(server.address().to_string());
        assert!(client.is_media_out().await);
    }
}

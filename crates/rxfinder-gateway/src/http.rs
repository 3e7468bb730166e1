//! HTTP seam for outbound calls.
//!
//! Tools never talk to `reqwest` directly; they go through the
//! [`HttpClient`] trait so every operation is unit-testable with a mock
//! transport.

use std::time::Duration;

use async_trait::async_trait;
use rxfinder_core::errors::TransportError;

/// Fixed per-request timeout for every upstream call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// A completed HTTP response: status plus body text.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text (may be empty).
    pub body: String,
}

/// Minimal GET-only HTTP transport.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Issue a GET request. A network-level failure (including timeout)
    /// is a [`TransportError::Request`]; status interpretation is left to
    /// the caller.
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;
}

/// Production transport backed by a shared [`reqwest::Client`] with the
/// fixed request timeout. Never retries.
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Build the transport with the standard timeout.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self { client }
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError::Request {
                endpoint: url.to_owned(),
                message: e.to_string(),
            })?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Request {
                endpoint: url.to_owned(),
                message: e.to_string(),
            })?;
        Ok(HttpResponse { status, body })
    }
}

//! RxNav REST client: URL assembly, status normalization, JSON decoding.
//!
//! A non-success status is surfaced the same way as a network failure;
//! an empty response body decodes to an empty object so downstream
//! shaping code can uniformly index into it.

use std::sync::Arc;
use std::time::Instant;

use metrics::{counter, histogram};
use serde_json::{Map, Value};
use tracing::debug;

use rxfinder_core::errors::TransportError;

use crate::http::HttpClient;

/// Public RxNav REST base URL.
pub const DEFAULT_BASE_URL: &str = "https://rxnav.nlm.nih.gov/REST";

/// Client for the RxNav REST API.
pub struct RxNavClient {
    http: Arc<dyn HttpClient>,
    base_url: String,
}

impl RxNavClient {
    /// Create a client against the given base URL (no trailing slash).
    pub fn new(http: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            let _ = base_url.pop();
        }
        Self { http, base_url }
    }

    /// Create a client against the public RxNav base.
    pub fn with_default_base(http: Arc<dyn HttpClient>) -> Self {
        Self::new(http, DEFAULT_BASE_URL)
    }

    /// GET `path` with the given query parameters, decoding the body as a
    /// JSON value. Empty bodies decode to `{}`.
    pub async fn get_json(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Value, TransportError> {
        let url = self.build_url(path, params);
        let start = Instant::now();
        counter!("rxnav_requests_total").increment(1);
        debug!(path, "rxnav request");

        let response = self.http.get(&url).await.inspect_err(|_| {
            counter!("rxnav_errors_total").increment(1);
        })?;
        histogram!("rxnav_request_duration_seconds").record(start.elapsed().as_secs_f64());

        if !(200..300).contains(&response.status) {
            counter!("rxnav_errors_total").increment(1);
            return Err(TransportError::Status {
                endpoint: path.to_owned(),
                status: response.status,
            });
        }
        if response.body.trim().is_empty() {
            return Ok(Value::Object(Map::new()));
        }
        serde_json::from_str(&response.body).map_err(|e| {
            counter!("rxnav_errors_total").increment(1);
            TransportError::Body {
                endpoint: path.to_owned(),
                message: e.to_string(),
            }
        })
    }

    fn build_url(&self, path: &str, params: &[(&str, String)]) -> String {
        if params.is_empty() {
            return format!("{}{path}", self.base_url);
        }
        let query = params
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}{path}?{query}", self.base_url)
    }
}

/// Percent-encode one path segment (rxcui values are caller-supplied).
pub fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

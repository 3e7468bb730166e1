//! Shared test doubles for gateway tests.
//!
//! `MockHttp` matches requests by URL substring and replays canned
//! responses; unmatched URLs answer 404 so a wrong path fails loudly.

use std::sync::Mutex;

use async_trait::async_trait;
use rxfinder_core::errors::TransportError;

use crate::http::{HttpClient, HttpResponse};

enum Canned {
    Response(HttpResponse),
    Error(String),
}

/// Scriptable in-memory [`HttpClient`].
pub struct MockHttp {
    routes: Vec<(String, Canned)>,
    urls: Mutex<Vec<String>>,
}

impl MockHttp {
    /// A mock with no routes — every request answers 404.
    pub fn empty() -> Self {
        Self {
            routes: Vec::new(),
            urls: Mutex::new(Vec::new()),
        }
    }

    /// One route answering 200 with the given JSON body.
    pub fn json_for(path: &str, body: &str) -> Self {
        Self::empty().with_json(path, body)
    }

    /// One route answering the given status.
    pub fn status_for(path: &str, status: u16, body: &str) -> Self {
        Self::empty().with_status(path, status, body)
    }

    /// One route failing at the network level.
    pub fn error_for(path: &str, message: &str) -> Self {
        Self::empty().with_error(path, message)
    }

    /// Add a 200 route (builder).
    pub fn with_json(mut self, path: &str, body: &str) -> Self {
        self.routes.push((
            path.to_owned(),
            Canned::Response(HttpResponse {
                status: 200,
                body: body.to_owned(),
            }),
        ));
        self
    }

    /// Add a route with an explicit status (builder).
    pub fn with_status(mut self, path: &str, status: u16, body: &str) -> Self {
        self.routes.push((
            path.to_owned(),
            Canned::Response(HttpResponse {
                status,
                body: body.to_owned(),
            }),
        ));
        self
    }

    /// Add a network-failure route (builder).
    pub fn with_error(mut self, path: &str, message: &str) -> Self {
        self.routes
            .push((path.to_owned(), Canned::Error(message.to_owned())));
        self
    }

    /// The most recent request URL, if any.
    pub fn last_url(&self) -> Option<String> {
        self.urls.lock().unwrap().last().cloned()
    }

    /// Number of requests issued.
    pub fn request_count(&self) -> usize {
        self.urls.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpClient for MockHttp {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        self.urls.lock().unwrap().push(url.to_owned());
        for (needle, canned) in &self.routes {
            if url.contains(needle.as_str()) {
                return match canned {
                    Canned::Response(r) => Ok(r.clone()),
                    Canned::Error(message) => Err(TransportError::Request {
                        endpoint: url.to_owned(),
                        message: message.clone(),
                    }),
                };
            }
        }
        Ok(HttpResponse {
            status: 404,
            body: String::new(),
        })
    }
}

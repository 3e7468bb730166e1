//! # rxfinder-gateway
//!
//! The agent-facing gateway over the RxNav REST API: a thin HTTP client
//! with a fixed timeout and normalized errors, plus eight lookup
//! operations, each with its own response-shaping and fallback policy.
//!
//! Every operation is a total function: it always returns a JSON envelope
//! object, never an error. Failures are captured and returned as
//! `{"error": ...}` data (identifier-scoped operations also echo their
//! input). Operations are stateless — no caching, no retries — and safe
//! under concurrent invocation.
//!
//! ## Crate Position
//!
//! Depends on rxfinder-core. Depended on by rxfinder-agent and
//! rxfinder-server.

#![deny(unsafe_code)]

pub mod client;
pub mod http;
pub mod registry;
pub mod tools;
pub mod validation;

#[cfg(test)]
pub(crate) mod testutil;

use std::sync::Arc;

pub use client::{DEFAULT_BASE_URL, RxNavClient};
pub use http::{HttpClient, HttpResponse, ReqwestClient};
pub use registry::{GatewayTool, ToolRegistry};

/// Build the full RxNorm toolset over one shared client.
pub fn rxnorm_toolset(client: Arc<RxNavClient>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(tools::SearchDrugsTool::new(Arc::clone(&client)));
    registry.register(tools::DrugPropertiesTool::new(Arc::clone(&client)));
    registry.register(tools::SpellingSuggestionsTool::new(Arc::clone(&client)));
    registry.register(tools::FindRxcuiTool::new(Arc::clone(&client)));
    registry.register(tools::AllRelatedTool::new(Arc::clone(&client)));
    registry.register(tools::NdcPropertiesTool::new(Arc::clone(&client)));
    registry.register(tools::HistoryStatusTool::new(Arc::clone(&client)));
    registry.register(tools::RxTermsInfoTool::new(client));
    registry
}

//! `get_rxterms_info` — consumer-friendly display fields (name, strength,
//! route, dose form) from RxTerms.
//!
//! If the expected `rxtermsInfo` wrapper key is absent or empty, the raw
//! response body itself is used as the display-info object. That fallback
//! can surface an upstream error body as display info; it is preserved
//! deliberately and flagged in DESIGN.md.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use rxfinder_core::tools::{ToolSchemaBuilder, ToolSpec};

use crate::client::{RxNavClient, encode_segment};
use crate::registry::GatewayTool;
use crate::validation::require_string;

/// Retrieve consumer-friendly display fields for a known RxCUI.
pub struct RxTermsInfoTool {
    client: Arc<RxNavClient>,
}

impl RxTermsInfoTool {
    /// Create the tool over a shared client.
    pub fn new(client: Arc<RxNavClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl GatewayTool for RxTermsInfoTool {
    fn name(&self) -> &'static str {
        "get_rxterms_info"
    }

    fn definition(&self) -> ToolSpec {
        ToolSchemaBuilder::new(
            "get_rxterms_info",
            "Retrieve consumer-friendly display fields (displayName, \
             strength, route, dose form) from RxTerms for a known RxCUI. \
             Prefer this for titles/labels shown to non-professionals; \
             RxTerms may be missing for non-prescribable concepts.",
        )
        .required_property(
            "rxcui",
            json!({"type": "string", "description": "RxNorm CUI"}),
        )
        .build()
    }

    async fn execute(&self, params: Value) -> Value {
        let rxcui = match require_string(&params, "rxcui") {
            Ok(id) => id,
            Err(envelope) => return envelope,
        };

        let path = format!("/RxTerms/rxcui/{}/allinfo.json", encode_segment(&rxcui));
        let data = match self.client.get_json(&path, &[]).await {
            Ok(data) => data,
            Err(e) => return json!({ "rxcui": rxcui, "error": e.to_string() }),
        };

        // Wrapper key absent or empty: fall back to the raw body.
        let info = match data.get("rxtermsInfo") {
            Some(Value::Object(m)) if !m.is_empty() => Value::Object(m.clone()),
            _ => data,
        };

        json!({ "rxcui": rxcui, "rxtermsInfo": info })
    }
}

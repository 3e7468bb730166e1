//! `get_ndc_properties` — package-level properties for an NDC.
//!
//! Pass-through: the upstream payload is returned unshaped under `data`.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use rxfinder_core::tools::{ToolSchemaBuilder, ToolSpec};

use crate::client::RxNavClient;
use crate::registry::GatewayTool;
use crate::validation::require_string;

/// Fetch product/package properties for a National Drug Code.
pub struct NdcPropertiesTool {
    client: Arc<RxNavClient>,
}

impl NdcPropertiesTool {
    /// Create the tool over a shared client.
    pub fn new(client: Arc<RxNavClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl GatewayTool for NdcPropertiesTool {
    fn name(&self) -> &'static str {
        "get_ndc_properties"
    }

    fn definition(&self) -> ToolSpec {
        ToolSchemaBuilder::new(
            "get_ndc_properties",
            "Given a package NDC (10/11-digit, hyphens optional, e.g. \
             \"0054-0450-25\"), return human-readable product/package \
             properties, including active/obsolete status when available.",
        )
        .required_property(
            "ndc",
            json!({"type": "string", "description": "NDC with or without hyphens"}),
        )
        .build()
    }

    async fn execute(&self, params: Value) -> Value {
        let ndc = match require_string(&params, "ndc") {
            Ok(code) => code,
            Err(envelope) => return envelope,
        };

        match self
            .client
            .get_json("/ndcproperties.json", &[("ndc", ndc.clone())])
            .await
        {
            Ok(data) => json!({ "ndc": ndc, "data": data }),
            Err(e) => json!({ "ndc": ndc, "error": e.to_string() }),
        }
    }
}

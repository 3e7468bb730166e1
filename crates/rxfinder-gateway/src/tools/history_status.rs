//! `get_rxcui_history_status` — Active/Obsolete/Remapped status for an
//! RxCUI.
//!
//! Pass-through: the upstream payload is returned unshaped under `data`.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use rxfinder_core::tools::{ToolSchemaBuilder, ToolSpec};

use crate::client::{RxNavClient, encode_segment};
use crate::registry::GatewayTool;
use crate::validation::require_string;

/// Check whether an RxCUI is Active/Obsolete/Remapped, with the remap
/// target when present.
pub struct HistoryStatusTool {
    client: Arc<RxNavClient>,
}

impl HistoryStatusTool {
    /// Create the tool over a shared client.
    pub fn new(client: Arc<RxNavClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl GatewayTool for HistoryStatusTool {
    fn name(&self) -> &'static str {
        "get_rxcui_history_status"
    }

    fn definition(&self) -> ToolSpec {
        ToolSchemaBuilder::new(
            "get_rxcui_history_status",
            "Check whether an RxCUI is Active, Obsolete, or Remapped. If \
             the status is REMAPPED, prefer the replacement RxCUI in \
             follow-up lookups.",
        )
        .required_property(
            "rxcui",
            json!({"type": "string", "description": "RxNorm CUI to evaluate"}),
        )
        .build()
    }

    async fn execute(&self, params: Value) -> Value {
        let rxcui = match require_string(&params, "rxcui") {
            Ok(id) => id,
            Err(envelope) => return envelope,
        };

        let path = format!("/rxcui/{}/historystatus.json", encode_segment(&rxcui));
        match self.client.get_json(&path, &[]).await {
            Ok(data) => json!({ "rxcui": rxcui, "data": data }),
            Err(e) => json!({ "rxcui": rxcui, "error": e.to_string() }),
        }
    }
}

//! `get_all_related_info` — related RxNorm concepts grouped by term type.
//!
//! The caller may restrict which term types (TTYs) come back with a
//! space-separated filter. Groups that end up empty after shaping are
//! dropped rather than returned as empty lists.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value, json};

use rxfinder_core::tools::{ToolSchemaBuilder, ToolSpec};

use crate::client::{RxNavClient, encode_segment};
use crate::registry::GatewayTool;
use crate::validation::{optional_string, require_string};

/// Fetch related RxNorm concepts (brand/generic, forms, strengths) for an
/// RxCUI, grouped by TTY.
pub struct AllRelatedTool {
    client: Arc<RxNavClient>,
}

impl AllRelatedTool {
    /// Create the tool over a shared client.
    pub fn new(client: Arc<RxNavClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl GatewayTool for AllRelatedTool {
    fn name(&self) -> &'static str {
        "get_all_related_info"
    }

    fn definition(&self) -> ToolSpec {
        ToolSchemaBuilder::new(
            "get_all_related_info",
            "Fetch related RxNorm concepts for an RxCUI, grouped by TTY. \
             Common consumer TTYs: IN (ingredient), BN (brand name), \
             SCD/SBD (clinical/branded drugs), DF (dose form).",
        )
        .required_property(
            "rxcui",
            json!({"type": "string", "description": "RxNorm Concept Unique Identifier"}),
        )
        .property(
            "filter_tty",
            json!({"type": "string", "description": "Space-separated TTYs to include, e.g. \"SCD SBD IN BN DF\""}),
        )
        .build()
    }

    async fn execute(&self, params: Value) -> Value {
        let rxcui = match require_string(&params, "rxcui") {
            Ok(id) => id,
            Err(envelope) => return envelope,
        };
        let allowed: Option<HashSet<String>> = optional_string(&params, "filter_tty")
            .map(|f| f.split_whitespace().map(str::to_owned).collect());

        let path = format!("/rxcui/{}/allrelated.json", encode_segment(&rxcui));
        let data = match self.client.get_json(&path, &[]).await {
            Ok(data) => data,
            Err(e) => return json!({ "rxcui": rxcui, "error": e.to_string() }),
        };

        let groups = data
            .pointer("/allRelatedGroup/conceptGroup")
            .and_then(Value::as_array);

        let mut related = Map::new();
        for group in groups.into_iter().flatten() {
            let Some(tty) = group.get("tty").and_then(Value::as_str) else {
                continue;
            };
            if let Some(allowed) = &allowed {
                if !allowed.contains(tty) {
                    continue;
                }
            }
            let concepts = group.get("conceptProperties").and_then(Value::as_array);
            let compacts: Vec<Value> = concepts
                .into_iter()
                .flatten()
                .map(|c| {
                    json!({
                        "rxcui": c.get("rxcui").cloned().unwrap_or(Value::Null),
                        "name": c.get("name").cloned().unwrap_or(Value::Null),
                        "tty": c.get("tty").cloned().unwrap_or(Value::Null),
                        "synonym": c.get("synonym").cloned().unwrap_or(Value::Null),
                    })
                })
                .collect();
            if !compacts.is_empty() {
                let _ = related.insert(tty.to_owned(), Value::Array(compacts));
            }
        }

        json!({ "rxcui": rxcui, "related": related })
    }
}

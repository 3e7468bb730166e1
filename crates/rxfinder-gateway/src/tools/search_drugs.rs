//! `search_drugs` — name search over RxNorm drug concepts.
//!
//! RxNav groups hits as `drugGroup.conceptGroup[].conceptProperties[]`;
//! the groups are flattened into one ordered list and truncated to the
//! requested limit.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use rxfinder_core::tools::{ToolSchemaBuilder, ToolSpec};

use crate::client::RxNavClient;
use crate::registry::GatewayTool;
use crate::validation::{clip_limit, require_string};

const LIMIT_MIN: i64 = 1;
const LIMIT_MAX: i64 = 50;
const LIMIT_DEFAULT: i64 = 5;

/// Search RxNorm for drug concepts by brand or generic name.
pub struct SearchDrugsTool {
    client: Arc<RxNavClient>,
}

impl SearchDrugsTool {
    /// Create the tool over a shared client.
    pub fn new(client: Arc<RxNavClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl GatewayTool for SearchDrugsTool {
    fn name(&self) -> &'static str {
        "search_drugs"
    }

    fn definition(&self) -> ToolSpec {
        ToolSchemaBuilder::new(
            "search_drugs",
            "Search RxNorm for drug concepts by brand or generic name \
             (e.g. \"Tylenol\" or \"acetaminophen\"). Returns rxcui, name, \
             synonym, and tty for each hit.",
        )
        .required_property(
            "query",
            json!({"type": "string", "description": "Drug, brand, or ingredient name"}),
        )
        .property(
            "limit",
            json!({"type": "number", "description": "Max results, 1-50 (default 5)"}),
        )
        .build()
    }

    async fn execute(&self, params: Value) -> Value {
        let query = match require_string(&params, "query") {
            Ok(q) => q,
            Err(envelope) => return envelope,
        };
        let limit = clip_limit(&params, "limit", LIMIT_MIN, LIMIT_MAX, LIMIT_DEFAULT) as usize;

        let data = match self
            .client
            .get_json("/drugs.json", &[("name", query.clone())])
            .await
        {
            Ok(data) => data,
            Err(e) => return json!({ "error": e.to_string() }),
        };

        let mut results: Vec<Value> = Vec::new();
        let groups = data
            .pointer("/drugGroup/conceptGroup")
            .and_then(Value::as_array);
        for group in groups.into_iter().flatten() {
            let concepts = group.get("conceptProperties").and_then(Value::as_array);
            for concept in concepts.into_iter().flatten() {
                results.push(json!({
                    "rxcui": concept.get("rxcui").cloned().unwrap_or(Value::Null),
                    "name": concept.get("name").cloned().unwrap_or(Value::Null),
                    "synonym": concept.get("synonym").cloned().unwrap_or(Value::Null),
                    "tty": concept.get("tty").cloned().unwrap_or(Value::Null),
                }));
            }
        }
        results.truncate(limit);

        json!({ "query": query, "results": results })
    }
}

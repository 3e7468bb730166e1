//! `get_spelling_suggestions` — corrected names for a possibly
//! misspelled input.
//!
//! Only the suggestion strings are surfaced; any structured metadata the
//! endpoint returns alongside them is discarded.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use rxfinder_core::tools::{ToolSchemaBuilder, ToolSpec};

use crate::client::RxNavClient;
use crate::registry::GatewayTool;
use crate::validation::require_string;

/// Suggest corrected drug names for a possibly misspelled input.
pub struct SpellingSuggestionsTool {
    client: Arc<RxNavClient>,
}

impl SpellingSuggestionsTool {
    /// Create the tool over a shared client.
    pub fn new(client: Arc<RxNavClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl GatewayTool for SpellingSuggestionsTool {
    fn name(&self) -> &'static str {
        "get_spelling_suggestions"
    }

    fn definition(&self) -> ToolSpec {
        ToolSchemaBuilder::new(
            "get_spelling_suggestions",
            "Suggest corrected drug names for a possibly misspelled input \
             (e.g. \"ibuprfen\" -> \"ibuprofen\"). Does not resolve to an \
             RxCUI; follow up with find_rxcui.",
        )
        .required_property(
            "name",
            json!({"type": "string", "description": "Free-text drug/brand/ingredient name, may include typos"}),
        )
        .build()
    }

    async fn execute(&self, params: Value) -> Value {
        let name = match require_string(&params, "name") {
            Ok(n) => n,
            Err(envelope) => return envelope,
        };

        let data = match self
            .client
            .get_json("/spellingsuggestions.json", &[("name", name.clone())])
            .await
        {
            Ok(data) => data,
            Err(e) => return json!({ "query": name, "error": e.to_string() }),
        };

        let suggestions: Vec<String> = data
            .pointer("/suggestionGroup/suggestionList/suggestion")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        json!({ "query": name, "suggestions": suggestions })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MockHttp;

    fn tool(mock: MockHttp) -> SpellingSuggestionsTool {
        SpellingSuggestionsTool::new(Arc::new(RxNavClient::new(Arc::new(mock), "http://x")))
    }

    #[tokio::test]
    async fn surfaces_only_strings() {
        let body = r#"{
            "suggestionGroup": {
                "name": "ibuprfen",
                "suggestionList": {
                    "suggestion": ["ibuprofen", {"weird": "object"}, "ibuprofen pm", 42]
                }
            }
        }"#;
        let out = tool(MockHttp::json_for("/spellingsuggestions.json", body))
            .execute(json!({"name": "ibuprfen"}))
            .await;
        assert_eq!(out["query"], "ibuprfen");
        assert_eq!(out["suggestions"], json!(["ibuprofen", "ibuprofen pm"]));
    }

    #[tokio::test]
    async fn absent_list_is_empty() {
        let out = tool(MockHttp::json_for("/spellingsuggestions.json", "{}"))
            .execute(json!({"name": "zzz"}))
            .await;
        assert_eq!(out["suggestions"], json!([]));
    }

    #[tokio::test]
    async fn missing_name_is_error_envelope() {
        let out = tool(MockHttp::empty()).execute(json!({})).await;
        assert_eq!(out["error"], "name is required");
    }

    #[tokio::test]
    async fn transport_failure_echoes_query() {
        let out = tool(MockHttp::error_for("/spellingsuggestions.json", "timed out"))
            .execute(json!({"name": "ibuprfen"}))
            .await;
        assert_eq!(out["query"], "ibuprfen");
        assert!(out["error"].as_str().unwrap().contains("timed out"));
        assert!(out.get("suggestions").is_none());
    }
}

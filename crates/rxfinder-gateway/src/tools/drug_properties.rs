//! `get_drug_properties` — RxNorm properties for a known RXCUI.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use rxfinder_core::tools::{ToolSchemaBuilder, ToolSpec};

use crate::client::{RxNavClient, encode_segment};
use crate::registry::GatewayTool;
use crate::validation::require_string;

/// Fetch RxNorm properties for a given RXCUI.
pub struct DrugPropertiesTool {
    client: Arc<RxNavClient>,
}

impl DrugPropertiesTool {
    /// Create the tool over a shared client.
    pub fn new(client: Arc<RxNavClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl GatewayTool for DrugPropertiesTool {
    fn name(&self) -> &'static str {
        "get_drug_properties"
    }

    fn definition(&self) -> ToolSpec {
        ToolSchemaBuilder::new(
            "get_drug_properties",
            "Fetch RxNorm properties (name, tty, language, etc.) for a \
             known RxCUI.",
        )
        .required_property(
            "rxcui",
            json!({"type": "string", "description": "RxNorm Concept Unique Identifier"}),
        )
        .build()
    }

    async fn execute(&self, params: Value) -> Value {
        let rxcui = match require_string(&params, "rxcui") {
            Ok(id) => id,
            Err(envelope) => return envelope,
        };

        let path = format!("/rxcui/{}/properties.json", encode_segment(&rxcui));
        let data = match self.client.get_json(&path, &[]).await {
            Ok(data) => data,
            Err(e) => return json!({ "error": e.to_string() }),
        };

        // Missing or non-object `properties` becomes an empty object so
        // consumers can index uniformly.
        let properties = match data.get("properties") {
            Some(Value::Object(m)) => Value::Object(m.clone()),
            _ => json!({}),
        };

        json!({ "rxcui": rxcui, "properties": properties })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MockHttp;

    fn tool(mock: MockHttp) -> DrugPropertiesTool {
        DrugPropertiesTool::new(Arc::new(RxNavClient::new(Arc::new(mock), "http://x")))
    }

    #[tokio::test]
    async fn returns_properties_object() {
        let body = r#"{"properties": {"rxcui": "161", "name": "acetaminophen", "tty": "IN"}}"#;
        let out = tool(MockHttp::json_for("/rxcui/161/properties.json", body))
            .execute(json!({"rxcui": "161"}))
            .await;
        assert_eq!(out["rxcui"], "161");
        assert_eq!(out["properties"]["name"], "acetaminophen");
    }

    #[tokio::test]
    async fn missing_properties_becomes_empty_object() {
        let out = tool(MockHttp::json_for("/properties.json", "{}"))
            .execute(json!({"rxcui": "999"}))
            .await;
        assert!(out["properties"].as_object().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_rxcui_is_error_envelope() {
        let out = tool(MockHttp::empty()).execute(json!({})).await;
        assert_eq!(out["error"], "rxcui is required");
    }

    #[tokio::test]
    async fn transport_failure_is_error_envelope() {
        let out = tool(MockHttp::status_for("/properties.json", 500, ""))
            .execute(json!({"rxcui": "161"}))
            .await;
        assert!(out["error"].as_str().unwrap().contains("500"));
        assert!(out.get("properties").is_none());
    }

    #[tokio::test]
    async fn rxcui_is_path_encoded() {
        let mock = Arc::new(MockHttp::json_for("/rxcui/", "{}"));
        let t = DrugPropertiesTool::new(Arc::new(RxNavClient::new(
            Arc::clone(&mock) as Arc<dyn crate::http::HttpClient>,
            "http://x",
        )));
        let _ = t.execute(json!({"rxcui": "1 2/3"})).await;
        assert!(mock.last_url().unwrap().contains("/rxcui/1%202%2F3/properties.json"));
    }
}

//! `find_rxcui` — two-stage name-to-identifier resolution.
//!
//! Stage 1 asks the exact-match endpoint; any hit is authoritative and
//! ends the lookup. Stage 2 (approximate) runs only when stage 1 comes
//! back empty and the caller allowed it; its candidates are ranked,
//! scored guesses for disambiguation and are never blended into `exact`.
//! A stage-2 failure degrades to an `approximate_error` field — the
//! stage-1 result (the empty `exact` list) is still returned.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value, json};

use rxfinder_core::tools::{ToolSchemaBuilder, ToolSpec};

use crate::client::RxNavClient;
use crate::registry::GatewayTool;
use crate::validation::{bool_or, int_or, lenient_int, require_string};

const DEFAULT_MAX_ENTRIES: i64 = 10;

/// Resolve a drug/brand/ingredient name to one or more RxCUIs, with an
/// optional approximate fallback.
pub struct FindRxcuiTool {
    client: Arc<RxNavClient>,
}

impl FindRxcuiTool {
    /// Create the tool over a shared client.
    pub fn new(client: Arc<RxNavClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl GatewayTool for FindRxcuiTool {
    fn name(&self) -> &'static str {
        "find_rxcui"
    }

    fn definition(&self) -> ToolSpec {
        ToolSchemaBuilder::new(
            "find_rxcui",
            "Resolve a drug/brand/ingredient name to canonical RxCUI(s). \
             Prefer `exact` hits; `approximate` is a ranked fallback, \
             present only when the exact lookup returned nothing and the \
             fallback was requested.",
        )
        .required_property(
            "name",
            json!({"type": "string", "description": "Free-text name (ingredient, brand, etc.)"}),
        )
        .property(
            "do_approximate_if_none",
            json!({"type": "boolean", "description": "Use approximateTerm when exact lookup returns none (default true)"}),
        )
        .property(
            "max_entries",
            json!({"type": "number", "description": "Cap on approximate candidates (default 10)"}),
        )
        .build()
    }

    async fn execute(&self, params: Value) -> Value {
        let name = match require_string(&params, "name") {
            Ok(n) => n,
            Err(envelope) => return envelope,
        };
        let do_approximate = bool_or(&params, "do_approximate_if_none", true);
        let max_entries = int_or(&params, "max_entries", DEFAULT_MAX_ENTRIES);

        // Stage 1: exact match.
        let data = match self
            .client
            .get_json("/rxcui.json", &[("name", name.clone())])
            .await
        {
            Ok(data) => data,
            Err(e) => return json!({ "query": name, "error": e.to_string() }),
        };

        let exact: Vec<Value> = data
            .pointer("/idGroup/rxnormId")
            .and_then(Value::as_array)
            .map(|ids| ids.iter().map(|id| json!({ "rxcui": id })).collect())
            .unwrap_or_default();

        let mut response = Map::new();
        let _ = response.insert("query".into(), Value::String(name.clone()));
        let _ = response.insert("exact".into(), Value::Array(exact.clone()));

        // Stage 2: approximate fallback, only when exact yielded nothing.
        if exact.is_empty() && do_approximate {
            let approx = self
                .client
                .get_json(
                    "/approximateTerm.json",
                    &[
                        ("term", name),
                        ("maxEntries", max_entries.to_string()),
                        ("option", "1".into()),
                    ],
                )
                .await;

            match approx {
                Err(e) => {
                    let _ = response.insert("approximate_error".into(), json!(e.to_string()));
                }
                Ok(apx) => {
                    let candidates: Vec<Value> = apx
                        .pointer("/approximateGroup/candidate")
                        .and_then(Value::as_array)
                        .map(|items| {
                            items
                                .iter()
                                .map(|c| {
                                    json!({
                                        "rxcui": c.get("rxcui").cloned().unwrap_or(Value::Null),
                                        "score": lenient_int(c.get("score")),
                                        "rank": lenient_int(c.get("rank")),
                                        "name": c.get("name").cloned().unwrap_or(Value::Null),
                                    })
                                })
                                .collect()
                        })
                        .unwrap_or_default();
                    let _ = response.insert("approximate".into(), Value::Array(candidates));
                }
            }
        }

        Value::Object(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MockHttp;

    fn tool(mock: MockHttp) -> FindRxcuiTool {
        FindRxcuiTool::new(Arc::new(RxNavClient::new(Arc::new(mock), "http://x")))
    }

    #[tokio::test]
    async fn exact_hit_skips_approximate_entirely() {
        let mock = Arc::new(
            MockHttp::json_for("/rxcui.json", r#"{"idGroup": {"rxnormId": ["203150"]}}"#)
                .with_json("/approximateTerm.json", r#"{"approximateGroup": {}}"#),
        );
        let t = FindRxcuiTool::new(Arc::new(RxNavClient::new(
            Arc::clone(&mock) as Arc<dyn crate::http::HttpClient>,
            "http://x",
        )));
        let out = t.execute(json!({"name": "benadryl"})).await;
        assert_eq!(out["exact"], json!([{"rxcui": "203150"}]));
        assert!(out.get("approximate").is_none());
        // Only the exact endpoint was called.
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn no_exact_hit_attaches_approximate() {
        let body = r#"{
            "approximateGroup": {
                "candidate": [
                    {"rxcui": "5640", "score": "85", "rank": "1", "name": "ibuprofen"},
                    {"rxcui": "153010", "score": 80, "rank": 2, "name": "ibuprofen pm"}
                ]
            }
        }"#;
        let mock = MockHttp::json_for("/rxcui.json", r#"{"idGroup": {}}"#)
            .with_json("/approximateTerm.json", body);
        let out = tool(mock)
            .execute(json!({"name": "qqzzxx-not-a-drug"}))
            .await;
        assert_eq!(out["exact"], json!([]));
        let approx = out["approximate"].as_array().unwrap();
        assert_eq!(approx.len(), 2);
        // String-typed score/rank coerced to integers.
        assert_eq!(approx[0]["score"], 85);
        assert_eq!(approx[0]["rank"], 1);
        assert_eq!(approx[1]["score"], 80);
        assert_eq!(approx[0]["name"], "ibuprofen");
    }

    #[tokio::test]
    async fn approximate_key_present_even_when_empty() {
        let mock = MockHttp::json_for("/rxcui.json", "{}")
            .with_json("/approximateTerm.json", r#"{"approximateGroup": {}}"#);
        let out = tool(mock).execute(json!({"name": "zzz"})).await;
        assert_eq!(out["exact"], json!([]));
        assert!(out.get("approximate").is_some());
        assert_eq!(out["approximate"], json!([]));
    }

    #[tokio::test]
    async fn fallback_disabled_returns_empty_exact_only() {
        let mock = MockHttp::json_for("/rxcui.json", "{}");
        let out = tool(mock)
            .execute(json!({"name": "zzz", "do_approximate_if_none": false}))
            .await;
        assert_eq!(out["exact"], json!([]));
        assert!(out.get("approximate").is_none());
        assert!(out.get("approximate_error").is_none());
    }

    #[tokio::test]
    async fn stage_two_failure_degrades_to_approximate_error() {
        let mock = MockHttp::json_for("/rxcui.json", "{}")
            .with_error("/approximateTerm.json", "connection reset");
        let out = tool(mock).execute(json!({"name": "zzz"})).await;
        // Stage-1 result survives.
        assert_eq!(out["exact"], json!([]));
        assert!(out.get("approximate").is_none());
        assert!(
            out["approximate_error"]
                .as_str()
                .unwrap()
                .contains("connection reset")
        );
    }

    #[tokio::test]
    async fn stage_one_failure_is_error_envelope() {
        let mock = MockHttp::error_for("/rxcui.json", "dns failure");
        let out = tool(mock).execute(json!({"name": "benadryl"})).await;
        assert_eq!(out["query"], "benadryl");
        assert!(out["error"].as_str().unwrap().contains("dns failure"));
        assert!(out.get("exact").is_none());
    }

    #[tokio::test]
    async fn missing_name_is_error_envelope() {
        let out = tool(MockHttp::empty()).execute(json!({})).await;
        assert_eq!(out["error"], "name is required");
    }

    #[tokio::test]
    async fn max_entries_and_option_passed_through() {
        let mock = Arc::new(
            MockHttp::json_for("/rxcui.json", "{}")
                .with_json("/approximateTerm.json", r#"{"approximateGroup": {}}"#),
        );
        let t = FindRxcuiTool::new(Arc::new(RxNavClient::new(
            Arc::clone(&mock) as Arc<dyn crate::http::HttpClient>,
            "http://x",
        )));
        let _ = t.execute(json!({"name": "zzz", "max_entries": 3})).await;
        let url = mock.last_url().unwrap();
        assert!(url.contains("maxEntries=3"));
        assert!(url.contains("option=1"));
    }
}

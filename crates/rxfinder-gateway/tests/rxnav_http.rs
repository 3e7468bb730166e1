//! HTTP-layer tests: the production transport and client against a
//! wiremock server.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rxfinder_gateway::{ReqwestClient, RxNavClient, rxnorm_toolset};

fn client_for(server: &MockServer) -> Arc<RxNavClient> {
    Arc::new(RxNavClient::new(
        Arc::new(ReqwestClient::new()),
        format!("{}/REST", server.uri()),
    ))
}

#[tokio::test]
async fn get_json_decodes_success_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/REST/drugs.json"))
        .and(query_param("name", "tylenol"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"drugGroup": {"name": "tylenol"}}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let v = client
        .get_json("/drugs.json", &[("name", "tylenol".into())])
        .await
        .unwrap();
    assert_eq!(v["drugGroup"]["name"], "tylenol");
}

#[tokio::test]
async fn server_error_surfaces_as_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/REST/rxcui.json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.get_json("/rxcui.json", &[]).await.unwrap_err();
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn empty_body_decodes_to_empty_object() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/REST/ndcproperties.json"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let v = client.get_json("/ndcproperties.json", &[]).await.unwrap();
    assert!(v.as_object().unwrap().is_empty());
}

#[tokio::test]
async fn find_rxcui_over_the_wire_prefers_exact() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/REST/rxcui.json"))
        .and(query_param("name", "benadryl"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"idGroup": {"name": "benadryl", "rxnormId": ["203150"]}}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let registry = rxnorm_toolset(client_for(&server));
    let out = registry
        .execute("find_rxcui", json!({"name": "benadryl"}))
        .await;
    assert_eq!(out["exact"][0]["rxcui"], "203150");
    assert!(out.get("approximate").is_none());
}

#[tokio::test]
async fn transport_failure_produces_error_envelope_for_every_tool() {
    // A server that always answers 500: every operation must come back as
    // an envelope with a non-empty error and no success fields.
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let registry = rxnorm_toolset(client_for(&server));
    let cases = [
        ("search_drugs", json!({"query": "x"}), "results"),
        ("get_drug_properties", json!({"rxcui": "1"}), "properties"),
        ("get_spelling_suggestions", json!({"name": "x"}), "suggestions"),
        ("find_rxcui", json!({"name": "x"}), "exact"),
        ("get_all_related_info", json!({"rxcui": "1"}), "related"),
        ("get_ndc_properties", json!({"ndc": "1"}), "data"),
        ("get_rxcui_history_status", json!({"rxcui": "1"}), "data"),
        ("get_rxterms_info", json!({"rxcui": "1"}), "rxtermsInfo"),
    ];
    for (name, args, success_field) in cases {
        let out = registry.execute(name, args).await;
        let error = out["error"].as_str().unwrap_or_default();
        assert!(!error.is_empty(), "{name} missing error field");
        assert!(
            out.get(success_field).is_none(),
            "{name} leaked success field {success_field}"
        );
    }
}

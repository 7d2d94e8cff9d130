//! Discovery tests
mod common;

use serde_json::{json, Map, Value};

use habskill_core::types::Item;

use common::*;

fn discover() -> Value {
    json!({
        "directive": {
            "header": {
                "namespace": "Alexa.Discovery",
                "name": "Discover",
                "payloadVersion": "3",
                "messageId": "message-id",
            },
            "payload": {"scope": {"type": "BearerToken", "token": "access-token"}},
        }
    })
}

#[test_log::test(tokio::test)]
async fn test_discover_slow_cooker() {
    let items = vec![Item::new("slowCooker", "Switch")
        .with_label("Slow Cooker")
        .with_state("OFF")
        .with_metadata("SlowCooker", Map::new())];
    let harness = Harness::new(MockBackend::with_items(items));

    let response = harness.handle(discover()).await;

    assert_eq!(header(&response), ("Alexa.Discovery", "Discover.Response"));
    assert!(response["event"].get("endpoint").is_none());

    let endpoints = response["event"]["payload"]["endpoints"].as_array().unwrap();
    assert_eq!(endpoints.len(), 1);
    assert_eq!(endpoints[0]["endpointId"], json!("slowCooker"));
    assert_eq!(endpoints[0]["displayCategories"], json!(["SLOW_COOKER"]));
    assert!(harness.backend.relayed().is_empty());
}

#[tokio::test]
async fn test_discovered_cookie_roundtrip() {
    let items = vec![Item::new("slowCooker", "Switch")
        .with_label("Slow Cooker")
        .with_state("OFF")
        .with_metadata("SlowCooker", Map::new())];
    let harness = Harness::new(MockBackend::with_items(items));

    let response = harness.handle(discover()).await;
    let endpoint = &response["event"]["payload"]["endpoints"][0];

    let response = harness
        .handle(directive(
            "Alexa.PowerController",
            "TurnOn",
            None,
            "slowCooker",
            endpoint["cookie"].clone(),
            json!({}),
        ))
        .await;

    assert_eq!(header(&response), ("Alexa", "Response"));
    assert_eq!(
        harness.backend.commands(),
        vec![("slowCooker".to_string(), "ON".to_string())]
    );
    assert_eq!(
        context_property(&response, "Alexa.PowerController", "powerState", None),
        Some(&json!("OFF"))
    );
    assert_eq!(
        context_property(&response, "Alexa.EndpointHealth", "connectivity", None),
        Some(&json!({"value": "OK"}))
    );
}

#[tokio::test]
async fn test_discover_without_items() {
    let harness = Harness::new(MockBackend::default());

    let response = harness.handle(discover()).await;

    assert_eq!(header(&response), ("Alexa.Discovery", "Discover.Response"));
    assert_eq!(response["event"]["payload"]["endpoints"], json!([]));
}

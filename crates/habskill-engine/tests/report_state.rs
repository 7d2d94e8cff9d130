//! State report and binding relay tests
mod common;

use serde_json::{json, Map, Value};

use habskill_core::types::{Item, ServerSettings};
use habskill_devices::capability::{Capability, CapabilityKind};
use habskill_devices::property::{Property, PropertyKind};

use common::*;

fn light_cookie(item: &Item) -> Value {
    let mut health = Capability::new(CapabilityKind::EndpointHealth);
    health.add_property(
        Property::bind(PropertyKind::Connectivity, None, &Map::new(), &ServerSettings::default()).unwrap(),
    );

    cookie(&[
        capability(
            CapabilityKind::PowerController,
            bind(PropertyKind::PowerState, item, json!({})),
        ),
        health,
    ])
}

fn report_state(cookie: Value) -> Value {
    directive("Alexa", "ReportState", None, "light", cookie, json!({}))
}

#[test_log::test(tokio::test)]
async fn test_report_state() {
    let item = Item::new("light", "Switch").with_state("ON");
    let harness = Harness::new(MockBackend::with_items(vec![item.clone()]));

    let response = harness.handle(report_state(light_cookie(&item))).await;

    assert_eq!(header(&response), ("Alexa", "StateReport"));
    assert_eq!(
        context_property(&response, "Alexa.PowerController", "powerState", None),
        Some(&json!("ON"))
    );
    assert_eq!(
        context_property(&response, "Alexa.EndpointHealth", "connectivity", None),
        Some(&json!({"value": "OK"}))
    );
    for property in response["context"]["properties"].as_array().unwrap() {
        assert!(property["timeOfSample"].is_string());
        assert_eq!(property["uncertaintyInMilliseconds"], json!(0));
    }
    assert!(harness.backend.commands().is_empty());
}

#[tokio::test]
async fn test_report_state_undefined() {
    let item = Item::new("light", "Switch").with_state("UNDEF");
    let harness = Harness::new(MockBackend::with_items(vec![item.clone()]));

    let response = harness.handle(report_state(light_cookie(&item))).await;

    assert_eq!(header(&response), ("Alexa", "ErrorResponse"));
    assert_eq!(error(&response), ("ENDPOINT_UNREACHABLE", "Unable to reach device"));
    assert!(response.get("context").is_none());
    assert!(harness.backend.commands().is_empty());
    assert!(harness.backend.updates().is_empty());
}

#[tokio::test]
async fn test_report_state_missing_item() {
    let item = Item::new("light", "Switch").with_state("ON");
    let harness = Harness::new(MockBackend::default());

    let response = harness.handle(report_state(light_cookie(&item))).await;

    assert_eq!(error(&response), ("ENDPOINT_UNREACHABLE", "Unable to reach device"));
}

#[tokio::test]
async fn test_binding_relay() {
    let harness = Harness::new(MockBackend::with_items(Vec::new()));

    let response = harness.handle(report_state(json!({"binding": true}))).await;

    assert_eq!(header(&response), ("Alexa", "DeferredResponse"));
    assert_eq!(
        response["event"]["header"]["correlationToken"],
        json!("correlation-token")
    );

    let relayed = harness.backend.relayed();
    assert_eq!(relayed.len(), 1);
    assert_eq!(relayed[0]["directive"]["header"]["name"], json!("ReportState"));
    assert_eq!(relayed[0]["directive"]["endpoint"]["endpointId"], json!("light"));
    assert_eq!(
        relayed[0]["context"]["endpoints"],
        json!({"event": "https://foo/v3/events", "token": "https://bar/auth/token"})
    );
}

#[tokio::test]
async fn test_binding_unexpected_status() {
    let harness = Harness::new(MockBackend {
        relay_status: Some(200),
        ..Default::default()
    });

    let response = harness.handle(report_state(json!({"binding": true}))).await;

    assert_eq!(error(&response), ("BRIDGE_UNREACHABLE", "Unable to communicate with binding"));
    assert_eq!(harness.backend.relayed().len(), 1);
}

#[tokio::test]
async fn test_binding_unreachable() {
    let harness = Harness::new(MockBackend {
        relay_status: None,
        ..Default::default()
    });

    let response = harness
        .handle(directive(
            "Alexa.PowerController",
            "TurnOn",
            None,
            "light",
            json!({"binding": "true"}),
            json!({}),
        ))
        .await;

    assert_eq!(error(&response), ("BRIDGE_UNREACHABLE", "Unable to communicate with binding"));
    assert!(harness.backend.commands().is_empty());
}

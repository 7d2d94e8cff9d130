use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use habskill_core::config::{SharedConfig, SkillConfig};
use habskill_core::types::{Item, ServerSettings};
use habskill_engine::{Backend, Credentials, Dispatcher, HandlerContext, MemoryCredentialStore, TokenExchange};

/// An openHAB server kept in memory, applying commands as state updates
#[derive(Debug, Default)]
struct InMemoryServer {
    items: RwLock<HashMap<String, Item>>,
}

impl InMemoryServer {
    fn new(items: Vec<Item>) -> Self {
        Self {
            items: RwLock::new(items.into_iter().map(|item| (item.name.clone(), item)).collect()),
        }
    }
}

#[async_trait]
impl Backend for InMemoryServer {
    async fn fetch_all_items(&self) -> anyhow::Result<Vec<Item>> {
        let items = self.items.read().map_err(|e| anyhow::anyhow!("{}", e))?;
        Ok(items.values().cloned().collect())
    }

    async fn get_item(&self, name: &str) -> anyhow::Result<Option<Item>> {
        let items = self.items.read().map_err(|e| anyhow::anyhow!("{}", e))?;
        Ok(items.get(name).cloned())
    }

    async fn send_command(&self, name: &str, value: &str) -> anyhow::Result<()> {
        self.post_update(name, value).await
    }

    async fn post_update(&self, name: &str, value: &str) -> anyhow::Result<()> {
        let mut items = self.items.write().map_err(|e| anyhow::anyhow!("{}", e))?;
        let item = items
            .get_mut(name)
            .ok_or_else(|| anyhow::anyhow!("Item {} not found", name))?;
        item.state = Some(value.to_string());
        Ok(())
    }

    async fn get_server_settings(&self) -> anyhow::Result<ServerSettings> {
        Ok(ServerSettings::default())
    }

    async fn send_alexa_directive(&self, _body: &Value) -> anyhow::Result<u16> {
        anyhow::bail!("No Alexa binding installed")
    }
}

/// Token exchange of a skill without account linking
#[derive(Debug)]
struct NoAccountLinking;

#[async_trait]
impl TokenExchange for NoAccountLinking {
    async fn get_access_token(&self, _code: &str) -> anyhow::Result<Credentials> {
        anyhow::bail!("Account linking is not configured")
    }
}

fn request(namespace: &str, name: &str, endpoint: Option<&Value>, payload: Value) -> Value {
    let mut directive = json!({
        "header": {
            "namespace": namespace,
            "name": name,
            "payloadVersion": "3",
            "messageId": uuid::Uuid::new_v4().to_string(),
            "correlationToken": "example",
        },
        "payload": payload,
    });
    if let Some(endpoint) = endpoint {
        directive["endpoint"] = json!({
            "endpointId": endpoint["endpointId"],
            "cookie": endpoint["cookie"],
        });
    }
    json!({ "directive": directive })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    habskill_core::logging::init()?;

    let mut fan_speed = Map::new();
    fan_speed.insert("supportedRange".to_string(), json!("0:100:10"));

    let server = InMemoryServer::new(vec![
        Item::new("KitchenLight", "Dimmer")
            .with_label("Kitchen Light")
            .with_state("40")
            .with_metadata("Light", Map::new()),
        Item::new("SlowCooker", "Switch")
            .with_label("Slow Cooker")
            .with_state("OFF")
            .with_metadata("SlowCooker", Map::new()),
        Item::new("FanSpeed", "Number")
            .with_label("Fan Speed")
            .with_state("30")
            .with_metadata("RangeController.rangeValue", fan_speed),
    ]);

    let context = HandlerContext::new(
        Arc::new(server),
        Arc::new(MemoryCredentialStore::new()),
        Arc::new(NoAccountLinking),
        SharedConfig::new(SkillConfig::default()),
    );
    let dispatcher = Dispatcher::with_default_handlers(context);

    println!("Discovering endpoints...");
    let response = dispatcher.handle(&request("Alexa.Discovery", "Discover", None, json!({}))).await;
    let endpoints = response["event"]["payload"]["endpoints"]
        .as_array()
        .cloned()
        .unwrap_or_default();
    for endpoint in &endpoints {
        println!("  {} ({})", endpoint["friendlyName"], endpoint["displayCategories"]);
    }

    let Some(light) = endpoints.iter().find(|endpoint| endpoint["endpointId"] == "KitchenLight") else {
        return Err("Kitchen light not discovered".into());
    };

    println!("Dimming the kitchen light...");
    let response = dispatcher
        .handle(&request(
            "Alexa.BrightnessController",
            "AdjustBrightness",
            Some(light),
            json!({"brightnessDelta": -15}),
        ))
        .await;
    println!("{}", serde_json::to_string_pretty(&response)?);

    println!("Reporting the kitchen light state...");
    let response = dispatcher
        .handle(&request("Alexa", "ReportState", Some(light), json!({})))
        .await;
    println!("{}", serde_json::to_string_pretty(&response["context"])?);

    Ok(())
}

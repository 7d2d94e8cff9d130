//! Test doubles and directive builders shared by the engine integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use habskill_core::config::{SharedConfig, SkillConfig};
use habskill_core::types::{Item, ServerSettings};
use habskill_devices::capability::{Capability, CapabilityKind};
use habskill_devices::cookie::encode_capabilities;
use habskill_devices::property::{Property, PropertyKind};
use habskill_engine::{
    Backend, Credentials, Dispatcher, HandlerContext, MemoryCredentialStore, TokenExchange,
};

/// In-memory openHAB server recording every write
#[derive(Debug, Default)]
pub struct MockBackend {
    pub items: Vec<Item>,
    pub settings: ServerSettings,
    /// Status returned by the binding, `None` for a transport failure
    pub relay_status: Option<u16>,
    pub commands: Mutex<Vec<(String, String)>>,
    pub updates: Mutex<Vec<(String, String)>>,
    pub relayed: Mutex<Vec<Value>>,
}

impl MockBackend {
    pub fn with_items(items: Vec<Item>) -> Self {
        Self {
            items,
            relay_status: Some(202),
            ..Default::default()
        }
    }

    pub fn commands(&self) -> Vec<(String, String)> {
        self.commands.lock().unwrap().clone()
    }

    pub fn updates(&self) -> Vec<(String, String)> {
        self.updates.lock().unwrap().clone()
    }

    pub fn relayed(&self) -> Vec<Value> {
        self.relayed.lock().unwrap().clone()
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn fetch_all_items(&self) -> anyhow::Result<Vec<Item>> {
        Ok(self.items.clone())
    }

    async fn get_item(&self, name: &str) -> anyhow::Result<Option<Item>> {
        Ok(self.items.iter().find(|item| item.name == name).cloned())
    }

    async fn send_command(&self, name: &str, value: &str) -> anyhow::Result<()> {
        self.commands.lock().unwrap().push((name.to_string(), value.to_string()));
        Ok(())
    }

    async fn post_update(&self, name: &str, value: &str) -> anyhow::Result<()> {
        self.updates.lock().unwrap().push((name.to_string(), value.to_string()));
        Ok(())
    }

    async fn get_server_settings(&self) -> anyhow::Result<ServerSettings> {
        Ok(self.settings.clone())
    }

    async fn send_alexa_directive(&self, body: &Value) -> anyhow::Result<u16> {
        self.relayed.lock().unwrap().push(body.clone());
        self.relay_status.ok_or_else(|| anyhow::anyhow!("connection refused"))
    }
}

/// Token exchange returning fixed credentials, or failing
#[derive(Debug, Default)]
pub struct MockTokens {
    pub credentials: Option<Credentials>,
    pub codes: Mutex<Vec<String>>,
}

impl MockTokens {
    pub fn new() -> Self {
        Self {
            credentials: Some(credentials()),
            codes: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenExchange for MockTokens {
    async fn get_access_token(&self, code: &str) -> anyhow::Result<Credentials> {
        self.codes.lock().unwrap().push(code.to_string());
        self.credentials
            .clone()
            .ok_or_else(|| anyhow::anyhow!("invalid grant"))
    }
}

pub fn credentials() -> Credentials {
    Credentials {
        access_token: "foo".to_string(),
        refresh_token: "bar".to_string(),
        token_type: "bearer".to_string(),
        expires_in: 42,
    }
}

pub fn config() -> SkillConfig {
    let mut config = SkillConfig::default();
    config.alexa.api_url = "https://foo".to_string();
    config.skill.api_url = Some("https://bar".to_string());
    config
}

/// A dispatcher with its collaborators
pub struct Harness {
    pub backend: Arc<MockBackend>,
    pub credentials: Arc<MemoryCredentialStore>,
    pub tokens: Arc<MockTokens>,
    pub dispatcher: Dispatcher,
}

impl Harness {
    pub fn new(backend: MockBackend) -> Self {
        Self::with_tokens(backend, MockTokens::new())
    }

    pub fn with_tokens(backend: MockBackend, tokens: MockTokens) -> Self {
        let backend = Arc::new(backend);
        let credentials = Arc::new(MemoryCredentialStore::new());
        let tokens = Arc::new(tokens);

        let context = HandlerContext::new(
            backend.clone(),
            credentials.clone(),
            tokens.clone(),
            SharedConfig::new(config()),
        );

        Self {
            backend,
            credentials,
            tokens,
            dispatcher: Dispatcher::with_default_handlers(context),
        }
    }

    pub async fn handle(&self, request: Value) -> Value {
        self.dispatcher.handle(&request).await
    }
}

/// Bind a property to an item
pub fn bind(kind: PropertyKind, item: &Item, config: Value) -> Property {
    let config: Map<String, Value> = config.as_object().cloned().unwrap_or_default();
    Property::bind(kind, Some(item), &config, &ServerSettings::default()).unwrap()
}

/// Build a capability holding one property
pub fn capability(kind: CapabilityKind, property: Property) -> Capability {
    let mut capability = if kind.is_multi_instance() {
        Capability::with_instance(kind, property.item_name().unwrap())
    } else {
        Capability::new(kind)
    };
    capability.add_property(property);
    capability
}

/// Build an endpoint cookie for capabilities
pub fn cookie(capabilities: &[Capability]) -> Value {
    json!({ "capabilities": encode_capabilities(capabilities).unwrap() })
}

/// Build an endpoint scoped directive request
pub fn directive(
    namespace: &str,
    name: &str,
    instance: Option<&str>,
    endpoint_id: &str,
    cookie: Value,
    payload: Value,
) -> Value {
    let mut header = json!({
        "namespace": namespace,
        "name": name,
        "payloadVersion": "3",
        "messageId": "message-id",
        "correlationToken": "correlation-token",
    });
    if let Some(instance) = instance {
        header["instance"] = json!(instance);
    }

    json!({
        "directive": {
            "header": header,
            "endpoint": {
                "scope": {"type": "BearerToken", "token": "access-token"},
                "endpointId": endpoint_id,
                "cookie": cookie,
            },
            "payload": payload,
        }
    })
}

/// Find a context property by namespace, name and optional instance
pub fn context_property<'a>(
    response: &'a Value,
    namespace: &str,
    name: &str,
    instance: Option<&str>,
) -> Option<&'a Value> {
    response["context"]["properties"]
        .as_array()?
        .iter()
        .find(|property| {
            property["namespace"] == json!(namespace)
                && property["name"] == json!(name)
                && property.get("instance").and_then(Value::as_str) == instance
        })
        .map(|property| &property["value"])
}

pub fn header(response: &Value) -> (&str, &str) {
    let header = &response["event"]["header"];
    (
        header["namespace"].as_str().unwrap_or_default(),
        header["name"].as_str().unwrap_or_default(),
    )
}

pub fn error(response: &Value) -> (&str, &str) {
    let payload = &response["event"]["payload"];
    (
        payload["type"].as_str().unwrap_or_default(),
        payload["message"].as_str().unwrap_or_default(),
    )
}

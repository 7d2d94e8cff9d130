/*!
 * Outbound response events.
 *
 * A response is built once by a handler (or by the dispatcher for errors) and
 * serialized into the Alexa event format:
 *
 * ```text
 * {"event": {"header": {...}, "endpoint": {...}, "payload": {...}}, "context": {"properties": [...]}}
 * ```
 */
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use habskill_devices::capability::Capability;
use habskill_devices::property::Property;

use crate::directive::{Directive, PAYLOAD_VERSION};
use crate::error::{Error, Result};

/// Alexa namespace of generic events
pub const ALEXA_NAMESPACE: &str = "Alexa";

/// Name of command responses
pub const RESPONSE_NAME: &str = "Response";

/// Name of error responses
pub const ERROR_RESPONSE_NAME: &str = "ErrorResponse";

/// Name of deferred responses
pub const DEFERRED_RESPONSE_NAME: &str = "DeferredResponse";

/// A property reported in the response context
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextProperty {
    /// The interface namespace
    pub namespace: String,
    /// The capability instance
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    /// The property name
    pub name: String,
    /// The property value
    pub value: Value,
    /// When the value was read
    pub time_of_sample: DateTime<Utc>,
    /// Uncertainty of the value
    pub uncertainty_in_milliseconds: u64,
}

impl ContextProperty {
    /// Create a context property read now
    pub fn new(capability: &Capability, property: &Property, value: Value) -> Self {
        Self {
            namespace: capability.interface(),
            instance: capability.instance().map(str::to_string),
            name: property.name().to_string(),
            value,
            time_of_sample: Utc::now(),
            uncertainty_in_milliseconds: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct EventHeader {
    namespace: String,
    name: String,
    message_id: String,
    payload_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct EventEndpoint {
    endpoint_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<Value>,
}

/// A response event
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    header: EventHeader,
    endpoint: Option<EventEndpoint>,
    payload: Value,
    properties: Vec<ContextProperty>,
}

impl Response {
    /// Create a response event
    ///
    /// # Arguments
    ///
    /// * `directive` - The directive being answered, its correlation token and endpoint are echoed
    /// * `namespace` - The event namespace
    /// * `name` - The event name
    pub fn new<N: Into<String>, M: Into<String>>(directive: Option<&Directive>, namespace: N, name: M) -> Self {
        let endpoint = directive
            .and_then(|directive| directive.endpoint.as_ref())
            .and_then(|endpoint| {
                Some(EventEndpoint {
                    endpoint_id: endpoint.get("endpointId")?.as_str()?.to_string(),
                    scope: endpoint.get("scope").cloned(),
                })
            });

        Self {
            header: EventHeader {
                namespace: namespace.into(),
                name: name.into(),
                message_id: Uuid::new_v4().to_string(),
                payload_version: PAYLOAD_VERSION.to_string(),
                correlation_token: directive.and_then(|directive| directive.header.correlation_token.clone()),
            },
            endpoint,
            payload: json!({}),
            properties: Vec::new(),
        }
    }

    /// Create an `Alexa.Response` event
    pub fn command(directive: &Directive) -> Self {
        Self::new(Some(directive), ALEXA_NAMESPACE, RESPONSE_NAME)
    }

    /// Create an `Alexa.DeferredResponse` event
    pub fn deferred(directive: &Directive) -> Self {
        Self::new(Some(directive), ALEXA_NAMESPACE, DEFERRED_RESPONSE_NAME)
    }

    /// Create an error response event
    pub fn error(directive: Option<&Directive>, error: &Error) -> Self {
        Self::new(directive, error.namespace(), ERROR_RESPONSE_NAME).with_payload(json!({
            "type": error.kind(),
            "message": error.to_string(),
        }))
    }

    /// Set the payload
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    /// Set the context properties
    pub fn with_properties(mut self, properties: Vec<ContextProperty>) -> Self {
        self.properties = properties;
        self
    }

    /// Drop the endpoint, for events not scoped to an endpoint
    pub fn without_endpoint(mut self) -> Self {
        self.endpoint = None;
        self
    }

    /// Get the event namespace
    pub fn namespace(&self) -> &str {
        &self.header.namespace
    }

    /// Get the event name
    pub fn name(&self) -> &str {
        &self.header.name
    }

    /// Get the payload
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// Get the context properties
    pub fn properties(&self) -> &[ContextProperty] {
        &self.properties
    }

    /// Check if this is an error response
    pub fn is_error(&self) -> bool {
        self.header.name == ERROR_RESPONSE_NAME
    }

    /// Serialize the response event
    pub fn to_json(&self) -> Result<Value> {
        let mut event = json!({
            "header": serde_json::to_value(&self.header)?,
            "payload": self.payload,
        });
        if let Some(endpoint) = &self.endpoint {
            event["endpoint"] = serde_json::to_value(endpoint)?;
        }

        let mut response = json!({ "event": event });
        if !self.properties.is_empty() {
            response["context"] = json!({ "properties": serde_json::to_value(&self.properties)? });
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directive() -> Directive {
        Directive::parse(&json!({
            "header": {
                "namespace": "Alexa",
                "name": "ReportState",
                "messageId": "message-id",
                "correlationToken": "correlation-token"
            },
            "endpoint": {
                "endpointId": "switch",
                "scope": {"type": "BearerToken", "token": "access-token"},
                "cookie": {}
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_error_response() {
        let response = Response::error(Some(&directive()), &Error::endpoint_unreachable("Unable to reach device"))
            .to_json()
            .unwrap();

        let header = &response["event"]["header"];
        assert_eq!(header["namespace"], json!("Alexa"));
        assert_eq!(header["name"], json!("ErrorResponse"));
        assert_eq!(header["payloadVersion"], json!("3"));
        assert_eq!(header["correlationToken"], json!("correlation-token"));
        assert_ne!(header["messageId"], json!("message-id"));
        assert_eq!(response["event"]["endpoint"]["endpointId"], json!("switch"));
        assert_eq!(
            response["event"]["payload"],
            json!({"type": "ENDPOINT_UNREACHABLE", "message": "Unable to reach device"})
        );
        assert!(response.get("context").is_none());
    }

    #[test]
    fn test_authorization_error_namespace() {
        let response = Response::error(None, &Error::accept_grant_failed("Missing authorization parameters"));
        assert_eq!(response.namespace(), "Alexa.Authorization");
        assert!(response.is_error());

        let json = response.to_json().unwrap();
        assert!(json["event"].get("endpoint").is_none());
        assert!(json["event"]["header"].get("correlationToken").is_none());
    }

    #[test]
    fn test_context_properties() {
        use habskill_core::types::{Item, ServerSettings};
        use habskill_devices::capability::CapabilityKind;
        use habskill_devices::property::PropertyKind;
        use serde_json::Map;

        let item = Item::new("switch", "Switch");
        let property =
            Property::bind(PropertyKind::PowerState, Some(&item), &Map::new(), &ServerSettings::default()).unwrap();
        let mut capability = Capability::new(CapabilityKind::PowerController);
        capability.add_property(property.clone());

        let response = Response::command(&directive())
            .with_properties(vec![ContextProperty::new(&capability, &property, json!("ON"))])
            .to_json()
            .unwrap();

        let properties = response["context"]["properties"].as_array().unwrap();
        assert_eq!(properties.len(), 1);
        assert_eq!(properties[0]["namespace"], json!("Alexa.PowerController"));
        assert_eq!(properties[0]["name"], json!("powerState"));
        assert_eq!(properties[0]["value"], json!("ON"));
        assert_eq!(properties[0]["uncertaintyInMilliseconds"], json!(0));
        assert!(properties[0].get("instance").is_none());
        assert!(properties[0]["timeOfSample"].is_string());
    }
}

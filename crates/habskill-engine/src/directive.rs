/*!
 * Inbound directives.
 */
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Supported directive payload version
pub const PAYLOAD_VERSION: &str = "3";

fn default_payload_version() -> String {
    PAYLOAD_VERSION.to_string()
}

/// Directive header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    /// The interface namespace (e.g. "Alexa.PowerController")
    pub namespace: String,
    /// The directive name (e.g. "TurnOn")
    pub name: String,
    /// The capability instance of multi-instance interfaces
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    /// The payload version
    #[serde(default = "default_payload_version")]
    pub payload_version: String,
    /// The message id
    #[serde(default)]
    pub message_id: String,
    /// The correlation token, echoed in the response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_token: Option<String>,
}

/// An inbound directive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Directive {
    /// The header
    pub header: Header,
    /// The target endpoint (id, scope and cookie)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<Value>,
    /// The payload
    #[serde(default)]
    pub payload: Value,
}

impl Directive {
    /// Parse a directive from a request, with or without the `directive` envelope
    ///
    /// # Errors
    ///
    /// Returns an invalid directive error if the request is malformed or its
    /// payload version is not supported
    pub fn parse(request: &Value) -> Result<Self> {
        let directive = request.get("directive").unwrap_or(request);
        let directive: Directive = serde_json::from_value(directive.clone())
            .map_err(|e| Error::invalid_directive(format!("Malformed directive: {}", e)))?;

        if directive.header.payload_version != PAYLOAD_VERSION {
            return Err(Error::invalid_directive(format!(
                "Unsupported payload version {}",
                directive.header.payload_version
            )));
        }

        Ok(directive)
    }

    /// Get the namespace
    pub fn namespace(&self) -> &str {
        &self.header.namespace
    }

    /// Get the name
    pub fn name(&self) -> &str {
        &self.header.name
    }

    /// Get the instance
    pub fn instance(&self) -> Option<&str> {
        self.header.instance.as_deref()
    }

    /// Get the endpoint id
    pub fn endpoint_id(&self) -> Option<&str> {
        self.endpoint.as_ref()?.get("endpointId")?.as_str()
    }

    /// Get a payload field
    pub fn payload_field(&self, name: &str) -> Option<&Value> {
        self.payload.get(name).filter(|value| !value.is_null())
    }

    /// Serialize the directive
    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

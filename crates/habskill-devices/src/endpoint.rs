/*!
 * Endpoints.
 *
 * An `Endpoint` is built by discovery and serialized into a discovery
 * descriptor. A `ResolvedEndpoint` is rebuilt from the endpoint of an
 * inbound directive, its capabilities restored from the cookie.
 */
use serde_json::{json, Map, Value};

use crate::capability::{Capability, CapabilityKind};
use crate::category::DisplayCategory;
use crate::cookie::{encode_capabilities, EndpointCookie, CAPABILITIES_KEY};
use crate::error::{DeviceError, Result};
use crate::property::{Property, PropertyKind};

/// Manufacturer name reported at discovery
pub const MANUFACTURER_NAME: &str = "openHAB";

/// A discovered endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    /// The endpoint id (the item name)
    pub id: String,
    /// The friendly name
    pub friendly_name: String,
    /// The description
    pub description: String,
    /// The display categories
    pub display_categories: Vec<DisplayCategory>,
    /// The capabilities, the `Alexa` capability last
    pub capabilities: Vec<Capability>,
}

impl Endpoint {
    /// Build the endpoint cookie
    pub fn cookie(&self) -> Result<Map<String, Value>> {
        let bound: Vec<Capability> = self
            .capabilities
            .iter()
            .filter(|capability| !capability.is_empty())
            .cloned()
            .collect();

        let mut cookie = Map::new();
        cookie.insert(CAPABILITIES_KEY.to_string(), json!(encode_capabilities(&bound)?));
        Ok(cookie)
    }

    /// Build the discovery descriptor
    ///
    /// # Arguments
    ///
    /// * `locale` - The locale used for text resources
    pub fn to_discovery(&self, locale: &str) -> Result<Value> {
        let categories: Vec<&str> = self.display_categories.iter().map(DisplayCategory::as_str).collect();
        let capabilities: Vec<Value> = self
            .capabilities
            .iter()
            .map(|capability| capability.descriptor(locale))
            .collect();

        Ok(json!({
            "endpointId": self.id,
            "friendlyName": self.friendly_name,
            "description": self.description,
            "manufacturerName": MANUFACTURER_NAME,
            "displayCategories": categories,
            "capabilities": capabilities,
            "cookie": self.cookie()?,
        }))
    }
}

/// An endpoint resolved from an inbound directive
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEndpoint {
    /// The endpoint id
    pub id: String,
    /// The directive endpoint scope, echoed in responses
    pub scope: Option<Value>,
    /// The decoded cookie
    pub cookie: EndpointCookie,
    capabilities: Vec<Capability>,
}

impl ResolvedEndpoint {
    /// Read the endpoint of a directive, without decoding the capabilities
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint id or the cookie is missing
    pub fn from_value(endpoint: &Value) -> Result<Self> {
        let id = endpoint
            .get("endpointId")
            .and_then(Value::as_str)
            .ok_or_else(|| DeviceError::invalid_cookie("missing endpoint id"))?;
        let cookie = endpoint
            .get("cookie")
            .ok_or_else(|| DeviceError::invalid_cookie("missing endpoint cookie"))
            .and_then(EndpointCookie::from_value)?;

        Ok(Self {
            id: id.to_string(),
            scope: endpoint.get("scope").cloned(),
            cookie,
            capabilities: Vec::new(),
        })
    }

    /// Decode the capabilities from the cookie
    ///
    /// # Errors
    ///
    /// Returns an error if the cookie is malformed or yields no capability
    pub fn resolve(mut self) -> Result<Self> {
        self.capabilities = self.cookie.decode_capabilities()?;
        if self.capabilities.is_empty() {
            return Err(DeviceError::invalid_cookie("no usable capability"));
        }
        Ok(self)
    }

    /// Create a resolved endpoint from capabilities
    pub fn new<S: Into<String>>(id: S, capabilities: Vec<Capability>) -> Self {
        Self {
            id: id.into(),
            scope: None,
            cookie: EndpointCookie::default(),
            capabilities,
        }
    }

    /// Check if the endpoint is handled by the openHAB Alexa binding
    pub fn is_binding(&self) -> bool {
        self.cookie.binding
    }

    /// Get the capabilities
    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    /// Get a capability by kind and optional instance
    pub fn capability(&self, kind: CapabilityKind, instance: Option<&str>) -> Option<&Capability> {
        self.capabilities
            .iter()
            .find(|capability| capability.kind() == kind && (instance.is_none() || capability.instance() == instance))
    }

    /// Get a property by capability, property kind and optional instance
    pub fn property(&self, kind: CapabilityKind, property: PropertyKind, instance: Option<&str>) -> Option<&Property> {
        self.capability(kind, instance)
            .and_then(|capability| capability.property(property))
    }

    /// Get the reportable properties with their capability
    pub fn reportable_properties(&self) -> Vec<(&Capability, &Property)> {
        self.capabilities
            .iter()
            .flat_map(|capability| {
                capability
                    .reportable_properties()
                    .map(move |property| (capability, property))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use habskill_core::types::{Item, ServerSettings};

    fn endpoint() -> Endpoint {
        let item = Item::new("fan", "Switch").with_label("Fan");
        let mut power = Capability::new(CapabilityKind::PowerController);
        power.add_property(
            Property::bind(PropertyKind::PowerState, Some(&item), &Map::new(), &ServerSettings::default()).unwrap(),
        );
        let mut toggle = Capability::with_instance(CapabilityKind::ToggleController, "fan");
        toggle.add_property(
            Property::bind(PropertyKind::ToggleState, Some(&item), &Map::new(), &ServerSettings::default())
                .unwrap(),
        );

        Endpoint {
            id: "fan".to_string(),
            friendly_name: "Fan".to_string(),
            description: "Switch fan via openHAB".to_string(),
            display_categories: vec![DisplayCategory::Fan],
            capabilities: vec![power, toggle, Capability::new(CapabilityKind::Alexa)],
        }
    }

    #[test]
    fn test_discovery_descriptor() {
        let descriptor = endpoint().to_discovery("en-US").unwrap();
        assert_eq!(descriptor["manufacturerName"], json!("openHAB"));
        assert_eq!(descriptor["displayCategories"], json!(["FAN"]));
        assert_eq!(descriptor["capabilities"].as_array().unwrap().len(), 3);
        assert!(descriptor["cookie"]["capabilities"].as_str().unwrap().starts_with("1:"));
    }

    #[test]
    fn test_resolve_from_directive() {
        let endpoint = endpoint();
        let directive_endpoint = json!({
            "endpointId": "fan",
            "scope": {"type": "BearerToken", "token": "token"},
            "cookie": endpoint.cookie().unwrap(),
        });

        let resolved = ResolvedEndpoint::from_value(&directive_endpoint)
            .and_then(ResolvedEndpoint::resolve)
            .unwrap();

        assert_eq!(resolved.id, "fan");
        assert!(!resolved.is_binding());
        assert_eq!(resolved.capabilities(), &endpoint.capabilities[..2]);
        assert!(resolved
            .property(CapabilityKind::ToggleController, PropertyKind::ToggleState, Some("Toggle:fan"))
            .is_some());
        assert!(resolved
            .property(CapabilityKind::ToggleController, PropertyKind::ToggleState, Some("Toggle:other"))
            .is_none());
        assert_eq!(resolved.reportable_properties().len(), 2);
    }

    #[test]
    fn test_resolve_errors() {
        assert!(ResolvedEndpoint::from_value(&json!({"endpointId": "fan"})).is_err());

        let resolved = ResolvedEndpoint::from_value(&json!({"endpointId": "fan", "cookie": {}})).unwrap();
        assert!(resolved.resolve().is_err());
    }
}

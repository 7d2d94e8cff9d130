/*!
 * Endpoint cookie codec.
 *
 * Capabilities are serialized in the endpoint cookie at discovery and
 * restored from it on every directive. The capabilities entry is versioned:
 *
 * ```text
 * "1:" + base64url_nopad(deflate(json))
 * ```
 *
 * where `json` is an array of entries, one per property:
 *
 * ```text
 * [interface, instance|null, property, itemName|null, itemType|null, tag|null, parameters]
 * ```
 */
use serde_json::{json, Map, Value};
use tracing::debug;

use habskill_core::utils::{compress_json, decompress_json};

use crate::capability::{Capability, CapabilityKind};
use crate::error::{DeviceError, Result};
use crate::property::{ItemRef, Property};

/// Current cookie capabilities version
pub const COOKIE_VERSION: u32 = 1;

/// Cookie key of the serialized capabilities
pub const CAPABILITIES_KEY: &str = "capabilities";

/// Cookie key of the binding flag
pub const BINDING_KEY: &str = "binding";

/// The cookie of a directive endpoint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EndpointCookie {
    /// Whether the endpoint is handled by the openHAB Alexa binding
    pub binding: bool,
    /// The serialized capabilities
    pub capabilities: Option<String>,
}

impl EndpointCookie {
    /// Read a cookie object
    ///
    /// # Returns
    ///
    /// The cookie, or an error if the cookie is not an object
    pub fn from_value(value: &Value) -> Result<Self> {
        let cookie = value
            .as_object()
            .ok_or_else(|| DeviceError::invalid_cookie("cookie is not an object"))?;

        let binding = match cookie.get(BINDING_KEY) {
            Some(Value::Bool(binding)) => *binding,
            Some(Value::String(binding)) => binding.eq_ignore_ascii_case("true"),
            _ => false,
        };

        Ok(Self {
            binding,
            capabilities: cookie
                .get(CAPABILITIES_KEY)
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }

    /// Decode the capabilities
    pub fn decode_capabilities(&self) -> Result<Vec<Capability>> {
        let encoded = self
            .capabilities
            .as_deref()
            .ok_or_else(|| DeviceError::invalid_cookie("missing capabilities"))?;
        decode_capabilities(encoded)
    }
}

fn entry(capability: &Capability, property: &Property) -> Value {
    let item = property.item();
    json!([
        capability.interface(),
        capability.instance(),
        property.name(),
        item.map(|item| item.name.as_str()),
        item.map(|item| item.item_type.as_str()),
        property.tag(),
        Value::Object(property.parameters().to_json()),
    ])
}

/// Encode capabilities into the cookie representation
pub fn encode_capabilities(capabilities: &[Capability]) -> Result<String> {
    let entries: Vec<Value> = capabilities
        .iter()
        .flat_map(|capability| {
            capability
                .properties()
                .iter()
                .map(move |property| entry(capability, property))
        })
        .collect();

    let compressed = compress_json(&Value::from(entries))?;
    Ok(format!("{}:{}", COOKIE_VERSION, compressed))
}

fn optional_string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

/// Restore one entry, `None` when it no longer binds
fn restore_entry(entry: &[Value]) -> Result<Option<(CapabilityKind, Option<String>, Property)>> {
    let [interface, instance, name, item_name, item_type, tag, parameters] = entry else {
        return Err(DeviceError::invalid_cookie(format!(
            "malformed entry with {} fields",
            entry.len()
        )));
    };

    let interface = interface
        .as_str()
        .ok_or_else(|| DeviceError::invalid_cookie("entry interface is not a string"))?;
    let name = name
        .as_str()
        .ok_or_else(|| DeviceError::invalid_cookie("entry property is not a string"))?;

    let Some(kind) = CapabilityKind::parse(interface) else {
        debug!("Dropping cookie entry with unknown interface {}", interface);
        return Ok(None);
    };
    let Some(property_kind) = kind.property_kind(name) else {
        debug!("Dropping cookie entry with unknown property {}.{}", interface, name);
        return Ok(None);
    };

    let item = match (item_name.as_str(), item_type.as_str()) {
        (Some(item_name), Some(item_type)) => Some(ItemRef::new(item_name, item_type)),
        _ => None,
    };
    let empty = Map::new();
    let parameters = parameters.as_object().unwrap_or(&empty);

    Ok(Property::restore(property_kind, item, parameters, optional_string(tag))
        .map(|property| (kind, optional_string(instance), property)))
}

/// Decode capabilities from the cookie representation
///
/// Entries which no longer bind (e.g. an unsupported item type) are dropped.
///
/// # Errors
///
/// Returns an error for an unknown version or a malformed payload
pub fn decode_capabilities(encoded: &str) -> Result<Vec<Capability>> {
    let (version, payload) = encoded
        .split_once(':')
        .ok_or_else(|| DeviceError::invalid_cookie("missing version"))?;

    if version.parse::<u32>().ok() != Some(COOKIE_VERSION) {
        return Err(DeviceError::invalid_cookie(format!("unsupported version {}", version)));
    }

    let decoded = decompress_json(payload).map_err(|e| DeviceError::invalid_cookie(e.to_string()))?;
    let entries = decoded
        .as_array()
        .ok_or_else(|| DeviceError::invalid_cookie("capabilities are not an array"))?;

    let mut capabilities: Vec<Capability> = Vec::new();

    for entry in entries {
        let entry = entry
            .as_array()
            .ok_or_else(|| DeviceError::invalid_cookie("entry is not an array"))?;

        let Some((kind, instance, property)) = restore_entry(entry)? else {
            continue;
        };

        match capabilities
            .iter_mut()
            .find(|capability| capability.kind() == kind && capability.instance() == instance.as_deref())
        {
            Some(capability) => {
                capability.add_property(property);
            }
            None => {
                let mut capability = Capability::restored(kind, instance);
                capability.add_property(property);
                capabilities.push(capability);
            }
        }
    }

    Ok(capabilities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::PropertyKind;
    use habskill_core::types::{Item, ServerSettings, StateDescription, StateOption};

    fn bind(kind: PropertyKind, item: &Item, config: Value) -> Property {
        let config = config.as_object().cloned().unwrap_or_default();
        Property::bind(kind, Some(item), &config, &ServerSettings::default()).unwrap()
    }

    fn capabilities() -> Vec<Capability> {
        let light = Item::new("light", "Dimmer").with_state("50");
        let fan = Item::new("fan", "Number").with_label("Fan Speed");
        let mode = Item::new("mode", "String").with_label("Wash Cycle");

        let mut power = Capability::new(CapabilityKind::PowerController);
        power.add_property(bind(PropertyKind::PowerState, &light, json!({"inverted": true})));

        let mut range = Capability::with_instance(CapabilityKind::RangeController, "fan");
        range.add_property(bind(
            PropertyKind::RangeValue,
            &fan,
            json!({"supportedRange": "1:5:-1", "presets": "1=Low,5=High", "actionMappings": "Raise=(+1)"}),
        ));

        let mut modes = Capability::with_instance(CapabilityKind::ModeController, "mode");
        modes.add_property(bind(
            PropertyKind::Mode,
            &mode,
            json!({"supportedModes": "Delicate=@Value.Delicate:Gentle,Normal=Normal", "ordered": false}),
        ));

        let mut thermostat = Capability::new(CapabilityKind::ThermostatController);
        let setpoint = Item::new("setpoint", "Number:Temperature").with_state("68 °F");
        thermostat.add_property(bind(
            PropertyKind::LowerSetpoint,
            &setpoint,
            json!({"tag": "eco", "setpointRange": "60:90"}),
        ));

        let mut health = Capability::new(CapabilityKind::EndpointHealth);
        health.add_property(
            Property::bind(PropertyKind::Connectivity, None, &Map::new(), &ServerSettings::default()).unwrap(),
        );

        vec![power, range, modes, thermostat, health]
    }

    #[test]
    fn test_round_trip() {
        let capabilities = capabilities();
        let encoded = encode_capabilities(&capabilities).unwrap();
        assert!(encoded.starts_with("1:"));

        let decoded = decode_capabilities(&encoded).unwrap();
        assert_eq!(decoded, capabilities);
    }

    #[test]
    fn test_round_trip_keeps_map_separators() {
        let mut cycle = Item::new("cycle", "String").with_label("Wash Cycle");
        cycle.state_description = Some(StateDescription {
            options: vec![
                StateOption {
                    value: "Normal".to_string(),
                    label: Some("Normal, Quick".to_string()),
                },
                StateOption {
                    value: "a=b".to_string(),
                    label: Some("x=y,z".to_string()),
                },
            ],
            ..Default::default()
        });

        let mut modes = Capability::with_instance(CapabilityKind::ModeController, "cycle");
        modes.add_property(bind(PropertyKind::Mode, &cycle, json!({"actionMappings": "Clean=a=b"})));
        let capabilities = vec![modes];

        let decoded = decode_capabilities(&encode_capabilities(&capabilities).unwrap()).unwrap();
        assert_eq!(decoded, capabilities);
        assert_eq!(
            decoded[0].properties()[0].supported_modes()[0],
            ("Normal".to_string(), "Normal, Quick".to_string())
        );
    }

    #[test]
    fn test_unknown_version() {
        let encoded = encode_capabilities(&capabilities()).unwrap();
        let tampered = encoded.replacen("1:", "2:", 1);
        assert!(matches!(decode_capabilities(&tampered), Err(DeviceError::InvalidCookie(_))));
        assert!(decode_capabilities("garbage").is_err());
        assert!(decode_capabilities("1:!!!").is_err());
    }

    #[test]
    fn test_drops_unbindable_entries() {
        let encoded = format!(
            "1:{}",
            compress_json(&json!([
                ["Alexa.ToggleController", "Toggle:dimmer", "toggleState", "dimmer", "Dimmer", null, {}],
                ["Alexa.Foo", null, "bar", "item", "Switch", null, {}],
                ["Alexa.PowerController", null, "powerState", "switch", "Switch", null, {}]
            ]))
            .unwrap()
        );

        let decoded = decode_capabilities(&encoded).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].kind(), CapabilityKind::PowerController);
        assert!(matches!(
            decode_capabilities(&format!("1:{}", compress_json(&json!([["Alexa"]])).unwrap())),
            Err(DeviceError::InvalidCookie(_))
        ));
    }

    #[test]
    fn test_endpoint_cookie() {
        let cookie = EndpointCookie::from_value(&json!({"binding": true})).unwrap();
        assert!(cookie.binding);
        assert!(cookie.decode_capabilities().is_err());

        let cookie = EndpointCookie::from_value(&json!({"capabilities": "1:abc", "binding": "false"})).unwrap();
        assert!(!cookie.binding);
        assert_eq!(cookie.capabilities.as_deref(), Some("1:abc"));

        assert!(EndpointCookie::from_value(&json!("cookie")).is_err());
    }
}

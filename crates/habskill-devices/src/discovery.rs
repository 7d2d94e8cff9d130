/*!
 * Endpoint discovery.
 *
 * Discovery folds the items of a group endpoint into one device, binds the
 * capabilities of every device through the capability registry and builds
 * the endpoint descriptors.
 */
use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, info, warn};

use habskill_core::logging::endpoint_span;
use habskill_core::types::{Item, ServerSettings};
use habskill_core::utils::strip_punctuation;

use crate::device_type::display_categories;
use crate::endpoint::{Endpoint, MANUFACTURER_NAME};
use crate::error::Result;
use crate::metadata::ItemMetadata;
use crate::registry::{CapabilityRegistry, Device, PropertyBinding};

/// Maximum number of endpoints reported by discovery
pub const MAX_ENDPOINTS: usize = 300;

/// Discovery pipeline
#[derive(Debug, Clone, Default)]
pub struct Discoverer {
    /// The capability registry
    registry: CapabilityRegistry,
}

fn push_bindings<'a>(device: &mut Device<'a>, metadata: &ItemMetadata<'a>) {
    for (capability, property) in metadata.properties() {
        device.bindings.push(PropertyBinding {
            capability,
            property,
            item: metadata.item(),
            config: metadata.config(),
        });
    }
}

impl Discoverer {
    /// Create a new discoverer with a capability registry
    pub fn new(registry: CapabilityRegistry) -> Self {
        Self { registry }
    }

    /// Get the capability registry
    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    /// Group items into logical devices
    ///
    /// Items belonging to a group endpoint are folded into it, unless they
    /// declare an endpoint of their own. Devices keep the order of their first item.
    pub fn devices<'a>(&self, items: &'a [Item]) -> Vec<Device<'a>> {
        let metadata: Vec<ItemMetadata<'a>> = items.iter().filter_map(ItemMetadata::parse).collect();

        let groups: HashMap<&str, &ItemMetadata<'a>> = metadata
            .iter()
            .filter(|metadata| metadata.is_group_endpoint())
            .map(|metadata| (metadata.item().name.as_str(), metadata))
            .collect();

        let mut devices: Vec<Device<'a>> = Vec::new();
        let mut indexes: HashMap<&str, usize> = HashMap::new();

        let mut device_index = |devices: &mut Vec<Device<'a>>, metadata: &ItemMetadata<'a>| -> usize {
            let name = metadata.item().name.as_str();
            *indexes.entry(name).or_insert_with(|| {
                devices.push(Device::new(metadata.item(), metadata.type_name()));
                devices.len() - 1
            })
        };

        for item_metadata in &metadata {
            let item = item_metadata.item();

            if item_metadata.is_group_endpoint() || item_metadata.is_endpoint() {
                let index = device_index(&mut devices, item_metadata);
                push_bindings(&mut devices[index], item_metadata);
                continue;
            }

            let group = item
                .group_names
                .iter()
                .find_map(|group| groups.get(group.as_str()).copied());

            match group {
                Some(group) => {
                    let index = device_index(&mut devices, group);
                    push_bindings(&mut devices[index], item_metadata);
                }
                None if !item_metadata.explicit_properties().is_empty() => {
                    let index = device_index(&mut devices, item_metadata);
                    push_bindings(&mut devices[index], item_metadata);
                }
                None => debug!("Ignoring item {} without endpoint properties", item.name),
            }
        }

        devices
    }

    /// Build the endpoint of a device
    ///
    /// # Returns
    ///
    /// The endpoint, or `None` if nothing binds or the device has no name
    pub fn endpoint(&self, device: &Device<'_>, settings: &ServerSettings) -> Option<Endpoint> {
        let item = device.item;
        let _span = endpoint_span(&item.name).entered();

        let capabilities = self.registry.bind_device(device, settings);
        if capabilities.is_empty() {
            debug!("Ignoring device {} without capabilities", item.name);
            return None;
        }

        let friendly_name = strip_punctuation(item.label.as_deref().unwrap_or_default())
            .trim()
            .to_string();
        if friendly_name.is_empty() {
            warn!("Ignoring device {} without friendly name", item.name);
            return None;
        }

        Some(Endpoint {
            id: item.name.clone(),
            description: format!("{} {} via {}", item.item_type, item.name, MANUFACTURER_NAME),
            friendly_name,
            display_categories: display_categories(device.type_name, &capabilities),
            capabilities,
        })
    }

    /// Build the endpoints of all items, at most `MAX_ENDPOINTS`
    pub fn endpoints(&self, items: &[Item], settings: &ServerSettings) -> Vec<Endpoint> {
        let mut endpoints: Vec<Endpoint> = self
            .devices(items)
            .iter()
            .filter_map(|device| self.endpoint(device, settings))
            .collect();

        if endpoints.len() > MAX_ENDPOINTS {
            warn!(
                "Discovered {} endpoints, only the first {} are reported",
                endpoints.len(),
                MAX_ENDPOINTS
            );
            endpoints.truncate(MAX_ENDPOINTS);
        }

        endpoints
    }

    /// Discover the endpoint descriptors of all items
    pub fn discover(&self, items: &[Item], settings: &ServerSettings) -> Result<Vec<Value>> {
        let locale = settings.locale();
        let endpoints = self
            .endpoints(items, settings)
            .iter()
            .map(|endpoint| endpoint.to_discovery(&locale))
            .collect::<Result<Vec<_>>>()?;

        info!("Discovered {} endpoints", endpoints.len());
        Ok(endpoints)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Map};

    use super::*;
    use crate::category::DisplayCategory;
    use crate::capability::CapabilityKind;

    fn config(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    fn capability_names(descriptor: &Value) -> Vec<String> {
        descriptor["capabilities"]
            .as_array()
            .unwrap()
            .iter()
            .flat_map(|capability| {
                let interface = capability["interface"].as_str().unwrap().to_string();
                match capability["properties"]["supported"].as_array() {
                    Some(supported) => supported
                        .iter()
                        .map(|property| format!("{}.{}", interface, property["name"].as_str().unwrap()))
                        .collect::<Vec<_>>(),
                    None => vec![interface],
                }
            })
            .collect()
    }

    #[test_log::test]
    fn test_slow_cooker() {
        let items = vec![Item::new("slowCooker", "Switch")
            .with_label("Slow Cooker")
            .with_metadata("SlowCooker", Map::new())];

        let endpoints = Discoverer::default()
            .discover(&items, &ServerSettings::default())
            .unwrap();

        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0]["endpointId"], json!("slowCooker"));
        assert_eq!(endpoints[0]["friendlyName"], json!("Slow Cooker"));
        assert_eq!(endpoints[0]["displayCategories"], json!(["SLOW_COOKER"]));
        assert_eq!(
            capability_names(&endpoints[0]),
            vec![
                "Alexa.PowerController.powerState",
                "Alexa.EndpointHealth.connectivity",
                "Alexa"
            ]
        );
    }

    #[test]
    fn test_group_endpoint() {
        let items = vec![
            Item::new("gThermostat", "Group")
                .with_label("Thermostat")
                .with_metadata("Endpoint.Thermostat", Map::new()),
            Item::new("setpoint", "Number:Temperature")
                .with_group("gThermostat")
                .with_state("21.5 °C")
                .with_metadata("TargetTemperature", Map::new()),
            Item::new("mode", "String")
                .with_group("gThermostat")
                .with_metadata("HeatingCoolingMode", config(json!({"supportedModes": "HEAT=heat,OFF=off"}))),
            Item::new("temperature", "Number:Temperature")
                .with_group("gThermostat")
                .with_metadata("CurrentTemperature", Map::new()),
            Item::new("fan", "Switch")
                .with_group("gThermostat")
                .with_label("Thermostat Fan")
                .with_metadata("Fan", Map::new()),
            Item::new("orphan", "String").with_metadata("Foo", Map::new()),
        ];

        let discoverer = Discoverer::default();
        let devices = discoverer.devices(&items);
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].bindings.len(), 3);

        let endpoints = discoverer.endpoints(&items, &ServerSettings::default());
        assert_eq!(endpoints.len(), 2);

        let thermostat = &endpoints[0];
        assert_eq!(thermostat.id, "gThermostat");
        assert_eq!(
            thermostat.display_categories,
            vec![DisplayCategory::Thermostat, DisplayCategory::TemperatureSensor]
        );
        let thermostat_controller = thermostat
            .capabilities
            .iter()
            .find(|capability| capability.kind() == CapabilityKind::ThermostatController)
            .unwrap();
        assert_eq!(thermostat_controller.properties().len(), 2);

        assert_eq!(endpoints[1].id, "fan");
        assert_eq!(endpoints[1].display_categories, vec![DisplayCategory::Fan]);
    }

    #[test]
    fn test_standalone_properties_and_missing_name() {
        let items = vec![
            Item::new("light", "Dimmer")
                .with_label("Desk Light!")
                .with_metadata("Lighting, Brightness", Map::new()),
            Item::new("unnamed", "Switch").with_metadata("Switch", Map::new()),
        ];

        let endpoints = Discoverer::default().endpoints(&items, &ServerSettings::default());
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].friendly_name, "Desk Light");
        assert_eq!(endpoints[0].display_categories, vec![DisplayCategory::Light]);
    }

    #[test]
    fn test_endpoint_limit() {
        let items: Vec<Item> = (0..MAX_ENDPOINTS + 5)
            .map(|i| {
                Item::new(format!("switch{}", i), "Switch")
                    .with_label(format!("Switch {}", i))
                    .with_metadata("PowerState", Map::new())
            })
            .collect();

        let endpoints = Discoverer::default().endpoints(&items, &ServerSettings::default());
        assert_eq!(endpoints.len(), MAX_ENDPOINTS);
        assert_eq!(endpoints[0].id, "switch0");
    }
}

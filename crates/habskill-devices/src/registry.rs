/*!
 * Capability registry.
 *
 * The registry holds one factory per capability kind. Binding a device runs
 * every factory over the property bindings declared by the device items, then
 * drops the properties whose linked properties did not bind.
 */
use std::fmt::Debug;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use habskill_core::types::{Item, ServerSettings};

use crate::capability::{Capability, CapabilityKind};
use crate::property::{Property, PropertyKind};

/// A capability property declared by an item
#[derive(Debug, Clone)]
pub struct PropertyBinding<'a> {
    /// The capability kind
    pub capability: CapabilityKind,
    /// The property kind
    pub property: PropertyKind,
    /// The backing item
    pub item: &'a Item,
    /// The item metadata configuration
    pub config: &'a Map<String, Value>,
}

/// A logical device: one endpoint item and the bindings of its items
#[derive(Debug, Clone)]
pub struct Device<'a> {
    /// The endpoint item
    pub item: &'a Item,
    /// The declared device type name
    pub type_name: Option<&'a str>,
    /// The property bindings
    pub bindings: Vec<PropertyBinding<'a>>,
}

impl<'a> Device<'a> {
    /// Create a device without bindings
    pub fn new(item: &'a Item, type_name: Option<&'a str>) -> Self {
        Self {
            item,
            type_name,
            bindings: Vec::new(),
        }
    }

    /// Get the bindings of a capability kind
    pub fn bindings_for(&self, kind: CapabilityKind) -> impl Iterator<Item = &PropertyBinding<'a>> {
        self.bindings.iter().filter(move |binding| binding.capability == kind)
    }
}

/// Capability factory trait
///
/// A factory builds the capabilities of one kind from the bindings of a device.
pub trait CapabilityFactory: Send + Sync + Debug {
    /// Get the capability kind
    fn kind(&self) -> CapabilityKind;

    /// Build the capabilities of a device, empty if nothing binds
    fn try_bind(&self, device: &Device<'_>, settings: &ServerSettings) -> Vec<Capability>;
}

fn bind_property(binding: &PropertyBinding<'_>, settings: &ServerSettings) -> Option<Property> {
    let property = Property::bind(binding.property, Some(binding.item), binding.config, settings);
    if property.is_none() {
        debug!(
            "Property {}.{} not bound to item {}",
            binding.capability, binding.property, binding.item.name
        );
    }
    property
}

/// Factory of capabilities backed by item properties
#[derive(Debug, Clone, Copy)]
pub struct PropertyCapabilityFactory {
    kind: CapabilityKind,
}

impl PropertyCapabilityFactory {
    /// Create a new factory
    pub fn new(kind: CapabilityKind) -> Self {
        Self { kind }
    }
}

impl CapabilityFactory for PropertyCapabilityFactory {
    fn kind(&self) -> CapabilityKind {
        self.kind
    }

    fn try_bind(&self, device: &Device<'_>, settings: &ServerSettings) -> Vec<Capability> {
        if self.kind.is_multi_instance() {
            let mut capabilities: Vec<Capability> = Vec::new();

            for binding in device.bindings_for(self.kind) {
                let mut capability = Capability::with_instance(self.kind, &binding.item.name);
                if capabilities.iter().any(|c| c.instance() == capability.instance()) {
                    debug!("Ignoring duplicate {} instance for item {}", self.kind, binding.item.name);
                    continue;
                }
                if let Some(property) = bind_property(binding, settings) {
                    capability.add_property(property);
                    capabilities.push(capability);
                }
            }

            return capabilities;
        }

        let mut capability = Capability::new(self.kind);
        for binding in device.bindings_for(self.kind) {
            if let Some(property) = bind_property(binding, settings) {
                if !capability.add_property(property) {
                    debug!("Ignoring duplicate {}.{} property", self.kind, binding.property);
                }
            }
        }

        if capability.is_empty() {
            Vec::new()
        } else {
            vec![capability]
        }
    }
}

/// Factory of the endpoint health capability, reporting a healthy endpoint without item
#[derive(Debug, Clone, Copy, Default)]
pub struct EndpointHealthFactory;

impl CapabilityFactory for EndpointHealthFactory {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::EndpointHealth
    }

    fn try_bind(&self, device: &Device<'_>, settings: &ServerSettings) -> Vec<Capability> {
        let mut capability = Capability::new(CapabilityKind::EndpointHealth);

        let property = device
            .bindings_for(CapabilityKind::EndpointHealth)
            .find_map(|binding| bind_property(binding, settings))
            .or_else(|| Property::bind(PropertyKind::Connectivity, None, &Map::new(), settings));

        if let Some(property) = property {
            capability.add_property(property);
        }

        vec![capability]
    }
}

/// Factory of the base `Alexa` interface
#[derive(Debug, Clone, Copy, Default)]
pub struct AlexaFactory;

impl CapabilityFactory for AlexaFactory {
    fn kind(&self) -> CapabilityKind {
        CapabilityKind::Alexa
    }

    fn try_bind(&self, _device: &Device<'_>, _settings: &ServerSettings) -> Vec<Capability> {
        vec![Capability::new(CapabilityKind::Alexa)]
    }
}

/// Capability registry
#[derive(Debug, Clone)]
pub struct CapabilityRegistry {
    /// The registered factories, in endpoint order
    factories: Vec<Arc<dyn CapabilityFactory>>,
}

impl CapabilityRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self { factories: Vec::new() }
    }

    /// Register a factory
    pub fn register_factory<F: CapabilityFactory + 'static>(&mut self, factory: F) {
        self.factories.push(Arc::new(factory));
    }

    /// Get the registered factories
    pub fn factories(&self) -> &[Arc<dyn CapabilityFactory>] {
        &self.factories
    }

    /// Bind the capabilities of a device
    ///
    /// # Returns
    ///
    /// The capabilities in endpoint order, or an empty list when nothing
    /// besides the endpoint health and `Alexa` interfaces binds
    pub fn bind_device(&self, device: &Device<'_>, settings: &ServerSettings) -> Vec<Capability> {
        let mut capabilities: Vec<Capability> = self
            .factories
            .iter()
            .flat_map(|factory| factory.try_bind(device, settings))
            .collect();

        prune_unlinked(&mut capabilities);

        let bound = capabilities.iter().any(|capability| {
            !matches!(capability.kind(), CapabilityKind::EndpointHealth | CapabilityKind::Alexa)
        });

        if bound {
            capabilities
        } else {
            debug!("No capability bound for device {}", device.item.name);
            Vec::new()
        }
    }
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        for kind in CapabilityKind::ALL {
            match kind {
                CapabilityKind::EndpointHealth => registry.register_factory(EndpointHealthFactory),
                CapabilityKind::Alexa => registry.register_factory(AlexaFactory),
                kind => registry.register_factory(PropertyCapabilityFactory::new(*kind)),
            }
        }
        registry
    }
}

/// Drop properties missing their linked properties, until nothing changes
fn prune_unlinked(capabilities: &mut Vec<Capability>) {
    loop {
        let properties: Vec<Property> = capabilities
            .iter()
            .flat_map(|capability| capability.properties().iter().cloned())
            .collect();

        let before = properties.len();
        for capability in capabilities.iter_mut() {
            capability.retain_properties(|property| {
                let linked = property.has_linked_properties(properties.iter());
                if !linked {
                    debug!("Dropping property {} missing linked properties", property.kind());
                }
                linked
            });
        }
        capabilities.retain(|capability| !capability.is_empty() || capability.kind() == CapabilityKind::Alexa);

        let after: usize = capabilities.iter().map(|capability| capability.properties().len()).sum();
        if after == before {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn binding<'a>(
        capability: CapabilityKind,
        property: PropertyKind,
        item: &'a Item,
        config: &'a Map<String, Value>,
    ) -> PropertyBinding<'a> {
        PropertyBinding {
            capability,
            property,
            item,
            config,
        }
    }

    fn kinds(capabilities: &[Capability]) -> Vec<CapabilityKind> {
        capabilities.iter().map(Capability::kind).collect()
    }

    #[test]
    fn test_bind_device() {
        let config = Map::new();
        let switch = Item::new("switch1", "Switch");
        let string = Item::new("string1", "String");

        let mut device = Device::new(&switch, Some("Switch"));
        device.bindings.push(binding(CapabilityKind::PowerController, PropertyKind::PowerState, &switch, &config));
        device.bindings.push(binding(CapabilityKind::PowerController, PropertyKind::PowerState, &string, &config));

        let capabilities = CapabilityRegistry::default().bind_device(&device, &ServerSettings::default());
        assert_eq!(
            kinds(&capabilities),
            vec![
                CapabilityKind::PowerController,
                CapabilityKind::EndpointHealth,
                CapabilityKind::Alexa
            ]
        );
        assert_eq!(capabilities[0].properties().len(), 1);
        assert!(capabilities[1].properties()[0].item().is_none());
    }

    #[test]
    fn test_no_capability() {
        let config = Map::new();
        let string = Item::new("string1", "String");

        let mut device = Device::new(&string, None);
        device.bindings.push(binding(CapabilityKind::PowerController, PropertyKind::PowerState, &string, &config));

        assert!(CapabilityRegistry::default()
            .bind_device(&device, &ServerSettings::default())
            .is_empty());
    }

    #[test]
    fn test_multi_instance() {
        let config = Map::new();
        let first = Item::new("toggle1", "Switch").with_label("Oscillate");
        let second = Item::new("toggle2", "Switch").with_label("Night Mode");

        let mut device = Device::new(&first, Some("Fan"));
        for item in [&first, &second, &first] {
            device.bindings.push(binding(CapabilityKind::ToggleController, PropertyKind::ToggleState, item, &config));
        }

        let capabilities = CapabilityRegistry::default().bind_device(&device, &ServerSettings::default());
        let instances: Vec<Option<&str>> = capabilities.iter().map(Capability::instance).collect();
        assert_eq!(instances, vec![Some("Toggle:toggle1"), Some("Toggle:toggle2"), None, None]);
    }

    #[test]
    fn test_linked_properties() {
        let eco: Map<String, Value> = json!({"tag": "eco"}).as_object().cloned().unwrap();
        let comfort: Map<String, Value> = json!({"tag": "comfort"}).as_object().cloned().unwrap();
        let lower = Item::new("lower", "Number:Temperature");
        let upper = Item::new("upper", "Number:Temperature");
        let comfort_lower = Item::new("comfortLower", "Number:Temperature");

        let mut device = Device::new(&lower, Some("Thermostat"));
        device.bindings.push(binding(CapabilityKind::ThermostatController, PropertyKind::LowerSetpoint, &lower, &eco));
        device.bindings.push(binding(CapabilityKind::ThermostatController, PropertyKind::UpperSetpoint, &upper, &eco));
        device.bindings.push(binding(
            CapabilityKind::ThermostatController,
            PropertyKind::LowerSetpoint,
            &comfort_lower,
            &comfort,
        ));

        let capabilities = CapabilityRegistry::default().bind_device(&device, &ServerSettings::default());
        let thermostat = &capabilities[0];
        assert_eq!(thermostat.kind(), CapabilityKind::ThermostatController);
        assert_eq!(thermostat.properties().len(), 2);
        assert!(thermostat.tagged_property(PropertyKind::LowerSetpoint, Some("comfort")).is_none());
    }

    #[test]
    fn test_linked_pruning_empties_device() {
        let config = Map::new();
        let stop = Item::new("stop", "Switch");

        let mut device = Device::new(&stop, Some("Speaker"));
        device.bindings.push(binding(CapabilityKind::PlaybackController, PropertyKind::PlaybackStop, &stop, &config));

        assert!(CapabilityRegistry::default()
            .bind_device(&device, &ServerSettings::default())
            .is_empty());
    }
}

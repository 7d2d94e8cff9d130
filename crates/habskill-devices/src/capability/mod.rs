/*!
 * Alexa capabilities.
 *
 * A capability groups the properties of one Alexa interface on an endpoint.
 * Mode, range and toggle controllers are multi-instance: each bound item
 * yields its own capability instance.
 */
use std::fmt;

use serde_json::{json, Map, Value};

use crate::category::DisplayCategory;
use crate::property::{Property, PropertyKind};

mod configuration;
mod resources;
mod semantics;

/// Alexa interface version
pub const INTERFACE_VERSION: &str = "3";

/// Capability kinds
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityKind {
    PowerController,
    BrightnessController,
    ColorController,
    PercentageController,
    ThermostatController,
    TemperatureSensor,
    LockController,
    ModeController,
    RangeController,
    ToggleController,
    ContactSensor,
    MotionSensor,
    Speaker,
    StepSpeaker,
    PlaybackController,
    EndpointHealth,
    Alexa,
}

impl CapabilityKind {
    /// All capability kinds, in endpoint order
    pub const ALL: &'static [CapabilityKind] = &[
        CapabilityKind::PowerController,
        CapabilityKind::BrightnessController,
        CapabilityKind::ColorController,
        CapabilityKind::PercentageController,
        CapabilityKind::ThermostatController,
        CapabilityKind::TemperatureSensor,
        CapabilityKind::LockController,
        CapabilityKind::ModeController,
        CapabilityKind::RangeController,
        CapabilityKind::ToggleController,
        CapabilityKind::ContactSensor,
        CapabilityKind::MotionSensor,
        CapabilityKind::Speaker,
        CapabilityKind::StepSpeaker,
        CapabilityKind::PlaybackController,
        CapabilityKind::EndpointHealth,
        CapabilityKind::Alexa,
    ];

    /// Get the capability name (e.g. "PowerController")
    pub fn name(&self) -> &'static str {
        match self {
            CapabilityKind::PowerController => "PowerController",
            CapabilityKind::BrightnessController => "BrightnessController",
            CapabilityKind::ColorController => "ColorController",
            CapabilityKind::PercentageController => "PercentageController",
            CapabilityKind::ThermostatController => "ThermostatController",
            CapabilityKind::TemperatureSensor => "TemperatureSensor",
            CapabilityKind::LockController => "LockController",
            CapabilityKind::ModeController => "ModeController",
            CapabilityKind::RangeController => "RangeController",
            CapabilityKind::ToggleController => "ToggleController",
            CapabilityKind::ContactSensor => "ContactSensor",
            CapabilityKind::MotionSensor => "MotionSensor",
            CapabilityKind::Speaker => "Speaker",
            CapabilityKind::StepSpeaker => "StepSpeaker",
            CapabilityKind::PlaybackController => "PlaybackController",
            CapabilityKind::EndpointHealth => "EndpointHealth",
            CapabilityKind::Alexa => "Alexa",
        }
    }

    /// Get the Alexa interface (e.g. "Alexa.PowerController")
    pub fn interface(&self) -> String {
        match self {
            CapabilityKind::Alexa => "Alexa".to_string(),
            kind => format!("Alexa.{}", kind.name()),
        }
    }

    /// Parse from a capability name or an interface
    pub fn parse(s: &str) -> Option<Self> {
        let name = s.strip_prefix("Alexa.").unwrap_or(s);
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    /// Get the supported property kinds
    pub fn supported_properties(&self) -> &'static [PropertyKind] {
        match self {
            CapabilityKind::PowerController => &[PropertyKind::PowerState],
            CapabilityKind::BrightnessController => &[PropertyKind::Brightness],
            CapabilityKind::ColorController => &[PropertyKind::Color],
            CapabilityKind::PercentageController => &[PropertyKind::Percentage],
            CapabilityKind::ThermostatController => &[
                PropertyKind::TargetSetpoint,
                PropertyKind::LowerSetpoint,
                PropertyKind::UpperSetpoint,
                PropertyKind::ThermostatMode,
                PropertyKind::ThermostatHold,
            ],
            CapabilityKind::TemperatureSensor => &[PropertyKind::Temperature],
            CapabilityKind::LockController => &[PropertyKind::LockState],
            CapabilityKind::ModeController => &[PropertyKind::Mode],
            CapabilityKind::RangeController => &[PropertyKind::RangeValue],
            CapabilityKind::ToggleController => &[PropertyKind::ToggleState],
            CapabilityKind::ContactSensor | CapabilityKind::MotionSensor => &[PropertyKind::DetectionState],
            CapabilityKind::Speaker => &[PropertyKind::Volume, PropertyKind::Muted],
            CapabilityKind::StepSpeaker => &[PropertyKind::VolumeSteps, PropertyKind::MuteStep],
            CapabilityKind::PlaybackController => &[PropertyKind::Playback, PropertyKind::PlaybackStop],
            CapabilityKind::EndpointHealth => &[PropertyKind::Connectivity],
            CapabilityKind::Alexa => &[],
        }
    }

    /// Get a supported property kind by its Alexa property name
    pub fn property_kind(&self, name: &str) -> Option<PropertyKind> {
        self.supported_properties()
            .iter()
            .copied()
            .find(|kind| kind.name() == name)
    }

    /// Get the display categories implied by the capability
    pub fn default_display_categories(&self) -> &'static [DisplayCategory] {
        match self {
            CapabilityKind::BrightnessController | CapabilityKind::ColorController => &[DisplayCategory::Light],
            CapabilityKind::ThermostatController => &[DisplayCategory::Thermostat],
            CapabilityKind::TemperatureSensor => &[DisplayCategory::TemperatureSensor],
            CapabilityKind::ContactSensor => &[DisplayCategory::ContactSensor],
            CapabilityKind::MotionSensor => &[DisplayCategory::MotionSensor],
            CapabilityKind::LockController => &[DisplayCategory::Smartlock],
            CapabilityKind::Speaker | CapabilityKind::StepSpeaker => &[DisplayCategory::Speaker],
            _ => &[],
        }
    }

    /// Get the instance prefix of multi-instance capabilities
    pub fn instance_prefix(&self) -> Option<&'static str> {
        match self {
            CapabilityKind::ModeController => Some("Mode"),
            CapabilityKind::RangeController => Some("Range"),
            CapabilityKind::ToggleController => Some("Toggle"),
            _ => None,
        }
    }

    /// Check if the capability is multi-instance
    pub fn is_multi_instance(&self) -> bool {
        self.instance_prefix().is_some()
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A capability with its bound properties
#[derive(Debug, Clone, PartialEq)]
pub struct Capability {
    kind: CapabilityKind,
    instance: Option<String>,
    properties: Vec<Property>,
}

impl Capability {
    /// Create a new capability without properties
    pub fn new(kind: CapabilityKind) -> Self {
        Self {
            kind,
            instance: None,
            properties: Vec::new(),
        }
    }

    /// Create a new capability instance for an item (e.g. "Toggle:FanOscillate")
    pub fn with_instance(kind: CapabilityKind, item_name: &str) -> Self {
        Self {
            kind,
            instance: kind
                .instance_prefix()
                .map(|prefix| format!("{}:{}", prefix, item_name)),
            properties: Vec::new(),
        }
    }

    /// Restore a capability with a serialized instance identifier
    pub(crate) fn restored(kind: CapabilityKind, instance: Option<String>) -> Self {
        Self {
            kind,
            instance,
            properties: Vec::new(),
        }
    }

    /// Get the capability kind
    pub fn kind(&self) -> CapabilityKind {
        self.kind
    }

    /// Get the Alexa interface
    pub fn interface(&self) -> String {
        self.kind.interface()
    }

    /// Get the instance identifier
    pub fn instance(&self) -> Option<&str> {
        self.instance.as_deref()
    }

    /// Get the bound properties
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Get a bound property by kind
    pub fn property(&self, kind: PropertyKind) -> Option<&Property> {
        self.properties.iter().find(|property| property.kind() == kind)
    }

    /// Get the first bound property matching a kind and an optional tag
    pub fn tagged_property(&self, kind: PropertyKind, tag: Option<&str>) -> Option<&Property> {
        self.properties
            .iter()
            .find(|property| property.kind() == kind && (tag.is_none() || property.tag() == tag))
    }

    /// Add a property, ignoring duplicates of the same kind and tag
    pub fn add_property(&mut self, property: Property) -> bool {
        let duplicate = self
            .properties
            .iter()
            .any(|p| p.kind() == property.kind() && p.tag() == property.tag());
        if !duplicate {
            self.properties.push(property);
        }
        !duplicate
    }

    /// Keep only the properties matching a predicate
    pub(crate) fn retain_properties<F: FnMut(&Property) -> bool>(&mut self, f: F) {
        self.properties.retain(f);
    }

    /// Check if the capability has no properties
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Get the reportable properties
    pub fn reportable_properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter().filter(|property| property.is_reportable())
    }

    /// Get the display categories implied by the capability
    pub fn default_display_categories(&self) -> &'static [DisplayCategory] {
        self.kind.default_display_categories()
    }

    /// Build the capability configuration block
    pub fn configuration(&self, locale: &str) -> Option<Value> {
        configuration::configuration(self, locale)
    }

    /// Build the capability resources block
    pub fn resources(&self, locale: &str) -> Option<Value> {
        resources::capability_resources(self, locale)
    }

    /// Build the capability semantics block
    pub fn semantics(&self) -> Option<Value> {
        semantics::semantics(self)
    }

    /// Build the discovery capability descriptor
    ///
    /// # Arguments
    ///
    /// * `locale` - The locale used for text resources
    pub fn descriptor(&self, locale: &str) -> Value {
        let mut descriptor = Map::new();
        descriptor.insert("type".to_string(), json!("AlexaInterface"));
        descriptor.insert("interface".to_string(), json!(self.interface()));
        descriptor.insert("version".to_string(), json!(INTERFACE_VERSION));

        if let Some(instance) = &self.instance {
            descriptor.insert("instance".to_string(), json!(instance));
        }

        let mut supported: Vec<&str> = Vec::new();
        for property in self.reportable_properties() {
            if !supported.contains(&property.name()) {
                supported.push(property.name());
            }
        }

        if !supported.is_empty() {
            let mut properties = Map::new();
            properties.insert(
                "supported".to_string(),
                Value::from(
                    supported
                        .iter()
                        .map(|name| json!({ "name": name }))
                        .collect::<Vec<_>>(),
                ),
            );
            properties.insert("proactivelyReported".to_string(), json!(false));
            properties.insert("retrievable".to_string(), json!(true));
            if self.properties.iter().any(Property::non_controllable) {
                properties.insert("nonControllable".to_string(), json!(true));
            }
            descriptor.insert("properties".to_string(), Value::Object(properties));
        }

        if let Some(resources) = self.resources(locale) {
            descriptor.insert("capabilityResources".to_string(), resources);
        }

        if let Some(configuration) = self.configuration(locale) {
            descriptor.insert("configuration".to_string(), configuration);
        }

        if let Some(semantics) = self.semantics() {
            descriptor.insert("semantics".to_string(), semantics);
        }

        if self.kind == CapabilityKind::PlaybackController {
            descriptor.insert(
                "supportedOperations".to_string(),
                json!(["Play", "Pause", "Stop", "Next", "Previous", "Rewind", "FastForward"]),
            );
        }

        Value::Object(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use habskill_core::types::{Item, ServerSettings};

    #[test]
    fn test_kind_lookup() {
        assert_eq!(CapabilityKind::parse("Alexa.ToggleController"), Some(CapabilityKind::ToggleController));
        assert_eq!(CapabilityKind::parse("Speaker"), Some(CapabilityKind::Speaker));
        assert_eq!(CapabilityKind::parse("Foo"), None);
        assert_eq!(CapabilityKind::Alexa.interface(), "Alexa");
        assert_eq!(
            CapabilityKind::StepSpeaker.property_kind("volume"),
            Some(PropertyKind::VolumeSteps)
        );
        assert_eq!(CapabilityKind::Speaker.property_kind("volume"), Some(PropertyKind::Volume));
    }

    #[test]
    fn test_instance() {
        let capability = Capability::with_instance(CapabilityKind::ToggleController, "FanOscillate");
        assert_eq!(capability.instance(), Some("Toggle:FanOscillate"));

        let capability = Capability::with_instance(CapabilityKind::PowerController, "switch1");
        assert_eq!(capability.instance(), None);
    }

    #[test]
    fn test_descriptor() {
        let item = Item::new("switch1", "Switch");
        let property = Property::bind(
            PropertyKind::PowerState,
            Some(&item),
            &Map::new(),
            &ServerSettings::default(),
        )
        .unwrap();

        let mut capability = Capability::new(CapabilityKind::PowerController);
        assert!(capability.add_property(property.clone()));
        assert!(!capability.add_property(property));

        let descriptor = capability.descriptor("en-US");
        assert_eq!(descriptor["interface"], json!("Alexa.PowerController"));
        assert_eq!(descriptor["properties"]["supported"], json!([{"name": "powerState"}]));
        assert!(descriptor.get("configuration").is_none());
        assert!(descriptor.get("semantics").is_none());

        let descriptor = Capability::new(CapabilityKind::Alexa).descriptor("en-US");
        assert_eq!(descriptor, json!({"type": "AlexaInterface", "interface": "Alexa", "version": "3"}));
    }
}

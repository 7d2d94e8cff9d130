/*!
 * Backend data types for habskill.
 *
 * This module defines the openHAB REST shapes consumed by the mapping engine:
 * items with their metadata and state descriptions, and the server settings.
 */
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata namespace holding the voice assistant configuration
pub const METADATA_NAMESPACE: &str = "alexa";

/// States reported by the backend when an item value is unknown
pub const UNDEFINED_STATES: [&str; 2] = ["NULL", "UNDEF"];

/// Check if a backend state is the undefined sentinel
pub fn is_undefined(state: &str) -> bool {
    UNDEFINED_STATES.contains(&state)
}

/// Primitive backend item types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    /// Call item
    Call,
    /// Color item (hue, saturation, brightness)
    Color,
    /// Contact item (OPEN/CLOSED)
    Contact,
    /// Date time item
    DateTime,
    /// Dimmer item (percent)
    Dimmer,
    /// Group item
    Group,
    /// Image item
    Image,
    /// Location item
    Location,
    /// Number item, optionally with a dimension
    Number,
    /// Player item
    Player,
    /// Rollershutter item (percent, 0 is open)
    Rollershutter,
    /// String item
    String,
    /// Switch item (ON/OFF)
    Switch,
}

impl ItemType {
    /// Convert to the backend type name
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Call => "Call",
            ItemType::Color => "Color",
            ItemType::Contact => "Contact",
            ItemType::DateTime => "DateTime",
            ItemType::Dimmer => "Dimmer",
            ItemType::Group => "Group",
            ItemType::Image => "Image",
            ItemType::Location => "Location",
            ItemType::Number => "Number",
            ItemType::Player => "Player",
            ItemType::Rollershutter => "Rollershutter",
            ItemType::String => "String",
            ItemType::Switch => "Switch",
        }
    }

    /// Parse from a backend type name, ignoring any `:<Dimension>` suffix
    pub fn parse(s: &str) -> Option<Self> {
        let base = s.split(':').next().unwrap_or(s);
        match base {
            "Call" => Some(ItemType::Call),
            "Color" => Some(ItemType::Color),
            "Contact" => Some(ItemType::Contact),
            "DateTime" => Some(ItemType::DateTime),
            "Dimmer" => Some(ItemType::Dimmer),
            "Group" => Some(ItemType::Group),
            "Image" => Some(ItemType::Image),
            "Location" => Some(ItemType::Location),
            "Number" => Some(ItemType::Number),
            "Player" => Some(ItemType::Player),
            "Rollershutter" => Some(ItemType::Rollershutter),
            "String" => Some(ItemType::String),
            "Switch" => Some(ItemType::Switch),
            _ => None,
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A state option from an item state description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateOption {
    /// The option value
    pub value: String,
    /// The option label
    #[serde(default)]
    pub label: Option<String>,
}

/// Item state description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateDescription {
    /// Display pattern (e.g. "%.1f °F")
    #[serde(default)]
    pub pattern: Option<String>,
    /// Whether the item is read only
    #[serde(default)]
    pub read_only: bool,
    /// State options
    #[serde(default)]
    pub options: Vec<StateOption>,
}

/// One metadata namespace entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataEntry {
    /// The metadata value
    #[serde(default)]
    pub value: String,
    /// The metadata configuration
    #[serde(default)]
    pub config: Map<String, Value>,
}

/// A backend item as returned by the REST API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// The item name
    pub name: String,
    /// The item type, possibly with a dimension (e.g. "Number:Temperature")
    #[serde(rename = "type")]
    pub item_type: String,
    /// The current state
    #[serde(default)]
    pub state: Option<String>,
    /// The item label
    #[serde(default)]
    pub label: Option<String>,
    /// Names of the groups this item belongs to
    #[serde(default)]
    pub group_names: Vec<String>,
    /// Base type of a group item
    #[serde(default)]
    pub group_type: Option<String>,
    /// Item tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// The state description
    #[serde(default)]
    pub state_description: Option<StateDescription>,
    /// Metadata keyed by namespace
    #[serde(default)]
    pub metadata: HashMap<String, MetadataEntry>,
}

impl Item {
    /// Create an item with a name and type
    pub fn new<N: Into<String>, T: Into<String>>(name: N, item_type: T) -> Self {
        Self {
            name: name.into(),
            item_type: item_type.into(),
            ..Default::default()
        }
    }

    /// Set the state
    pub fn with_state<S: Into<String>>(mut self, state: S) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Set the label
    pub fn with_label<S: Into<String>>(mut self, label: S) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Add a group membership
    pub fn with_group<S: Into<String>>(mut self, group: S) -> Self {
        self.group_names.push(group.into());
        self
    }

    /// Set the group base type
    pub fn with_group_type<S: Into<String>>(mut self, group_type: S) -> Self {
        self.group_type = Some(group_type.into());
        self
    }

    /// Set the voice assistant metadata
    pub fn with_metadata<S: Into<String>>(mut self, value: S, config: Map<String, Value>) -> Self {
        self.metadata.insert(
            METADATA_NAMESPACE.to_string(),
            MetadataEntry {
                value: value.into(),
                config,
            },
        );
        self
    }

    /// Get the voice assistant metadata entry
    pub fn alexa_metadata(&self) -> Option<&MetadataEntry> {
        self.metadata.get(METADATA_NAMESPACE)
    }

    /// Get the primitive type of the item
    pub fn kind(&self) -> Option<ItemType> {
        ItemType::parse(&self.item_type)
    }

    /// Get the type a property binds against: the group base type for groups
    pub fn effective_kind(&self) -> Option<ItemType> {
        match self.kind() {
            Some(ItemType::Group) => self.group_type.as_deref().and_then(ItemType::parse),
            kind => kind,
        }
    }

    /// Get the dimension of a number item (e.g. "Temperature")
    pub fn dimension(&self) -> Option<&str> {
        let item_type = match self.kind() {
            Some(ItemType::Group) => self.group_type.as_deref()?,
            _ => self.item_type.as_str(),
        };
        item_type.split_once(':').map(|(_, dimension)| dimension)
    }

    /// Check if the item is a group
    pub fn is_group(&self) -> bool {
        self.kind() == Some(ItemType::Group)
    }

    /// Get the current state, `None` when missing or undefined
    pub fn defined_state(&self) -> Option<&str> {
        self.state.as_deref().filter(|state| !is_undefined(state))
    }

    /// Get the state options from the state description
    pub fn state_options(&self) -> &[StateOption] {
        self.state_description
            .as_ref()
            .map(|description| description.options.as_slice())
            .unwrap_or_default()
    }
}

/// Runtime section of the server settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeSettings {
    /// Server instance uuid
    #[serde(default)]
    pub uuid: Option<String>,
    /// Server version
    #[serde(default)]
    pub version: Option<String>,
}

/// Regional section of the server settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionalSettings {
    /// Language code (e.g. "en")
    #[serde(default)]
    pub language: Option<String>,
    /// Region code (e.g. "US")
    #[serde(default)]
    pub region: Option<String>,
}

/// Backend server settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Runtime information
    #[serde(default)]
    pub runtime: RuntimeSettings,
    /// Regional settings
    #[serde(default)]
    pub regional: RegionalSettings,
}

impl ServerSettings {
    /// Default locale when the server has no regional settings
    pub const DEFAULT_LOCALE: &'static str = "en-US";

    /// Get the server locale (e.g. "en-US")
    pub fn locale(&self) -> String {
        match (&self.regional.language, &self.regional.region) {
            (Some(language), Some(region)) => format!("{}-{}", language, region),
            (Some(language), None) => match language.as_str() {
                "en" => Self::DEFAULT_LOCALE.to_string(),
                "de" => "de-DE".to_string(),
                "es" => "es-ES".to_string(),
                "fr" => "fr-FR".to_string(),
                "it" => "it-IT".to_string(),
                "ja" => "ja-JP".to_string(),
                "pt" => "pt-BR".to_string(),
                "hi" => "hi-IN".to_string(),
                _ => Self::DEFAULT_LOCALE.to_string(),
            },
            _ => Self::DEFAULT_LOCALE.to_string(),
        }
    }

    /// Get the server language code
    pub fn language(&self) -> String {
        self.locale().split('-').next().unwrap_or("en").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_type_parse() {
        assert_eq!(ItemType::parse("Switch"), Some(ItemType::Switch));
        assert_eq!(ItemType::parse("Number:Temperature"), Some(ItemType::Number));
        assert_eq!(ItemType::parse("Foo"), None);
        assert_eq!(ItemType::Rollershutter.to_string(), "Rollershutter");
    }

    #[test]
    fn test_item_deserialize() {
        let item: Item = serde_json::from_value(json!({
            "type": "Number:Temperature",
            "name": "temperature1",
            "state": "68.0123456789 °F",
            "groupNames": ["gThermostat"],
            "stateDescription": {"pattern": "%.1f °F"},
            "metadata": {"alexa": {"value": "TemperatureSensor.temperature", "config": {"scale": "Fahrenheit"}}}
        }))
        .unwrap();

        assert_eq!(item.kind(), Some(ItemType::Number));
        assert_eq!(item.dimension(), Some("Temperature"));
        assert_eq!(item.group_names, vec!["gThermostat"]);
        assert_eq!(item.alexa_metadata().unwrap().config["scale"], json!("Fahrenheit"));
        assert_eq!(item.defined_state(), Some("68.0123456789 °F"));
    }

    #[test]
    fn test_group_effective_kind() {
        let group = Item::new("gLight", "Group").with_group_type("Dimmer");
        assert!(group.is_group());
        assert_eq!(group.effective_kind(), Some(ItemType::Dimmer));

        let group = Item::new("gTemp", "Group").with_group_type("Number:Temperature");
        assert_eq!(group.dimension(), Some("Temperature"));
    }

    #[test]
    fn test_undefined_state() {
        assert!(Item::new("switch1", "Switch").with_state("NULL").defined_state().is_none());
        assert!(Item::new("switch1", "Switch").with_state("UNDEF").defined_state().is_none());
        assert!(Item::new("switch1", "Switch").defined_state().is_none());
    }

    #[test]
    fn test_settings_locale() {
        let mut settings = ServerSettings::default();
        assert_eq!(settings.locale(), "en-US");

        settings.regional.language = Some("fr".to_string());
        assert_eq!(settings.locale(), "fr-FR");
        assert_eq!(settings.language(), "fr");

        settings.regional.region = Some("CA".to_string());
        assert_eq!(settings.locale(), "fr-CA");
    }
}

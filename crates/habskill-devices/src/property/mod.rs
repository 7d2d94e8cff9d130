/*!
 * Alexa properties.
 *
 * A property maps one backend item to one Alexa property value. Its behavior
 * comes from the static configuration of its kind (see `spec`), so every
 * property is the same value type: a kind, an optional item reference, typed
 * parameters and an optional correlation tag.
 */
use std::fmt;

use serde_json::{json, Map, Value};
use tracing::debug;

use habskill_core::types::{is_undefined, Item, ItemType, ServerSettings};
use habskill_core::utils::decamelize;

use crate::error::{DeviceError, Result};
use crate::parameter::{names, Parameters};

pub(crate) mod convert;
pub(crate) mod spec;

use spec::PropertySpec;

/// Property kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// Power state (ON/OFF)
    PowerState,
    /// Brightness percentage
    Brightness,
    /// Color (hue, saturation, brightness)
    Color,
    /// Percentage
    Percentage,
    /// Thermostat target setpoint
    TargetSetpoint,
    /// Thermostat lower setpoint
    LowerSetpoint,
    /// Thermostat upper setpoint
    UpperSetpoint,
    /// Thermostat mode
    ThermostatMode,
    /// Thermostat hold, used to resume the schedule
    ThermostatHold,
    /// Temperature reading
    Temperature,
    /// Mode of a mode controller instance
    Mode,
    /// Value of a range controller instance
    RangeValue,
    /// State of a toggle controller instance
    ToggleState,
    /// Contact or motion detection state
    DetectionState,
    /// Lock state
    LockState,
    /// Speaker volume
    Volume,
    /// Speaker mute state
    Muted,
    /// Step speaker volume steps
    VolumeSteps,
    /// Step speaker mute button
    MuteStep,
    /// Playback operations
    Playback,
    /// Playback stop button
    PlaybackStop,
    /// Endpoint connectivity
    Connectivity,
}

impl PropertyKind {
    /// Get the Alexa property name
    pub fn name(&self) -> &'static str {
        match self {
            PropertyKind::PowerState => "powerState",
            PropertyKind::Brightness => "brightness",
            PropertyKind::Color => "color",
            PropertyKind::Percentage => "percentage",
            PropertyKind::TargetSetpoint => "targetSetpoint",
            PropertyKind::LowerSetpoint => "lowerSetpoint",
            PropertyKind::UpperSetpoint => "upperSetpoint",
            PropertyKind::ThermostatMode => "thermostatMode",
            PropertyKind::ThermostatHold => "thermostatHold",
            PropertyKind::Temperature => "temperature",
            PropertyKind::Mode => "mode",
            PropertyKind::RangeValue => "rangeValue",
            PropertyKind::ToggleState => "toggleState",
            PropertyKind::DetectionState => "detectionState",
            PropertyKind::LockState => "lockState",
            PropertyKind::Volume | PropertyKind::VolumeSteps => "volume",
            PropertyKind::Muted | PropertyKind::MuteStep => "muted",
            PropertyKind::Playback => "playback",
            PropertyKind::PlaybackStop => "playbackStop",
            PropertyKind::Connectivity => "connectivity",
        }
    }

    pub(crate) fn spec(&self) -> &'static PropertySpec {
        match self {
            PropertyKind::PowerState => &spec::POWER_STATE,
            PropertyKind::Brightness => &spec::BRIGHTNESS,
            PropertyKind::Color => &spec::COLOR,
            PropertyKind::Percentage => &spec::PERCENTAGE,
            PropertyKind::TargetSetpoint => &spec::TARGET_SETPOINT,
            PropertyKind::LowerSetpoint => &spec::LOWER_SETPOINT,
            PropertyKind::UpperSetpoint => &spec::UPPER_SETPOINT,
            PropertyKind::ThermostatMode => &spec::THERMOSTAT_MODE,
            PropertyKind::ThermostatHold => &spec::THERMOSTAT_HOLD,
            PropertyKind::Temperature => &spec::TEMPERATURE,
            PropertyKind::Mode => &spec::MODE,
            PropertyKind::RangeValue => &spec::RANGE_VALUE,
            PropertyKind::ToggleState => &spec::TOGGLE_STATE,
            PropertyKind::DetectionState => &spec::DETECTION_STATE,
            PropertyKind::LockState => &spec::LOCK_STATE,
            PropertyKind::Volume => &spec::VOLUME,
            PropertyKind::Muted => &spec::MUTED,
            PropertyKind::VolumeSteps => &spec::VOLUME_STEPS,
            PropertyKind::MuteStep => &spec::MUTE_STEP,
            PropertyKind::Playback => &spec::PLAYBACK,
            PropertyKind::PlaybackStop => &spec::PLAYBACK_STOP,
            PropertyKind::Connectivity => &spec::CONNECTIVITY,
        }
    }

    /// Check if the property is reported in state reports
    pub fn is_reportable(&self) -> bool {
        self.spec().reportable
    }

    /// Get the item types the property binds to
    pub fn item_types(&self) -> &'static [ItemType] {
        self.spec().item_types
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Temperature scales
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureScale {
    /// Degrees Celsius
    Celsius,
    /// Degrees Fahrenheit
    Fahrenheit,
    /// Kelvin
    Kelvin,
}

impl TemperatureScale {
    /// Parse from a scale name (e.g. "CELSIUS" or "Celsius")
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "CELSIUS" => Some(TemperatureScale::Celsius),
            "FAHRENHEIT" => Some(TemperatureScale::Fahrenheit),
            "KELVIN" => Some(TemperatureScale::Kelvin),
            _ => None,
        }
    }

    /// Convert to the Alexa scale token
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureScale::Celsius => "CELSIUS",
            TemperatureScale::Fahrenheit => "FAHRENHEIT",
            TemperatureScale::Kelvin => "KELVIN",
        }
    }

    /// Convert an absolute temperature to another scale
    pub fn convert(&self, value: f64, to: TemperatureScale) -> f64 {
        let celsius = match self {
            TemperatureScale::Celsius => value,
            TemperatureScale::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
            TemperatureScale::Kelvin => value - 273.15,
        };
        match to {
            TemperatureScale::Celsius => celsius,
            TemperatureScale::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
            TemperatureScale::Kelvin => celsius + 273.15,
        }
    }

    /// Convert a temperature difference to another scale
    pub fn convert_delta(&self, delta: f64, to: TemperatureScale) -> f64 {
        match (self, to) {
            (TemperatureScale::Fahrenheit, TemperatureScale::Fahrenheit) => delta,
            (TemperatureScale::Fahrenheit, _) => delta * 5.0 / 9.0,
            (_, TemperatureScale::Fahrenheit) => delta * 9.0 / 5.0,
            _ => delta,
        }
    }
}

/// A supported range `[minimum, maximum, precision]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SupportedRange {
    /// Minimum value
    pub minimum: f64,
    /// Maximum value
    pub maximum: f64,
    /// Precision, always positive
    pub precision: f64,
    /// Whether adjustment deltas are reversed (negative raw precision)
    pub reversed: bool,
}

impl SupportedRange {
    /// Build from raw `[minimum, maximum, precision]` values
    pub fn from_raw(raw: &[f64]) -> Option<Self> {
        match raw {
            [minimum, maximum, precision] if minimum < maximum && *precision != 0.0 => Some(Self {
                minimum: *minimum,
                maximum: *maximum,
                precision: precision.abs(),
                reversed: *precision < 0.0,
            }),
            _ => None,
        }
    }

    /// Check if an absolute value is within the range
    pub fn contains(&self, value: f64) -> bool {
        self.minimum <= value && value <= self.maximum
    }

    /// Check if an adjustment delta is accepted (strictly smaller than the range span)
    pub fn accepts_delta(&self, delta: f64) -> bool {
        delta.abs() < self.maximum - self.minimum
    }

    /// Clamp a value to the range
    pub fn clamp(&self, value: f64) -> f64 {
        habskill_core::utils::clamp(value, self.minimum, self.maximum)
    }
}

/// Reference to the backend item bound to a property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRef {
    /// The item name
    pub name: String,
    /// The item type used for binding (the group base type for groups)
    pub item_type: String,
}

impl ItemRef {
    /// Create a new item reference
    pub fn new<N: Into<String>, T: Into<String>>(name: N, item_type: T) -> Self {
        Self {
            name: name.into(),
            item_type: item_type.into(),
        }
    }

    /// Create a reference from a backend item
    pub fn from_item(item: &Item) -> Self {
        let item_type = match (item.is_group(), &item.group_type) {
            (true, Some(group_type)) => group_type.clone(),
            _ => item.item_type.clone(),
        };
        Self::new(item.name.clone(), item_type)
    }

    /// Get the primitive item type
    pub fn kind(&self) -> Option<ItemType> {
        ItemType::parse(&self.item_type)
    }
}

/// A bound property
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    kind: PropertyKind,
    item: Option<ItemRef>,
    pub(crate) parameters: Parameters,
    tag: Option<String>,
}

impl Property {
    /// Bind a property to an item
    ///
    /// # Arguments
    ///
    /// * `kind` - The property kind
    /// * `item` - The backing item, if any
    /// * `config` - The raw metadata configuration
    /// * `settings` - The server settings used for parameter defaults
    ///
    /// # Returns
    ///
    /// The property, or `None` if the item type is not supported or the
    /// parameters are not valid
    pub fn bind(
        kind: PropertyKind,
        item: Option<&Item>,
        config: &Map<String, Value>,
        settings: &ServerSettings,
    ) -> Option<Self> {
        let spec = kind.spec();

        let item_ref = match item {
            Some(item) => Some(ItemRef::from_item(item)),
            None if spec.item_optional => None,
            None => return None,
        };

        let mut property = Self {
            kind,
            item: item_ref,
            parameters: Parameters::parse(config, spec.parameters),
            tag: config
                .get(names::TAG)
                .and_then(Value::as_str)
                .map(|tag| tag.trim().to_string())
                .filter(|tag| !tag.is_empty()),
        };

        if !property.has_supported_item_type() {
            debug!(
                "Item type {} not supported by property {}",
                item.map(|item| item.item_type.as_str()).unwrap_or_default(),
                kind
            );
            return None;
        }

        if let Some(item) = item {
            (spec.defaults)(&mut property, item, settings);
        }

        property.validated()
    }

    /// Restore a property from its serialized form
    ///
    /// Parameters are parsed again against the property kind, no defaults are applied.
    pub fn restore(
        kind: PropertyKind,
        item: Option<ItemRef>,
        parameters: &Map<String, Value>,
        tag: Option<String>,
    ) -> Option<Self> {
        let spec = kind.spec();

        if item.is_none() && !spec.item_optional {
            return None;
        }

        let property = Self {
            kind,
            item,
            parameters: Parameters::parse(parameters, spec.parameters),
            tag,
        };

        if !property.has_supported_item_type() {
            debug!("Dropping restored property {} with unsupported item type", kind);
            return None;
        }

        property.validated()
    }

    fn has_supported_item_type(&self) -> bool {
        match &self.item {
            Some(item) => item
                .kind()
                .map_or(false, |kind| self.kind.spec().item_types.contains(&kind)),
            None => true,
        }
    }

    fn validated(self) -> Option<Self> {
        if (self.kind.spec().validate)(&self) {
            Some(self)
        } else {
            debug!("Property {} has invalid parameters", self.kind);
            None
        }
    }

    /// Get the property kind
    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    /// Get the Alexa property name
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Get the bound item
    pub fn item(&self) -> Option<&ItemRef> {
        self.item.as_ref()
    }

    /// Get the bound item name
    pub fn item_name(&self) -> Option<&str> {
        self.item.as_ref().map(|item| item.name.as_str())
    }

    /// Get the bound item type
    pub fn item_kind(&self) -> Option<ItemType> {
        self.item.as_ref().and_then(ItemRef::kind)
    }

    /// Get the parameters
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Get the correlation tag
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Check if the property is reported in state reports
    pub fn is_reportable(&self) -> bool {
        self.kind.is_reportable()
    }

    /// Check if the property accepts commands
    pub fn is_controllable(&self) -> bool {
        self.kind.spec().command.is_some() && !self.non_controllable()
    }

    /// Check if the linked property requirements are met by other properties of the device
    pub fn has_linked_properties<'a, I>(&self, others: I) -> bool
    where
        I: IntoIterator<Item = &'a Property> + Clone,
    {
        self.kind.spec().linked.iter().all(|linked| {
            others.clone().into_iter().any(|other| {
                other.kind == linked.kind && (!linked.same_tag || other.tag == self.tag)
            })
        })
    }

    /// Convert a backend state into an Alexa property value
    ///
    /// # Returns
    ///
    /// The value, or `None` when the state is missing, undefined or not parsable
    pub fn get_state(&self, state: Option<&str>) -> Option<Value> {
        let convert = self.kind.spec().state?;

        match (&self.item, state) {
            (None, _) => (self.kind == PropertyKind::Connectivity).then(|| json!({"value": "OK"})),
            (Some(_), Some(state)) if !is_undefined(state) => convert(self, state),
            _ => None,
        }
    }

    /// Convert an Alexa value into a backend command
    pub fn get_command(&self, value: &Value) -> Result<String> {
        let convert = self.kind.spec().command.ok_or_else(|| {
            DeviceError::invalid_value(format!("The {} is not controllable.", decamelize(self.name(), " ")))
        })?;
        convert(self, value)
    }

    /// Whether the item state is inverted
    pub fn inverted(&self) -> bool {
        self.parameters.get_bool(names::INVERTED).unwrap_or(false)
    }

    /// Temperature scale of the item
    pub fn scale(&self) -> TemperatureScale {
        self.parameters
            .get_str(names::SCALE)
            .and_then(TemperatureScale::parse)
            .unwrap_or(TemperatureScale::Celsius)
    }

    /// Setpoint range as `(minimum, maximum)`
    pub fn setpoint_range(&self) -> Option<(f64, f64)> {
        match self.parameters.get_range(names::SETPOINT_RANGE)? {
            [minimum, maximum] if minimum < maximum => Some((*minimum, *maximum)),
            _ => None,
        }
    }

    /// Thermostat modes as `(alexa mode, item value)` pairs
    pub fn thermostat_modes(&self) -> Vec<(String, String)> {
        if let Some(modes) = self.parameters.get_map(names::SUPPORTED_MODES) {
            return modes
                .iter()
                .map(|(mode, value)| (mode.to_ascii_uppercase(), value.clone()))
                .filter(|(mode, _)| THERMOSTAT_MODES.contains(&mode.as_str()))
                .collect();
        }

        let defaults: &[(&str, &str)] = match self.item_kind() {
            Some(ItemType::Number) => &[("OFF", "0"), ("HEAT", "1"), ("COOL", "2"), ("AUTO", "3")],
            Some(ItemType::String) => &[
                ("OFF", "off"),
                ("HEAT", "heat"),
                ("COOL", "cool"),
                ("AUTO", "auto"),
                ("ECO", "eco"),
            ],
            Some(ItemType::Switch) => &[("OFF", "OFF"), ("HEAT", "ON")],
            _ => &[],
        };

        defaults
            .iter()
            .map(|(mode, value)| (mode.to_string(), value.to_string()))
            .collect()
    }

    /// Supported modes as `(value, labels)` pairs, labels separated by ':'
    pub fn supported_modes(&self) -> &[(String, String)] {
        self.parameters.get_map(names::SUPPORTED_MODES).unwrap_or_default()
    }

    /// Whether the modes are ordered
    pub fn ordered(&self) -> bool {
        self.parameters.get_bool(names::ORDERED).unwrap_or(false)
    }

    /// Whether the capability is reported but not controllable
    pub fn non_controllable(&self) -> bool {
        self.parameters.get_bool(names::NON_CONTROLLABLE).unwrap_or(false)
    }

    /// Capability friendly names
    pub fn capability_names(&self) -> &[String] {
        self.parameters.get_list(names::CAPABILITY_NAMES).unwrap_or_default()
    }

    /// Semantic action mappings
    pub fn action_mappings(&self) -> &[(String, String)] {
        self.parameters.get_map(names::ACTION_MAPPINGS).unwrap_or_default()
    }

    /// Semantic state mappings
    pub fn state_mappings(&self) -> &[(String, String)] {
        self.parameters.get_map(names::STATE_MAPPINGS).unwrap_or_default()
    }

    /// Supported range
    pub fn supported_range(&self) -> Option<SupportedRange> {
        self.parameters
            .get_range(names::SUPPORTED_RANGE)
            .and_then(SupportedRange::from_raw)
    }

    /// Range presets as `(value, labels)` pairs
    pub fn presets(&self) -> &[(String, String)] {
        self.parameters.get_map(names::PRESETS).unwrap_or_default()
    }

    /// Unit of measure
    pub fn unit_of_measure(&self) -> Option<&str> {
        self.parameters.get_str(names::UNIT_OF_MEASURE)
    }

    /// Volume adjustment increment
    pub fn increment(&self) -> Option<f64> {
        self.parameters.get_f64(names::INCREMENT).filter(|increment| *increment > 0.0)
    }
}

/// Alexa thermostat modes
pub const THERMOSTAT_MODES: &[&str] = &["AUTO", "COOL", "ECO", "HEAT", "OFF"];

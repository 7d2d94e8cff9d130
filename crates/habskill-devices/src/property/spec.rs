/*!
 * Property configuration table.
 *
 * Each property kind is described by a static configuration: the item types
 * it binds to, its parameters, its linked properties and its conversion
 * functions.
 */
use serde_json::Value;

use habskill_core::types::{Item, ItemType, ServerSettings};

use super::convert;
use super::{Property, PropertyKind};
use crate::error::Result;
use crate::parameter::{names, ParameterType, ParameterValue};

/// A property required on the same device
#[derive(Debug, Clone, Copy)]
pub(crate) struct Linked {
    /// The required property kind
    pub kind: PropertyKind,
    /// Whether the linked property must carry the same tag
    pub same_tag: bool,
}

/// Static configuration of one property kind
pub(crate) struct PropertySpec {
    /// Item types the property binds to
    pub item_types: &'static [ItemType],
    /// Whether the property can exist without an item
    pub item_optional: bool,
    /// Supported parameters
    pub parameters: &'static [(&'static str, ParameterType)],
    /// Properties required on the same device
    pub linked: &'static [Linked],
    /// Whether the property is reported in state reports
    pub reportable: bool,
    /// Parameter defaults derived from the item and the server settings
    pub defaults: fn(&mut Property, &Item, &ServerSettings),
    /// Validation of the bound parameters
    pub validate: fn(&Property) -> bool,
    /// State conversion
    pub state: Option<fn(&Property, &str) -> Option<Value>>,
    /// Command conversion
    pub command: Option<fn(&Property, &Value) -> Result<String>>,
}

const SCALES: ParameterType = ParameterType::Enum(&["Celsius", "Fahrenheit"]);

const INVERTED: &[(&str, ParameterType)] = &[(names::INVERTED, ParameterType::Boolean)];

const SETPOINT_PARAMETERS: &[(&str, ParameterType)] = &[
    (names::SCALE, SCALES),
    (names::SETPOINT_RANGE, ParameterType::Range),
];

fn no_defaults(_property: &mut Property, _item: &Item, _settings: &ServerSettings) {}

fn always_valid(_property: &Property) -> bool {
    true
}

fn has_thermostat_modes(property: &Property) -> bool {
    !property.thermostat_modes().is_empty()
}

fn has_supported_modes(property: &Property) -> bool {
    !property.supported_modes().is_empty()
}

fn has_supported_range(property: &Property) -> bool {
    property.supported_range().is_some()
}

pub(crate) static POWER_STATE: PropertySpec = PropertySpec {
    item_types: &[ItemType::Switch, ItemType::Dimmer, ItemType::Color],
    item_optional: false,
    parameters: INVERTED,
    linked: &[],
    reportable: true,
    defaults: no_defaults,
    validate: always_valid,
    state: Some(convert::power_state),
    command: Some(convert::power_command),
};

pub(crate) static BRIGHTNESS: PropertySpec = PropertySpec {
    item_types: &[ItemType::Dimmer, ItemType::Color],
    item_optional: false,
    parameters: &[],
    linked: &[],
    reportable: true,
    defaults: no_defaults,
    validate: always_valid,
    state: Some(convert::brightness),
    command: Some(convert::percent_command),
};

pub(crate) static COLOR: PropertySpec = PropertySpec {
    item_types: &[ItemType::Color],
    item_optional: false,
    parameters: &[],
    linked: &[],
    reportable: true,
    defaults: no_defaults,
    validate: always_valid,
    state: Some(convert::color),
    command: Some(convert::color_command),
};

pub(crate) static PERCENTAGE: PropertySpec = PropertySpec {
    item_types: &[ItemType::Dimmer, ItemType::Rollershutter],
    item_optional: false,
    parameters: INVERTED,
    linked: &[],
    reportable: true,
    defaults: no_defaults,
    validate: always_valid,
    state: Some(convert::percentage),
    command: Some(convert::percentage_command),
};

pub(crate) static TARGET_SETPOINT: PropertySpec = SETPOINT;

pub(crate) static LOWER_SETPOINT: PropertySpec = PropertySpec {
    linked: &[Linked {
        kind: PropertyKind::UpperSetpoint,
        same_tag: true,
    }],
    ..SETPOINT
};

pub(crate) static UPPER_SETPOINT: PropertySpec = PropertySpec {
    linked: &[Linked {
        kind: PropertyKind::LowerSetpoint,
        same_tag: true,
    }],
    ..SETPOINT
};

const SETPOINT: PropertySpec = PropertySpec {
    item_types: &[ItemType::Number],
    item_optional: false,
    parameters: SETPOINT_PARAMETERS,
    linked: &[],
    reportable: true,
    defaults: temperature_defaults,
    validate: always_valid,
    state: Some(convert::temperature),
    command: Some(convert::setpoint_command),
};

pub(crate) static THERMOSTAT_MODE: PropertySpec = PropertySpec {
    item_types: &[ItemType::Number, ItemType::String, ItemType::Switch],
    item_optional: false,
    parameters: &[(names::SUPPORTED_MODES, ParameterType::Map)],
    linked: &[],
    reportable: true,
    defaults: no_defaults,
    validate: has_thermostat_modes,
    state: Some(convert::thermostat_mode),
    command: Some(convert::thermostat_mode_command),
};

pub(crate) static THERMOSTAT_HOLD: PropertySpec = PropertySpec {
    item_types: &[ItemType::Switch],
    item_optional: false,
    parameters: INVERTED,
    linked: &[],
    reportable: false,
    defaults: no_defaults,
    validate: always_valid,
    state: None,
    command: Some(convert::thermostat_hold_command),
};

pub(crate) static TEMPERATURE: PropertySpec = PropertySpec {
    item_types: &[ItemType::Number],
    item_optional: false,
    parameters: &[(names::SCALE, SCALES)],
    linked: &[],
    reportable: true,
    defaults: temperature_defaults,
    validate: always_valid,
    state: Some(convert::temperature),
    command: None,
};

pub(crate) static MODE: PropertySpec = PropertySpec {
    item_types: &[ItemType::Number, ItemType::String, ItemType::Switch],
    item_optional: false,
    parameters: &[
        (names::SUPPORTED_MODES, ParameterType::Map),
        (names::ORDERED, ParameterType::Boolean),
        (names::CAPABILITY_NAMES, ParameterType::List),
        (names::FRIENDLY_NAMES, ParameterType::List),
        (names::NON_CONTROLLABLE, ParameterType::Boolean),
        (names::ACTION_MAPPINGS, ParameterType::Map),
        (names::STATE_MAPPINGS, ParameterType::Map),
    ],
    linked: &[],
    reportable: true,
    defaults: mode_defaults,
    validate: has_supported_modes,
    state: Some(convert::mode),
    command: Some(convert::mode_command),
};

pub(crate) static RANGE_VALUE: PropertySpec = PropertySpec {
    item_types: &[ItemType::Number, ItemType::Dimmer, ItemType::Rollershutter],
    item_optional: false,
    parameters: &[
        (names::SUPPORTED_RANGE, ParameterType::Range),
        (names::PRESETS, ParameterType::Map),
        (names::UNIT_OF_MEASURE, ParameterType::String),
        (names::CAPABILITY_NAMES, ParameterType::List),
        (names::FRIENDLY_NAMES, ParameterType::List),
        (names::NON_CONTROLLABLE, ParameterType::Boolean),
        (names::ACTION_MAPPINGS, ParameterType::Map),
        (names::STATE_MAPPINGS, ParameterType::Map),
    ],
    linked: &[],
    reportable: true,
    defaults: range_defaults,
    validate: has_supported_range,
    state: Some(convert::range_value),
    command: Some(convert::range_value_command),
};

pub(crate) static TOGGLE_STATE: PropertySpec = PropertySpec {
    item_types: &[ItemType::Switch, ItemType::Number, ItemType::String],
    item_optional: false,
    parameters: &[
        (names::INVERTED, ParameterType::Boolean),
        (names::CAPABILITY_NAMES, ParameterType::List),
        (names::FRIENDLY_NAMES, ParameterType::List),
        (names::NON_CONTROLLABLE, ParameterType::Boolean),
        (names::ACTION_MAPPINGS, ParameterType::Map),
        (names::STATE_MAPPINGS, ParameterType::Map),
    ],
    linked: &[],
    reportable: true,
    defaults: instance_defaults,
    validate: always_valid,
    state: Some(convert::toggle_state),
    command: Some(convert::toggle_command),
};

pub(crate) static DETECTION_STATE: PropertySpec = PropertySpec {
    item_types: &[ItemType::Contact, ItemType::Switch],
    item_optional: false,
    parameters: INVERTED,
    linked: &[],
    reportable: true,
    defaults: no_defaults,
    validate: always_valid,
    state: Some(convert::detection_state),
    command: None,
};

pub(crate) static LOCK_STATE: PropertySpec = PropertySpec {
    item_types: &[ItemType::Switch, ItemType::Contact],
    item_optional: false,
    parameters: INVERTED,
    linked: &[],
    reportable: true,
    defaults: no_defaults,
    validate: always_valid,
    state: Some(convert::lock_state),
    command: Some(convert::lock_command),
};

pub(crate) static VOLUME: PropertySpec = PropertySpec {
    item_types: &[ItemType::Dimmer, ItemType::Number],
    item_optional: false,
    parameters: &[(names::INCREMENT, ParameterType::Integer)],
    linked: &[],
    reportable: true,
    defaults: no_defaults,
    validate: always_valid,
    state: Some(convert::volume),
    command: Some(convert::percent_command),
};

pub(crate) static MUTED: PropertySpec = PropertySpec {
    item_types: &[ItemType::Switch],
    item_optional: false,
    parameters: INVERTED,
    linked: &[],
    reportable: true,
    defaults: no_defaults,
    validate: always_valid,
    state: Some(convert::muted),
    command: Some(convert::muted_command),
};

pub(crate) static VOLUME_STEPS: PropertySpec = PropertySpec {
    item_types: &[ItemType::Number, ItemType::String],
    item_optional: false,
    parameters: &[],
    linked: &[],
    reportable: false,
    defaults: no_defaults,
    validate: always_valid,
    state: None,
    command: Some(convert::volume_steps_command),
};

pub(crate) static MUTE_STEP: PropertySpec = PropertySpec {
    item_types: &[ItemType::Switch],
    item_optional: false,
    parameters: INVERTED,
    linked: &[],
    reportable: false,
    defaults: no_defaults,
    validate: always_valid,
    state: None,
    command: Some(convert::muted_command),
};

pub(crate) static PLAYBACK: PropertySpec = PropertySpec {
    item_types: &[ItemType::Player],
    item_optional: false,
    parameters: &[],
    linked: &[],
    reportable: false,
    defaults: no_defaults,
    validate: always_valid,
    state: None,
    command: Some(convert::playback_command),
};

pub(crate) static PLAYBACK_STOP: PropertySpec = PropertySpec {
    item_types: &[ItemType::Switch],
    item_optional: false,
    parameters: INVERTED,
    linked: &[Linked {
        kind: PropertyKind::Playback,
        same_tag: false,
    }],
    reportable: false,
    defaults: no_defaults,
    validate: always_valid,
    state: None,
    command: Some(convert::playback_stop_command),
};

pub(crate) static CONNECTIVITY: PropertySpec = PropertySpec {
    item_types: &[ItemType::Switch],
    item_optional: true,
    parameters: INVERTED,
    linked: &[],
    reportable: true,
    defaults: no_defaults,
    validate: always_valid,
    state: Some(convert::connectivity),
    command: None,
};

/// Default the temperature scale from the item state unit, then the server region
fn temperature_defaults(property: &mut Property, item: &Item, settings: &ServerSettings) {
    if property.parameters.contains(names::SCALE) {
        return;
    }

    let state = item.state.as_deref().unwrap_or_default();
    let scale = if state.ends_with("°F") {
        "Fahrenheit"
    } else if state.ends_with("°C") {
        "Celsius"
    } else if settings.regional.region.as_deref() == Some("US") {
        "Fahrenheit"
    } else {
        "Celsius"
    };

    property
        .parameters
        .set(names::SCALE, ParameterValue::String(scale.to_string()));
}

/// Default the capability names to the item label
fn instance_defaults(property: &mut Property, item: &Item, _settings: &ServerSettings) {
    if property.parameters.contains(names::CAPABILITY_NAMES) {
        return;
    }

    let names = match property.parameters.remove(names::FRIENDLY_NAMES) {
        Some(ParameterValue::List(names)) => names,
        _ => match &item.label {
            Some(label) if !label.trim().is_empty() => vec![label.trim().to_string()],
            _ => return,
        },
    };

    property
        .parameters
        .set(names::CAPABILITY_NAMES, ParameterValue::List(names));
}

/// Default the supported modes to the item state description options
fn mode_defaults(property: &mut Property, item: &Item, settings: &ServerSettings) {
    instance_defaults(property, item, settings);

    if property.parameters.contains(names::SUPPORTED_MODES) {
        return;
    }

    let modes: Vec<(String, String)> = item
        .state_options()
        .iter()
        .map(|option| {
            let label = option.label.clone().unwrap_or_else(|| option.value.clone());
            (option.value.clone(), label)
        })
        .collect();

    if !modes.is_empty() {
        property
            .parameters
            .set(names::SUPPORTED_MODES, ParameterValue::Map(modes));
    }
}

/// Default the supported range and unit of measure from the item type and state
fn range_defaults(property: &mut Property, item: &Item, settings: &ServerSettings) {
    instance_defaults(property, item, settings);

    if !property.parameters.contains(names::SUPPORTED_RANGE) {
        property
            .parameters
            .set(names::SUPPORTED_RANGE, ParameterValue::Range(vec![0.0, 100.0, 1.0]));
    }

    if !property.parameters.contains(names::UNIT_OF_MEASURE) {
        let unit = match item.effective_kind() {
            Some(ItemType::Dimmer) | Some(ItemType::Rollershutter) => Some("Alexa.Unit.Percent".to_string()),
            _ => item.defined_state().and_then(crate::unit::unit_id_from_state),
        };
        if let Some(unit) = unit {
            property
                .parameters
                .set(names::UNIT_OF_MEASURE, ParameterValue::String(unit));
        }
    }
}

/*!
 * Capability configuration blocks.
 */
use serde_json::{json, Map, Value};
use tracing::debug;

use habskill_core::utils::format_number;

use super::{Capability, CapabilityKind};
use crate::catalog::friendly_names;
use crate::property::convert::parse_number;
use crate::property::PropertyKind;
use crate::unit::unit_id;

pub(super) fn configuration(capability: &Capability, locale: &str) -> Option<Value> {
    let configuration = match capability.kind() {
        CapabilityKind::ThermostatController => thermostat(capability),
        CapabilityKind::ModeController => mode(capability, locale),
        CapabilityKind::RangeController => range(capability, locale),
        _ => Map::new(),
    };

    if configuration.is_empty() {
        None
    } else {
        Some(Value::Object(configuration))
    }
}

fn labels(value: &str, labels: &str) -> Vec<String> {
    let labels: Vec<String> = labels
        .split(':')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .collect();

    if labels.is_empty() {
        vec![value.to_string()]
    } else {
        labels
    }
}

fn thermostat(capability: &Capability) -> Map<String, Value> {
    let mut configuration = Map::new();

    if let Some(property) = capability.property(PropertyKind::ThermostatMode) {
        let modes: Vec<String> = property
            .thermostat_modes()
            .into_iter()
            .map(|(mode, _)| mode)
            .collect();
        configuration.insert("supportedModes".to_string(), json!(modes));
    }

    if capability.property(PropertyKind::ThermostatHold).is_some() {
        configuration.insert("supportsScheduling".to_string(), json!(true));
    }

    configuration
}

fn mode(capability: &Capability, locale: &str) -> Map<String, Value> {
    let mut configuration = Map::new();

    let Some(property) = capability.property(PropertyKind::Mode) else {
        return configuration;
    };

    let modes: Vec<Value> = property
        .supported_modes()
        .iter()
        .filter_map(|(value, names)| {
            let resources = friendly_names(&labels(value, names), locale)?;
            Some(json!({ "value": value, "modeResources": resources }))
        })
        .collect();

    configuration.insert("ordered".to_string(), json!(property.ordered()));
    configuration.insert("supportedModes".to_string(), json!(modes));
    configuration
}

fn range(capability: &Capability, locale: &str) -> Map<String, Value> {
    let mut configuration = Map::new();

    let Some(property) = capability.property(PropertyKind::RangeValue) else {
        return configuration;
    };
    let Some(range) = property.supported_range() else {
        return configuration;
    };

    configuration.insert(
        "supportedRange".to_string(),
        json!({
            "minimumValue": range.minimum,
            "maximumValue": range.maximum,
            "precision": range.precision,
        }),
    );

    if let Some(unit) = property.unit_of_measure().and_then(unit_id) {
        configuration.insert("unitOfMeasure".to_string(), json!(unit));
    }

    let presets: Vec<Value> = property
        .presets()
        .iter()
        .filter_map(|(value, names)| {
            let number = parse_number(value).filter(|number| range.contains(*number));
            let Some(number) = number else {
                debug!("Ignoring range preset {} outside of supported range", value);
                return None;
            };
            let resources = friendly_names(&labels(&format_number(number), names), locale)?;
            Some(json!({ "rangeValue": number, "presetResources": resources }))
        })
        .collect();

    if !presets.is_empty() {
        configuration.insert("presets".to_string(), json!(presets));
    }

    configuration
}

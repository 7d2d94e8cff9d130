/*!
 * Capability semantics of multi-instance capabilities.
 *
 * Action mappings are configured as `Action=target` and state mappings as
 * `State=target`. Range targets are an absolute value, a relative delta
 * written `(+d)`/`(-d)`, or for states a `lo:hi` range.
 */
use serde_json::{json, Value};
use tracing::debug;

use super::{Capability, CapabilityKind};
use crate::property::convert::parse_number;
use crate::property::{Property, PropertyKind, SupportedRange};
use crate::semantics::{is_action, is_state, Semantics};

pub(super) fn semantics(capability: &Capability) -> Option<Value> {
    let mut semantics = Semantics::new();

    match capability.kind() {
        CapabilityKind::ModeController => {
            if let Some(property) = capability.property(PropertyKind::Mode) {
                mode(&mut semantics, property);
            }
        }
        CapabilityKind::RangeController => {
            if let Some(property) = capability.property(PropertyKind::RangeValue) {
                range(&mut semantics, property);
            }
        }
        CapabilityKind::ToggleController => {
            if let Some(property) = capability.property(PropertyKind::ToggleState) {
                toggle(&mut semantics, property);
            }
        }
        _ => return None,
    }

    semantics.to_json()
}

fn action_mappings(property: &Property) -> impl Iterator<Item = (&str, &str)> {
    property
        .action_mappings()
        .iter()
        .map(|(action, target)| (action.as_str(), target.trim()))
        .filter(|(action, _)| is_action(action))
}

fn state_mappings(property: &Property) -> impl Iterator<Item = (&str, &str)> {
    property
        .state_mappings()
        .iter()
        .map(|(state, target)| (state.as_str(), target.trim()))
        .filter(|(state, _)| is_state(state))
}

fn mode(semantics: &mut Semantics, property: &Property) {
    let supported = |mode: &str| property.supported_modes().iter().any(|(value, _)| value == mode);

    for (action, mode) in action_mappings(property) {
        if supported(mode) {
            semantics.add_action_to_directive(action, "SetMode", json!({ "mode": mode }));
        } else {
            debug!("Ignoring {} action mapping to unsupported mode {}", action, mode);
        }
    }

    for (state, mode) in state_mappings(property) {
        if supported(mode) {
            semantics.add_state_to_value(state, json!(mode));
        } else {
            debug!("Ignoring {} state mapping to unsupported mode {}", state, mode);
        }
    }
}

/// Parse a relative delta written in parentheses, e.g. `(+d)`, `(-d)` or `(d)`
fn parse_delta(target: &str) -> Option<f64> {
    parse_number(target.strip_prefix('(')?.strip_suffix(')')?.trim())
}

fn range(semantics: &mut Semantics, property: &Property) {
    let Some(range) = property.supported_range() else {
        return;
    };

    for (action, target) in action_mappings(property) {
        if let Some(delta) = parse_delta(target) {
            if range.accepts_delta(delta) {
                semantics.add_action_to_directive(
                    action,
                    "AdjustRangeValue",
                    json!({ "rangeValueDelta": delta, "rangeValueDeltaDefault": false }),
                );
            } else {
                debug!("Ignoring {} action mapping with out of range delta {}", action, target);
            }
        } else if let Some(value) = parse_number(target).filter(|value| range.contains(*value)) {
            semantics.add_action_to_directive(action, "SetRangeValue", json!({ "rangeValue": value }));
        } else {
            debug!("Ignoring {} action mapping with invalid value {}", action, target);
        }
    }

    for (state, target) in state_mappings(property) {
        match parse_state_range(&range, target) {
            Some((minimum, maximum)) if minimum == maximum => {
                semantics.add_state_to_value(state, json!(minimum));
            }
            Some((minimum, maximum)) => semantics.add_state_to_range(state, minimum, maximum),
            None => debug!("Ignoring {} state mapping with invalid value {}", state, target),
        }
    }
}

/// Parse a state target `v` or `lo:hi` within the supported range
fn parse_state_range(range: &SupportedRange, target: &str) -> Option<(f64, f64)> {
    match target.split_once(':') {
        Some((minimum, maximum)) => {
            let minimum = parse_number(minimum)?;
            let maximum = parse_number(maximum)?;
            (minimum < maximum && range.contains(minimum) && range.contains(maximum))
                .then_some((minimum, maximum))
        }
        None => parse_number(target)
            .filter(|value| range.contains(*value))
            .map(|value| (value, value)),
    }
}

fn toggle(semantics: &mut Semantics, property: &Property) {
    for (action, target) in action_mappings(property) {
        match target {
            "TurnOn" | "TurnOff" => semantics.add_action_to_directive(action, target, json!({})),
            _ => debug!("Ignoring {} action mapping with invalid directive {}", action, target),
        }
    }

    for (state, target) in state_mappings(property) {
        match target.to_ascii_uppercase().as_str() {
            value @ ("ON" | "OFF") => semantics.add_state_to_value(state, json!(value)),
            _ => debug!("Ignoring {} state mapping with invalid value {}", state, target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use habskill_core::types::{Item, ServerSettings};

    fn capability(kind: CapabilityKind, property: PropertyKind, item: Item, config: Value) -> Capability {
        let config = config.as_object().cloned().unwrap_or_default();
        let mut capability = Capability::with_instance(kind, &item.name);
        capability.add_property(
            Property::bind(property, Some(&item), &config, &ServerSettings::default()).unwrap(),
        );
        capability
    }

    #[test]
    fn test_parse_delta() {
        assert_eq!(parse_delta("(+10)"), Some(10.0));
        assert_eq!(parse_delta("(-2.5)"), Some(-2.5));
        assert_eq!(parse_delta("(10)"), Some(10.0));
        assert_eq!(parse_delta("( 5 )"), Some(5.0));
        assert_eq!(parse_delta("(abc)"), None);
        assert_eq!(parse_delta("10"), None);
    }

    #[test]
    fn test_range_semantics() {
        let capability = capability(
            CapabilityKind::RangeController,
            PropertyKind::RangeValue,
            Item::new("blind", "Rollershutter"),
            json!({
                "supportedRange": "0:100:1",
                "actionMappings": "Close=100,Open=0,Lower=(+10),Raise=(-100)",
                "stateMappings": "Closed=100,Open=0:99"
            }),
        );

        let semantics = capability.semantics().unwrap();
        let actions = semantics["actionMappings"].as_array().unwrap();
        assert_eq!(actions.len(), 3);
        assert_eq!(actions[0]["directive"], json!({"name": "SetRangeValue", "payload": {"rangeValue": 100.0}}));
        assert_eq!(
            actions[2]["directive"]["payload"],
            json!({"rangeValueDelta": 10.0, "rangeValueDeltaDefault": false})
        );

        let states = semantics["stateMappings"].as_array().unwrap();
        assert_eq!(states[0], json!({"@type": "StatesToValue", "states": ["Alexa.States.Closed"], "value": 100.0}));
        assert_eq!(states[1]["range"], json!({"minimumValue": 0.0, "maximumValue": 99.0}));
    }

    #[test]
    fn test_range_semantics_unsigned_delta() {
        let capability = capability(
            CapabilityKind::RangeController,
            PropertyKind::RangeValue,
            Item::new("blind", "Rollershutter"),
            json!({"supportedRange": "0:100:1", "actionMappings": "Lower=(10),Drop=(100)"}),
        );

        let semantics = capability.semantics().unwrap();
        let actions = semantics["actionMappings"].as_array().unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(
            actions[0]["directive"],
            json!({"name": "AdjustRangeValue", "payload": {"rangeValueDelta": 10.0, "rangeValueDeltaDefault": false}})
        );
    }

    #[test]
    fn test_range_semantics_rejects_invalid_targets() {
        let capability = capability(
            CapabilityKind::RangeController,
            PropertyKind::RangeValue,
            Item::new("blind", "Rollershutter"),
            json!({
                "supportedRange": "0:100:1",
                "actionMappings": "Close=101,Open=abc",
                "stateMappings": "Closed=50:50,Open=60:40"
            }),
        );

        assert!(capability.semantics().is_none());
    }

    #[test]
    fn test_toggle_semantics() {
        let capability = capability(
            CapabilityKind::ToggleController,
            PropertyKind::ToggleState,
            Item::new("door", "Switch"),
            json!({
                "actionMappings": "Close=TurnOff,Lower=TurnOff,Open=TurnOn,Raise=Up",
                "stateMappings": "Closed=off,Open=ON"
            }),
        );

        let semantics = capability.semantics().unwrap();
        assert_eq!(
            semantics["actionMappings"][0]["actions"],
            json!(["Alexa.Actions.Close", "Alexa.Actions.Lower"])
        );
        assert_eq!(semantics["actionMappings"].as_array().unwrap().len(), 2);
        assert_eq!(semantics["stateMappings"][0]["value"], json!("OFF"));
    }

    #[test]
    fn test_mode_semantics() {
        let capability = capability(
            CapabilityKind::ModeController,
            PropertyKind::Mode,
            Item::new("door", "String"),
            json!({
                "supportedModes": "Up=Up,Down=Down",
                "actionMappings": "Raise=Up,Lower=Down,Close=Middle",
                "stateMappings": "Closed=Down"
            }),
        );

        let semantics = capability.semantics().unwrap();
        assert_eq!(semantics["actionMappings"].as_array().unwrap().len(), 2);
        assert_eq!(
            semantics["actionMappings"][0]["directive"],
            json!({"name": "SetMode", "payload": {"mode": "Up"}})
        );
        assert_eq!(semantics["stateMappings"][0]["value"], json!("Down"));
    }
}

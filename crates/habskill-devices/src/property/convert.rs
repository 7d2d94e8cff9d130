/*!
 * State and command conversions shared by the property table.
 *
 * State conversions receive a defined backend state (never NULL/UNDEF) and
 * return `None` when it cannot be parsed. Command conversions receive the
 * directive value and return the backend command.
 */
use serde_json::{json, Value};

use habskill_core::types::ItemType;
use habskill_core::utils::{clamp, format_number};

use super::{Property, TemperatureScale};
use crate::error::{DeviceError, Result};

/// Backend switch values
pub(crate) const ON: &str = "ON";
pub(crate) const OFF: &str = "OFF";

/// Parse the numeric part of a state, ignoring any unit (e.g. "21.5 °C")
pub(crate) fn parse_number(state: &str) -> Option<f64> {
    state
        .split_whitespace()
        .next()?
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

/// Round a number to a number of decimals
pub(crate) fn round(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Parse the brightness part of a color state ("hue,saturation,brightness")
fn color_components(state: &str) -> Option<(f64, f64, f64)> {
    let mut parts = state.split(',').map(|part| part.trim().parse::<f64>().ok());
    match (parts.next()??, parts.next()??, parts.next()??, parts.next()) {
        (h, s, b, None) => Some((h, s, b)),
        _ => None,
    }
}

fn switch_state(property: &Property, state: &str) -> Option<bool> {
    let on = match state {
        ON => true,
        OFF => false,
        _ => return None,
    };
    Some(on != property.inverted())
}

fn switch_command(property: &Property, on: bool) -> String {
    (if on != property.inverted() { ON } else { OFF }).to_string()
}

fn expect_str<'a>(value: &'a Value, what: &str) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| DeviceError::invalid_value(format!("Invalid {} value", what)))
}

fn expect_f64(value: &Value, what: &str) -> Result<f64> {
    value
        .as_f64()
        .filter(|n| n.is_finite())
        .ok_or_else(|| DeviceError::invalid_value(format!("Invalid {} value", what)))
}

fn expect_bool(value: &Value, what: &str) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| DeviceError::invalid_value(format!("Invalid {} value", what)))
}

fn on_off(value: &Value, what: &str) -> Result<bool> {
    match expect_str(value, what)? {
        ON => Ok(true),
        OFF => Ok(false),
        _ => Err(DeviceError::invalid_value(format!("Invalid {} value", what))),
    }
}

pub(crate) fn power_state(property: &Property, state: &str) -> Option<Value> {
    let on = match property.item_kind()? {
        ItemType::Dimmer => parse_number(state)? > 0.0,
        ItemType::Color => color_components(state)?.2 > 0.0,
        _ => return switch_state(property, state).map(|on| json!(if on { ON } else { OFF })),
    };
    Some(json!(if on != property.inverted() { ON } else { OFF }))
}

pub(crate) fn power_command(property: &Property, value: &Value) -> Result<String> {
    Ok(switch_command(property, on_off(value, "power state")?))
}

pub(crate) fn brightness(property: &Property, state: &str) -> Option<Value> {
    let brightness = match property.item_kind()? {
        ItemType::Color => color_components(state)?.2,
        _ => parse_number(state)?,
    };
    Some(json!(clamp(brightness.round(), 0.0, 100.0) as i64))
}

pub(crate) fn percent_command(_property: &Property, value: &Value) -> Result<String> {
    let percent = expect_f64(value, "percent")?;
    Ok(format_number(clamp(percent.round(), 0.0, 100.0)))
}

pub(crate) fn color(_property: &Property, state: &str) -> Option<Value> {
    let (hue, saturation, brightness) = color_components(state)?;
    Some(json!({
        "hue": hue,
        "saturation": round(saturation / 100.0, 4),
        "brightness": round(brightness / 100.0, 4),
    }))
}

pub(crate) fn color_command(_property: &Property, value: &Value) -> Result<String> {
    let hue = expect_f64(&value["hue"], "color hue")?;
    let saturation = expect_f64(&value["saturation"], "color saturation")?;
    let brightness = expect_f64(&value["brightness"], "color brightness")?;

    Ok(format!(
        "{},{},{}",
        format_number(round(clamp(hue, 0.0, 360.0), 2)),
        format_number(round(clamp(saturation, 0.0, 1.0) * 100.0, 2)),
        format_number(round(clamp(brightness, 0.0, 1.0) * 100.0, 2)),
    ))
}

pub(crate) fn percentage(property: &Property, state: &str) -> Option<Value> {
    let percent = clamp(parse_number(state)?.round(), 0.0, 100.0);
    let percent = if property.inverted() { 100.0 - percent } else { percent };
    Some(json!(percent as i64))
}

pub(crate) fn percentage_command(property: &Property, value: &Value) -> Result<String> {
    let percent = clamp(expect_f64(value, "percentage")?.round(), 0.0, 100.0);
    let percent = if property.inverted() { 100.0 - percent } else { percent };
    Ok(format_number(percent))
}

pub(crate) fn temperature(property: &Property, state: &str) -> Option<Value> {
    Some(json!({
        "value": parse_number(state)?,
        "scale": property.scale().as_str(),
    }))
}

pub(crate) fn setpoint_command(property: &Property, value: &Value) -> Result<String> {
    let temperature = expect_f64(&value["value"], "temperature")?;
    let scale = match value["scale"].as_str() {
        Some(scale) => TemperatureScale::parse(scale)
            .ok_or_else(|| DeviceError::invalid_value(format!("Unsupported temperature scale {}", scale)))?,
        None => property.scale(),
    };
    let temperature = round(scale.convert(temperature, property.scale()), 2);

    if let Some((minimum, maximum)) = property.setpoint_range() {
        if temperature < minimum || temperature > maximum {
            return Err(DeviceError::invalid_value(format!(
                "Temperature {} is out of range [{}, {}]",
                format_number(temperature),
                format_number(minimum),
                format_number(maximum)
            )));
        }
    }

    Ok(format_number(temperature))
}

pub(crate) fn thermostat_mode(property: &Property, state: &str) -> Option<Value> {
    property
        .thermostat_modes()
        .into_iter()
        .find(|(_, value)| value.eq_ignore_ascii_case(state))
        .map(|(mode, _)| json!(mode))
}

pub(crate) fn thermostat_mode_command(property: &Property, value: &Value) -> Result<String> {
    let mode = expect_str(value, "thermostat mode")?;
    property
        .thermostat_modes()
        .into_iter()
        .find(|(m, _)| m.eq_ignore_ascii_case(mode))
        .map(|(_, value)| value)
        .ok_or_else(|| DeviceError::invalid_value(format!("Thermostat mode {} is not supported", mode)))
}

pub(crate) fn thermostat_hold_command(property: &Property, _value: &Value) -> Result<String> {
    // Resuming the schedule releases the hold
    Ok(switch_command(property, false))
}

pub(crate) fn mode(property: &Property, state: &str) -> Option<Value> {
    property
        .supported_modes()
        .iter()
        .find(|(value, _)| value == state)
        .map(|(value, _)| json!(value))
}

pub(crate) fn mode_command(property: &Property, value: &Value) -> Result<String> {
    let mode = expect_str(value, "mode")?;
    property
        .supported_modes()
        .iter()
        .find(|(value, _)| value == mode)
        .map(|(value, _)| value.clone())
        .ok_or_else(|| DeviceError::invalid_value(format!("Mode {} is not supported", mode)))
}

pub(crate) fn range_value(property: &Property, state: &str) -> Option<Value> {
    let value = parse_number(state)?;
    Some(json!(property.supported_range().map_or(value, |range| range.clamp(value))))
}

pub(crate) fn range_value_command(property: &Property, value: &Value) -> Result<String> {
    let value = expect_f64(value, "range")?;
    if let Some(range) = property.supported_range() {
        if !range.contains(value) {
            return Err(DeviceError::invalid_value(format!(
                "Range value {} is out of range [{}, {}]",
                format_number(value),
                format_number(range.minimum),
                format_number(range.maximum)
            )));
        }
    }
    Ok(format_number(value))
}

/// Check if a backend state matches a state mapping (single value or `lo:hi` range)
fn state_matches(mapping: &str, state: &str) -> bool {
    match mapping.split_once(':') {
        Some((low, high)) => match (low.parse::<f64>(), high.parse::<f64>(), parse_number(state)) {
            (Ok(low), Ok(high), Some(value)) => low <= value && value <= high,
            _ => false,
        },
        None => match (mapping.parse::<f64>(), parse_number(state)) {
            (Ok(mapping), Some(value)) => mapping == value,
            _ => mapping == state,
        },
    }
}

pub(crate) fn toggle_state(property: &Property, state: &str) -> Option<Value> {
    if property.item_kind()? == ItemType::Switch {
        return switch_state(property, state).map(|on| json!(if on { ON } else { OFF }));
    }

    let mappings = property.state_mappings();
    let mapped = |key: &str| mappings.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str());

    let on = match (mapped("On"), mapped("Off")) {
        (Some(on), _) if state_matches(on, state) => true,
        (_, Some(off)) if state_matches(off, state) => false,
        (None, None) => match property.item_kind()? {
            ItemType::Number => parse_number(state)? != 0.0,
            _ => match state {
                ON => true,
                OFF => false,
                _ => return None,
            },
        },
        _ => return None,
    };

    Some(json!(if on != property.inverted() { ON } else { OFF }))
}

pub(crate) fn toggle_command(property: &Property, value: &Value) -> Result<String> {
    let on = on_off(value, "toggle state")?;

    if property.item_kind() == Some(ItemType::Switch) {
        return Ok(switch_command(property, on));
    }

    let on = on != property.inverted();
    let key = if on { "TurnOn" } else { "TurnOff" };
    let mapped = property
        .action_mappings()
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone());

    Ok(match (mapped, property.item_kind()) {
        (Some(value), _) => value,
        (None, Some(ItemType::Number)) => (if on { "1" } else { "0" }).to_string(),
        (None, _) => (if on { ON } else { OFF }).to_string(),
    })
}

pub(crate) fn detection_state(property: &Property, state: &str) -> Option<Value> {
    let detected = match state {
        "OPEN" | ON => true,
        "CLOSED" | OFF => false,
        _ => return None,
    };
    Some(json!(if detected != property.inverted() { "DETECTED" } else { "NOT_DETECTED" }))
}

pub(crate) fn lock_state(property: &Property, state: &str) -> Option<Value> {
    let locked = match (property.item_kind()?, state) {
        (ItemType::Contact, "CLOSED") | (ItemType::Switch, ON) => true,
        (ItemType::Contact, "OPEN") | (ItemType::Switch, OFF) => false,
        _ => return None,
    };
    Some(json!(if locked != property.inverted() { "LOCKED" } else { "UNLOCKED" }))
}

pub(crate) fn lock_command(property: &Property, value: &Value) -> Result<String> {
    if property.item_kind() != Some(ItemType::Switch) {
        return Err(DeviceError::invalid_value("Lock state is not controllable"));
    }
    match expect_str(value, "lock state")? {
        "LOCKED" => Ok(switch_command(property, true)),
        "UNLOCKED" => Ok(switch_command(property, false)),
        _ => Err(DeviceError::invalid_value("Invalid lock state value")),
    }
}

pub(crate) fn volume(_property: &Property, state: &str) -> Option<Value> {
    Some(json!(clamp(parse_number(state)?.round(), 0.0, 100.0) as i64))
}

pub(crate) fn muted(property: &Property, state: &str) -> Option<Value> {
    switch_state(property, state).map(Value::Bool)
}

pub(crate) fn muted_command(property: &Property, value: &Value) -> Result<String> {
    Ok(switch_command(property, expect_bool(value, "mute")?))
}

pub(crate) fn volume_steps_command(_property: &Property, value: &Value) -> Result<String> {
    let steps = expect_f64(value, "volume steps")?;
    if steps.fract() != 0.0 {
        return Err(DeviceError::invalid_value("Invalid volume steps value"));
    }
    Ok(format_number(steps))
}

/// Playback operations and their backend commands
pub(crate) const PLAYBACK_OPERATIONS: &[(&str, &str)] = &[
    ("Play", "PLAY"),
    ("Pause", "PAUSE"),
    ("Next", "NEXT"),
    ("Previous", "PREVIOUS"),
    ("Rewind", "REWIND"),
    ("FastForward", "FASTFORWARD"),
];

pub(crate) fn playback_command(_property: &Property, value: &Value) -> Result<String> {
    let operation = expect_str(value, "playback operation")?;
    PLAYBACK_OPERATIONS
        .iter()
        .find(|(name, _)| *name == operation)
        .map(|(_, command)| command.to_string())
        .ok_or_else(|| DeviceError::invalid_value(format!("Playback operation {} is not supported", operation)))
}

pub(crate) fn playback_stop_command(property: &Property, _value: &Value) -> Result<String> {
    Ok(switch_command(property, true))
}

pub(crate) fn connectivity(property: &Property, state: &str) -> Option<Value> {
    switch_state(property, state).map(|ok| json!({"value": if ok { "OK" } else { "UNREACHABLE" }}))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("21.5 °C"), Some(21.5));
        assert_eq!(parse_number("42"), Some(42.0));
        assert_eq!(parse_number("ON"), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn test_round() {
        assert_eq!(round(0.70000000001, 2), 0.7);
        assert_eq!(round(-1.26, 1), -1.3);
    }

    #[test]
    fn test_color_components() {
        assert_eq!(color_components("0,100,50"), Some((0.0, 100.0, 50.0)));
        assert_eq!(color_components("0,100"), None);
        assert_eq!(color_components("0,100,50,1"), None);
    }

    #[test]
    fn test_state_matches() {
        assert!(state_matches("1:3", "2"));
        assert!(state_matches("0", "0.0"));
        assert!(!state_matches("1:3", "4"));
        assert!(state_matches("running", "running"));
    }
}

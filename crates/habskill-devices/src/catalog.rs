/*!
 * Friendly name resources and the Alexa asset catalog.
 *
 * A label is either an asset reference (`@Setting.Oscillate`), a text with an
 * explicit locale (`Rotate@fr-FR`) or a plain text in the server locale.
 */
use serde_json::{json, Value};
use tracing::debug;

const ASSETS: &[&str] = &[
    "Button.WashCycle",
    "DeviceName.AirPurifier",
    "DeviceName.Fan",
    "DeviceName.Router",
    "DeviceName.Shade",
    "DeviceName.Shower",
    "DeviceName.SpaceHeater",
    "DeviceName.Washer",
    "Setting.2GGuestWiFi",
    "Setting.5GGuestWiFi",
    "Setting.Auto",
    "Setting.Direction",
    "Setting.DryCycle",
    "Setting.FanSpeed",
    "Setting.GuestWiFi",
    "Setting.Heat",
    "Setting.Mode",
    "Setting.Night",
    "Setting.Opening",
    "Setting.Oscillate",
    "Setting.Preset",
    "Setting.Quiet",
    "Setting.Temperature",
    "Setting.WashCycle",
    "Setting.WaterTemperature",
    "Shower.HandHeld",
    "Shower.RainHead",
    "Unit.Angle.Degrees",
    "Unit.Angle.Radians",
    "Unit.Distance.Feet",
    "Unit.Distance.Inches",
    "Unit.Distance.Kilometers",
    "Unit.Distance.Meters",
    "Unit.Distance.Miles",
    "Unit.Distance.Yards",
    "Unit.Mass.Grams",
    "Unit.Mass.Kilograms",
    "Unit.Percent",
    "Unit.Temperature.Celsius",
    "Unit.Temperature.Degrees",
    "Unit.Temperature.Fahrenheit",
    "Unit.Temperature.Kelvin",
    "Unit.Volume.CubicFeet",
    "Unit.Volume.CubicMeters",
    "Unit.Volume.Gallons",
    "Unit.Volume.Liters",
    "Unit.Volume.Pints",
    "Unit.Volume.Quarts",
    "Unit.Weight.Ounces",
    "Unit.Weight.Pounds",
    "Value.Close",
    "Value.Delicate",
    "Value.High",
    "Value.Low",
    "Value.Maximum",
    "Value.Medium",
    "Value.Minimum",
    "Value.Open",
    "Value.QuickWash",
];

/// Locales supported by text resources
pub const SUPPORTED_LOCALES: &[&str] = &[
    "ar-SA", "de-DE", "en-AU", "en-CA", "en-GB", "en-IN", "en-US", "es-ES", "es-MX", "es-US", "fr-CA",
    "fr-FR", "hi-IN", "it-IT", "ja-JP", "nl-NL", "pt-BR",
];

/// Resolve an asset reference (e.g. "Setting.Oscillate") into its asset id
pub fn asset_id(name: &str) -> Option<String> {
    let name = name.strip_prefix("Alexa.").unwrap_or(name);
    ASSETS
        .iter()
        .find(|asset| asset.eq_ignore_ascii_case(name))
        .map(|asset| format!("Alexa.{}", asset))
}

/// Resolve one label into a friendly name resource
///
/// # Arguments
///
/// * `label` - The label as configured
/// * `locale` - The locale used for plain texts
pub fn friendly_name(label: &str, locale: &str) -> Option<Value> {
    let label = label.trim();

    if let Some(asset) = label.strip_prefix('@') {
        return match asset_id(asset) {
            Some(asset_id) => Some(json!({"@type": "asset", "value": {"assetId": asset_id}})),
            None => {
                debug!("Ignoring unknown asset {}", asset);
                None
            }
        };
    }

    let (text, locale) = match label.rsplit_once('@') {
        Some((text, locale)) if SUPPORTED_LOCALES.contains(&locale) => (text, locale),
        _ => (label, locale),
    };

    if text.is_empty() {
        return None;
    }

    Some(json!({"@type": "text", "value": {"text": text, "locale": locale}}))
}

/// Build a friendly names resource block from labels
///
/// # Returns
///
/// The resource block, or `None` if no label resolves
pub fn friendly_names<S: AsRef<str>>(labels: &[S], locale: &str) -> Option<Value> {
    let mut names: Vec<Value> = Vec::new();

    for label in labels {
        if let Some(name) = friendly_name(label.as_ref(), locale) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }

    (!names.is_empty()).then(|| json!({ "friendlyNames": names }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_label() {
        assert_eq!(
            friendly_name("@Setting.Oscillate", "en-US"),
            Some(json!({"@type": "asset", "value": {"assetId": "Alexa.Setting.Oscillate"}}))
        );
        assert_eq!(friendly_name("@Setting.Unknown", "en-US"), None);
    }

    #[test]
    fn test_text_label() {
        assert_eq!(
            friendly_name("Rotate", "en-US"),
            Some(json!({"@type": "text", "value": {"text": "Rotate", "locale": "en-US"}}))
        );
        assert_eq!(
            friendly_name("Rotation@fr-FR", "en-US"),
            Some(json!({"@type": "text", "value": {"text": "Rotation", "locale": "fr-FR"}}))
        );
    }

    #[test]
    fn test_friendly_names() {
        let resources = friendly_names(&["@Setting.Oscillate", "Rotate", "Rotate"], "en-US").unwrap();
        assert_eq!(resources["friendlyNames"].as_array().unwrap().len(), 2);
        assert!(friendly_names::<&str>(&[], "en-US").is_none());
    }
}

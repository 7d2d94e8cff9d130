/*!
 * Capability resources of multi-instance capabilities.
 */
use serde_json::Value;

use super::Capability;
use crate::catalog::friendly_names;

pub(super) fn capability_resources(capability: &Capability, locale: &str) -> Option<Value> {
    capability.instance()?;

    capability
        .properties()
        .iter()
        .map(|property| property.capability_names())
        .find(|names| !names.is_empty())
        .and_then(|names| friendly_names(names, locale))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::capability::CapabilityKind;
    use crate::property::{Property, PropertyKind};
    use habskill_core::types::{Item, ServerSettings};

    #[test]
    fn test_resources_from_label() {
        let item = Item::new("FanOscillate", "Switch").with_label("Oscillate");
        let property = Property::bind(
            PropertyKind::ToggleState,
            Some(&item),
            &Default::default(),
            &ServerSettings::default(),
        )
        .unwrap();

        let mut capability = Capability::with_instance(CapabilityKind::ToggleController, &item.name);
        capability.add_property(property);

        assert_eq!(
            capability.resources("en-US"),
            Some(json!({"friendlyNames": [
                {"@type": "text", "value": {"text": "Oscillate", "locale": "en-US"}}
            ]}))
        );
    }

    #[test]
    fn test_resources_from_friendly_names() {
        let item = Item::new("FanOscillate", "Switch").with_label("Oscillate");
        let config = json!({"friendlyNames": "@Setting.Oscillate,Rotate@fr-FR"});
        let property = Property::bind(
            PropertyKind::ToggleState,
            Some(&item),
            config.as_object().unwrap(),
            &ServerSettings::default(),
        )
        .unwrap();

        let mut capability = Capability::with_instance(CapabilityKind::ToggleController, &item.name);
        capability.add_property(property);

        let resources = capability.resources("en-US").unwrap();
        assert_eq!(
            resources["friendlyNames"][0],
            json!({"@type": "asset", "value": {"assetId": "Alexa.Setting.Oscillate"}})
        );
        assert_eq!(
            resources["friendlyNames"][1],
            json!({"@type": "text", "value": {"text": "Rotate", "locale": "fr-FR"}})
        );
    }
}

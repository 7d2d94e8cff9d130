/*!
 * Device types and display category resolution.
 *
 * A device type names the kind of appliance an endpoint stands for. It gives
 * the endpoint its display categories and, for single-item endpoints without
 * explicit properties, the properties implied by the item type.
 */
use tracing::debug;

use habskill_core::types::{Item, ItemType};

use crate::capability::{Capability, CapabilityKind};
use crate::category::DisplayCategory;
use crate::property::PropertyKind;

type Bindings = &'static [(CapabilityKind, PropertyKind)];

/// A device type
#[derive(Debug)]
pub struct DeviceType {
    /// Type names, the first one being canonical
    pub names: &'static [&'static str],
    /// Display categories of the type
    pub categories: &'static [DisplayCategory],
    /// Item type specific default properties
    defaults: &'static [(ItemType, Bindings)],
}

impl DeviceType {
    /// Get the canonical name
    pub fn name(&self) -> &'static str {
        self.names[0]
    }

    /// Get the default properties of a single-item endpoint of this type
    pub fn default_properties(&self, item: &Item) -> Bindings {
        let Some(kind) = item.effective_kind() else {
            return &[];
        };

        self.defaults
            .iter()
            .find(|(item_type, _)| *item_type == kind)
            .map(|(_, bindings)| *bindings)
            .unwrap_or_else(|| generic_properties(item, kind))
    }
}

fn generic_properties(item: &Item, kind: ItemType) -> Bindings {
    use CapabilityKind::*;

    match kind {
        ItemType::Switch => &[(PowerController, PropertyKind::PowerState)],
        ItemType::Dimmer => &[
            (PowerController, PropertyKind::PowerState),
            (PercentageController, PropertyKind::Percentage),
        ],
        ItemType::Color => &[
            (PowerController, PropertyKind::PowerState),
            (BrightnessController, PropertyKind::Brightness),
            (ColorController, PropertyKind::Color),
        ],
        ItemType::Rollershutter => &[(PercentageController, PropertyKind::Percentage)],
        ItemType::Contact => &[(ContactSensor, PropertyKind::DetectionState)],
        ItemType::Number if item.dimension() == Some("Temperature") => {
            &[(TemperatureSensor, PropertyKind::Temperature)]
        }
        ItemType::Player => &[(PlaybackController, PropertyKind::Playback)],
        _ => &[],
    }
}

macro_rules! device_type {
    ([$($name:literal),+] => [$($category:ident),*]) => {
        device_type!([$($name),+] => [$($category),*], {})
    };
    ([$($name:literal),+] => [$($category:ident),*], {$($item_type:ident => [$(($capability:ident, $property:ident)),+]),*}) => {
        DeviceType {
            names: &[$($name),+],
            categories: &[$(DisplayCategory::$category),*],
            defaults: &[$((
                ItemType::$item_type,
                &[$((CapabilityKind::$capability, PropertyKind::$property)),+],
            )),*],
        }
    };
}

/// Supported device types
pub static DEVICE_TYPES: &[DeviceType] = &[
    device_type!(["Other"] => []),
    device_type!(["AirConditioner"] => [AirConditioner]),
    device_type!(["AirFreshener"] => [AirFreshener]),
    device_type!(["AirPurifier"] => [AirPurifier]),
    device_type!(["Awning", "ExteriorBlind", "Shutter"] => [ExteriorBlind]),
    device_type!(["Blind", "Curtain", "InteriorBlind"] => [InteriorBlind]),
    device_type!(["Camera"] => [Camera]),
    device_type!(["ChristmasTree"] => [ChristmasTree]),
    device_type!(["CoffeeMaker"] => [CoffeeMaker]),
    device_type!(["Computer"] => [Computer]),
    device_type!(["ContactSensor"] => [ContactSensor]),
    device_type!(["Dishwasher"] => [Dishwasher]),
    device_type!(["Door"] => [Door]),
    device_type!(["Doorbell"] => [Doorbell]),
    device_type!(["Dryer"] => [Dryer]),
    device_type!(["Fan"] => [Fan]),
    device_type!(["GameConsole"] => [GameConsole]),
    device_type!(["GarageDoor"] => [GarageDoor]),
    device_type!(["Headphones"] => [Headphones]),
    device_type!(["Hub"] => [Hub]),
    device_type!(["Laptop"] => [Laptop]),
    device_type!(["Light", "Lightbulb"] => [Light], {
        Dimmer => [(PowerController, PowerState), (BrightnessController, Brightness)]
    }),
    device_type!(["Lock", "Smartlock"] => [Smartlock], {
        Switch => [(LockController, LockState)],
        Contact => [(LockController, LockState)]
    }),
    device_type!(["Microwave"] => [Microwave]),
    device_type!(["MobilePhone"] => [MobilePhone]),
    device_type!(["MotionSensor"] => [MotionSensor], {
        Switch => [(MotionSensor, DetectionState)],
        Contact => [(MotionSensor, DetectionState)]
    }),
    device_type!(["MusicSystem"] => [MusicSystem]),
    device_type!(["NetworkHardware"] => [NetworkHardware]),
    device_type!(["Outlet", "Smartplug"] => [Smartplug]),
    device_type!(["Oven"] => [Oven]),
    device_type!(["Phone"] => [Phone]),
    device_type!(["Printer"] => [Printer]),
    device_type!(["Router"] => [Router]),
    device_type!(["Scene"] => [SceneTrigger]),
    device_type!(["Screen"] => [Screen]),
    device_type!(["SecurityPanel"] => [SecurityPanel]),
    device_type!(["SecuritySystem"] => [SecuritySystem]),
    device_type!(["SlowCooker"] => [SlowCooker]),
    device_type!(["Speaker"] => [Speaker], {
        Dimmer => [(Speaker, Volume)],
        Number => [(Speaker, Volume)],
        Switch => [(Speaker, Muted)]
    }),
    device_type!(["StreamingDevice"] => [StreamingDevice]),
    device_type!(["Switch", "WallSwitch"] => [Switch]),
    device_type!(["Tablet"] => [Tablet]),
    device_type!(["Television", "TV"] => [Tv]),
    device_type!(["TemperatureSensor"] => [TemperatureSensor], {
        Number => [(TemperatureSensor, Temperature)]
    }),
    device_type!(["Thermostat"] => [Thermostat], {
        Number => [(ThermostatController, TargetSetpoint)],
        String => [(ThermostatController, ThermostatMode)]
    }),
    device_type!(["VacuumCleaner"] => [VacuumCleaner]),
    device_type!(["Washer"] => [Washer]),
    device_type!(["WaterHeater"] => [WaterHeater]),
    device_type!(["Wearable"] => [Wearable]),
];

/// Find a device type by name (case-sensitive)
pub fn find(name: &str) -> Option<&'static DeviceType> {
    DEVICE_TYPES.iter().find(|device_type| device_type.names.contains(&name))
}

/// Resolve the display categories of an endpoint
///
/// Categories of the declared type come first, then the categories implied by
/// the capabilities, without duplicates. Unknown types contribute nothing and
/// an endpoint without any category is categorized as `OTHER`.
///
/// # Arguments
///
/// * `type_name` - The declared device type, if any
/// * `capabilities` - The capabilities of the endpoint
pub fn display_categories(type_name: Option<&str>, capabilities: &[Capability]) -> Vec<DisplayCategory> {
    let mut categories: Vec<DisplayCategory> = Vec::new();

    if let Some(name) = type_name {
        match find(name) {
            Some(device_type) => categories.extend_from_slice(device_type.categories),
            None => debug!("Unknown device type {}, using capability categories", name),
        }
    }

    for capability in capabilities {
        for category in capability.default_display_categories() {
            if !categories.contains(category) {
                categories.push(*category);
            }
        }
    }

    categories.dedup();
    if categories.is_empty() {
        categories.push(DisplayCategory::Other);
    }

    categories
}

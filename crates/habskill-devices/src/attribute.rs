/*!
 * Device attributes.
 *
 * An attribute is a shorthand metadata token (e.g. "Brightness") standing for
 * one or more capability properties.
 */
use crate::capability::CapabilityKind;
use crate::property::PropertyKind;

/// A device attribute
#[derive(Debug)]
pub struct DeviceAttribute {
    /// Attribute names, the first one being canonical
    pub names: &'static [&'static str],
    /// Capability properties the attribute stands for
    pub properties: &'static [(CapabilityKind, PropertyKind)],
}

impl DeviceAttribute {
    /// Get the canonical name
    pub fn name(&self) -> &'static str {
        self.names[0]
    }
}

macro_rules! attribute {
    ([$($name:literal),+] => [$(($capability:ident, $property:ident)),+]) => {
        DeviceAttribute {
            names: &[$($name),+],
            properties: &[$((CapabilityKind::$capability, PropertyKind::$property)),+],
        }
    };
}

/// Supported attributes
pub static ATTRIBUTES: &[DeviceAttribute] = &[
    attribute!(["PowerState"] => [(PowerController, PowerState)]),
    attribute!(["Brightness"] => [(BrightnessController, Brightness)]),
    attribute!(["Color"] => [(ColorController, Color)]),
    attribute!(["Percentage"] => [(PercentageController, Percentage)]),
    attribute!(["TargetTemperature", "TargetSetpoint"] => [(ThermostatController, TargetSetpoint)]),
    attribute!(["LowerTemperature", "LowerSetpoint"] => [(ThermostatController, LowerSetpoint)]),
    attribute!(["UpperTemperature", "UpperSetpoint"] => [(ThermostatController, UpperSetpoint)]),
    attribute!(["HeatingCoolingMode", "ThermostatMode"] => [(ThermostatController, ThermostatMode)]),
    attribute!(["ThermostatHold"] => [(ThermostatController, ThermostatHold)]),
    attribute!(["CurrentTemperature", "Temperature"] => [(TemperatureSensor, Temperature)]),
    attribute!(["LockState"] => [(LockController, LockState)]),
    attribute!(["ContactDetectionState"] => [(ContactSensor, DetectionState)]),
    attribute!(["MotionDetectionState"] => [(MotionSensor, DetectionState)]),
    attribute!(["Volume"] => [(Speaker, Volume)]),
    attribute!(["Muted"] => [(Speaker, Muted)]),
    attribute!(["VolumeSteps"] => [(StepSpeaker, VolumeSteps)]),
    attribute!(["MuteStep"] => [(StepSpeaker, MuteStep)]),
    attribute!(["Playback"] => [(PlaybackController, Playback)]),
    attribute!(["PlaybackStop"] => [(PlaybackController, PlaybackStop)]),
    attribute!(["Connectivity", "EndpointHealth"] => [(EndpointHealth, Connectivity)]),
    attribute!(["Mode"] => [(ModeController, Mode)]),
    attribute!(["RangeValue"] => [(RangeController, RangeValue)]),
    attribute!(["Toggle", "ToggleState"] => [(ToggleController, ToggleState)]),
];

/// Find an attribute by name (case-sensitive)
pub fn find(name: &str) -> Option<&'static DeviceAttribute> {
    ATTRIBUTES.iter().find(|attribute| attribute.names.contains(&name))
}

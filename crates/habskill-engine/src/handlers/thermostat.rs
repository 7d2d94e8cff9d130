/*!
 * `Alexa.ThermostatController` directives.
 */
use async_trait::async_trait;
use serde_json::{json, Value};

use habskill_core::utils::clamp;
use habskill_devices::capability::CapabilityKind;
use habskill_devices::endpoint::ResolvedEndpoint;
use habskill_devices::property::{PropertyKind, TemperatureScale};

use super::{payload_field, require_endpoint, target_property, DirectiveHandler, Outcome};
use crate::context::HandlerContext;
use crate::directive::Directive;
use crate::error::{Error, Result};

/// Setpoint payload fields and their properties
const SETPOINTS: &[(&str, PropertyKind)] = &[
    ("targetSetpoint", PropertyKind::TargetSetpoint),
    ("lowerSetpoint", PropertyKind::LowerSetpoint),
    ("upperSetpoint", PropertyKind::UpperSetpoint),
];

/// Thermostat controller handler
#[derive(Debug, Clone, Copy, Default)]
pub struct ThermostatControllerHandler;

impl ThermostatControllerHandler {
    async fn set_target_temperature(
        &self,
        directive: &Directive,
        endpoint: &ResolvedEndpoint,
        context: &HandlerContext,
    ) -> Result<()> {
        let setpoints: Vec<(&Value, PropertyKind)> = SETPOINTS
            .iter()
            .filter_map(|(field, kind)| directive.payload_field(field).map(|value| (value, *kind)))
            .collect();

        if setpoints.is_empty() {
            return Err(Error::invalid_directive("Missing setpoint payload"));
        }

        // Validate every setpoint before sending any command
        let commands = setpoints
            .iter()
            .map(|(value, kind)| -> Result<_> {
                let property = target_property(directive, endpoint, CapabilityKind::ThermostatController, *kind)?;
                Ok((property, property.get_command(value)?))
            })
            .collect::<Result<Vec<_>>>()?;

        for (property, command) in commands {
            context.send_raw_command(property, &command).await?;
        }

        Ok(())
    }

    async fn adjust_target_temperature(
        &self,
        directive: &Directive,
        endpoint: &ResolvedEndpoint,
        context: &HandlerContext,
    ) -> Result<()> {
        let property = target_property(
            directive,
            endpoint,
            CapabilityKind::ThermostatController,
            PropertyKind::TargetSetpoint,
        )?;

        let delta = payload_field(directive, "targetSetpointDelta")?;
        let value = delta["value"]
            .as_f64()
            .ok_or_else(|| Error::invalid_value("Invalid target setpoint delta value"))?;
        let scale = delta["scale"]
            .as_str()
            .and_then(TemperatureScale::parse)
            .unwrap_or_else(|| property.scale());

        let current = context.current_state(property).await?;
        let current = current["value"]
            .as_f64()
            .ok_or_else(|| Error::internal(format!("Unexpected target setpoint state {}", current)))?;

        let mut target = current + scale.convert_delta(value, property.scale());
        if let Some((minimum, maximum)) = property.setpoint_range() {
            target = clamp(target, minimum, maximum);
        }

        context
            .send_command(property, &json!({"value": target, "scale": property.scale().as_str()}))
            .await
    }
}

#[async_trait]
impl DirectiveHandler for ThermostatControllerHandler {
    fn namespace(&self) -> &'static str {
        "Alexa.ThermostatController"
    }

    fn names(&self) -> &'static [&'static str] {
        &[
            "SetTargetTemperature",
            "AdjustTargetTemperature",
            "SetThermostatMode",
            "ResumeSchedule",
        ]
    }

    async fn handle(
        &self,
        directive: &Directive,
        endpoint: Option<&ResolvedEndpoint>,
        context: &HandlerContext,
    ) -> Result<Outcome> {
        let endpoint = require_endpoint(endpoint)?;

        match directive.name() {
            "SetTargetTemperature" => self.set_target_temperature(directive, endpoint, context).await?,
            "AdjustTargetTemperature" => self.adjust_target_temperature(directive, endpoint, context).await?,
            "SetThermostatMode" => {
                let property = target_property(
                    directive,
                    endpoint,
                    CapabilityKind::ThermostatController,
                    PropertyKind::ThermostatMode,
                )?;
                let mode = &payload_field(directive, "thermostatMode")?["value"];
                context.send_command(property, mode).await?;
            }
            _ => {
                let property = target_property(
                    directive,
                    endpoint,
                    CapabilityKind::ThermostatController,
                    PropertyKind::ThermostatHold,
                )?;
                context.send_command(property, &Value::Null).await?;
            }
        }

        Ok(Outcome::Completed)
    }
}

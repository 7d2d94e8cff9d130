/*!
 * `Alexa.Speaker` directives.
 */
use async_trait::async_trait;
use serde_json::json;

use habskill_core::utils::clamp;
use habskill_devices::capability::CapabilityKind;
use habskill_devices::endpoint::ResolvedEndpoint;
use habskill_devices::property::PropertyKind;

use super::{
    current_number, payload_field, payload_number, require_endpoint, target_property, DirectiveHandler, Outcome,
};
use crate::context::HandlerContext;
use crate::directive::Directive;
use crate::error::Result;

/// Speaker handler
#[derive(Debug, Clone, Copy, Default)]
pub struct SpeakerHandler;

#[async_trait]
impl DirectiveHandler for SpeakerHandler {
    fn namespace(&self) -> &'static str {
        "Alexa.Speaker"
    }

    fn names(&self) -> &'static [&'static str] {
        &["SetVolume", "AdjustVolume", "SetMute"]
    }

    async fn handle(
        &self,
        directive: &Directive,
        endpoint: Option<&ResolvedEndpoint>,
        context: &HandlerContext,
    ) -> Result<Outcome> {
        let endpoint = require_endpoint(endpoint)?;

        match directive.name() {
            "SetMute" => {
                let property = target_property(directive, endpoint, CapabilityKind::Speaker, PropertyKind::Muted)?;
                context.send_command(property, payload_field(directive, "mute")?).await?;
            }
            "SetVolume" => {
                let property = target_property(directive, endpoint, CapabilityKind::Speaker, PropertyKind::Volume)?;
                context.send_command(property, payload_field(directive, "volume")?).await?;
            }
            _ => {
                let property = target_property(directive, endpoint, CapabilityKind::Speaker, PropertyKind::Volume)?;
                let mut delta = payload_number(directive, "volume")?;

                // Default adjustments use the configured increment
                let is_default = directive
                    .payload_field("volumeDefault")
                    .and_then(|value| value.as_bool())
                    .unwrap_or(false);
                if let (true, Some(increment)) = (is_default, property.increment()) {
                    delta = increment.copysign(delta);
                }

                let volume = current_number(context, property).await?;
                context
                    .send_command(property, &json!(clamp(volume + delta, 0.0, 100.0)))
                    .await?;
            }
        }

        Ok(Outcome::Completed)
    }
}

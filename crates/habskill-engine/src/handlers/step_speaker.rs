/*!
 * `Alexa.StepSpeaker` directives.
 */
use async_trait::async_trait;

use habskill_devices::capability::CapabilityKind;
use habskill_devices::endpoint::ResolvedEndpoint;
use habskill_devices::property::PropertyKind;

use super::{payload_field, require_endpoint, target_property, DirectiveHandler, Outcome};
use crate::context::HandlerContext;
use crate::directive::Directive;
use crate::error::Result;

/// Step speaker handler
#[derive(Debug, Clone, Copy, Default)]
pub struct StepSpeakerHandler;

#[async_trait]
impl DirectiveHandler for StepSpeakerHandler {
    fn namespace(&self) -> &'static str {
        "Alexa.StepSpeaker"
    }

    fn names(&self) -> &'static [&'static str] {
        &["AdjustVolume", "SetMute"]
    }

    async fn handle(
        &self,
        directive: &Directive,
        endpoint: Option<&ResolvedEndpoint>,
        context: &HandlerContext,
    ) -> Result<Outcome> {
        let endpoint = require_endpoint(endpoint)?;

        let (kind, field) = match directive.name() {
            "SetMute" => (PropertyKind::MuteStep, "mute"),
            _ => (PropertyKind::VolumeSteps, "volumeSteps"),
        };
        let property = target_property(directive, endpoint, CapabilityKind::StepSpeaker, kind)?;

        context.send_command(property, payload_field(directive, field)?).await?;
        Ok(Outcome::Completed)
    }
}

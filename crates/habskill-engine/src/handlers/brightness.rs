/*!
 * `Alexa.BrightnessController` directives.
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

/// Brightness controller handler
#[derive(Debug, Clone, Copy, Default)]
pub struct BrightnessControllerHandler;

#[async_trait]
impl DirectiveHandler for BrightnessControllerHandler {
    fn namespace(&self) -> &'static str {
        "Alexa.BrightnessController"
    }

    fn names(&self) -> &'static [&'static str] {
        &["SetBrightness", "AdjustBrightness"]
    }

    async fn handle(
        &self,
        directive: &Directive,
        endpoint: Option<&ResolvedEndpoint>,
        context: &HandlerContext,
    ) -> Result<Outcome> {
        let endpoint = require_endpoint(endpoint)?;
        let property = target_property(
            directive,
            endpoint,
            CapabilityKind::BrightnessController,
            PropertyKind::Brightness,
        )?;

        if directive.name() == "SetBrightness" {
            context.send_command(property, payload_field(directive, "brightness")?).await?;
        } else {
            let delta = payload_number(directive, "brightnessDelta")?;
            let brightness = current_number(context, property).await?;
            context
                .send_command(property, &json!(clamp(brightness + delta, 0.0, 100.0)))
                .await?;
        }

        Ok(Outcome::Completed)
    }
}

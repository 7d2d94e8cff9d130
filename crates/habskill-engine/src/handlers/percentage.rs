/*!
 * `Alexa.PercentageController` directives.
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

/// Percentage controller handler
#[derive(Debug, Clone, Copy, Default)]
pub struct PercentageControllerHandler;

#[async_trait]
impl DirectiveHandler for PercentageControllerHandler {
    fn namespace(&self) -> &'static str {
        "Alexa.PercentageController"
    }

    fn names(&self) -> &'static [&'static str] {
        &["SetPercentage", "AdjustPercentage"]
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
            CapabilityKind::PercentageController,
            PropertyKind::Percentage,
        )?;

        if directive.name() == "SetPercentage" {
            context.send_command(property, payload_field(directive, "percentage")?).await?;
        } else {
            // The state is already corrected for inverted items
            let delta = payload_number(directive, "percentageDelta")?;
            let percentage = current_number(context, property).await?;
            context
                .send_command(property, &json!(clamp(percentage + delta, 0.0, 100.0)))
                .await?;
        }

        Ok(Outcome::Completed)
    }
}

/*!
 * `Alexa.ToggleController` directives.
 */
use async_trait::async_trait;
use serde_json::json;

use habskill_devices::capability::CapabilityKind;
use habskill_devices::endpoint::ResolvedEndpoint;
use habskill_devices::property::PropertyKind;

use super::{require_endpoint, target_property, DirectiveHandler, Outcome};
use crate::context::HandlerContext;
use crate::directive::Directive;
use crate::error::Result;

/// Toggle controller handler, targeting the directive instance
#[derive(Debug, Clone, Copy, Default)]
pub struct ToggleControllerHandler;

#[async_trait]
impl DirectiveHandler for ToggleControllerHandler {
    fn namespace(&self) -> &'static str {
        "Alexa.ToggleController"
    }

    fn names(&self) -> &'static [&'static str] {
        &["TurnOn", "TurnOff"]
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
            CapabilityKind::ToggleController,
            PropertyKind::ToggleState,
        )?;

        let state = if directive.name() == "TurnOn" { "ON" } else { "OFF" };
        context.send_command(property, &json!(state)).await?;
        Ok(Outcome::Completed)
    }
}

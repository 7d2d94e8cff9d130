/*!
 * `Alexa.ModeController` directives.
 */
use async_trait::async_trait;
use serde_json::json;

use habskill_devices::capability::CapabilityKind;
use habskill_devices::endpoint::ResolvedEndpoint;
use habskill_devices::property::PropertyKind;

use super::{payload_field, payload_number, require_endpoint, target_property, DirectiveHandler, Outcome};
use crate::context::HandlerContext;
use crate::directive::Directive;
use crate::error::{Error, Result};

/// Mode controller handler, targeting the directive instance
#[derive(Debug, Clone, Copy, Default)]
pub struct ModeControllerHandler;

#[async_trait]
impl DirectiveHandler for ModeControllerHandler {
    fn namespace(&self) -> &'static str {
        "Alexa.ModeController"
    }

    fn names(&self) -> &'static [&'static str] {
        &["SetMode", "AdjustMode"]
    }

    async fn handle(
        &self,
        directive: &Directive,
        endpoint: Option<&ResolvedEndpoint>,
        context: &HandlerContext,
    ) -> Result<Outcome> {
        let endpoint = require_endpoint(endpoint)?;
        let property = target_property(directive, endpoint, CapabilityKind::ModeController, PropertyKind::Mode)?;

        if directive.name() == "SetMode" {
            context.send_command(property, payload_field(directive, "mode")?).await?;
            return Ok(Outcome::Completed);
        }

        if !property.ordered() {
            return Err(Error::invalid_value("The modes are not ordered."));
        }

        let delta = payload_number(directive, "modeDelta")? as i64;
        let modes = property.supported_modes();
        let current = context.current_state(property).await?;
        let index = modes
            .iter()
            .position(|(value, _)| current.as_str() == Some(value.as_str()))
            .ok_or_else(|| Error::endpoint_unreachable("Unable to get mode state"))?;

        let last = modes.len() as i64 - 1;
        let target = (index as i64 + delta).clamp(0, last) as usize;
        context.send_command(property, &json!(modes[target].0)).await?;

        Ok(Outcome::Completed)
    }
}

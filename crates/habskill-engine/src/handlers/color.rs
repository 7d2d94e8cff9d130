/*!
 * `Alexa.ColorController` directives.
 */
use async_trait::async_trait;

use habskill_devices::capability::CapabilityKind;
use habskill_devices::endpoint::ResolvedEndpoint;
use habskill_devices::property::PropertyKind;

use super::{payload_field, require_endpoint, target_property, DirectiveHandler, Outcome};
use crate::context::HandlerContext;
use crate::directive::Directive;
use crate::error::Result;

/// Color controller handler
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorControllerHandler;

#[async_trait]
impl DirectiveHandler for ColorControllerHandler {
    fn namespace(&self) -> &'static str {
        "Alexa.ColorController"
    }

    fn names(&self) -> &'static [&'static str] {
        &["SetColor"]
    }

    async fn handle(
        &self,
        directive: &Directive,
        endpoint: Option<&ResolvedEndpoint>,
        context: &HandlerContext,
    ) -> Result<Outcome> {
        let endpoint = require_endpoint(endpoint)?;
        let property = target_property(directive, endpoint, CapabilityKind::ColorController, PropertyKind::Color)?;

        context.send_command(property, payload_field(directive, "color")?).await?;
        Ok(Outcome::Completed)
    }
}

/*!
 * `Alexa.LockController` directives.
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

/// Lock controller handler
#[derive(Debug, Clone, Copy, Default)]
pub struct LockControllerHandler;

#[async_trait]
impl DirectiveHandler for LockControllerHandler {
    fn namespace(&self) -> &'static str {
        "Alexa.LockController"
    }

    fn names(&self) -> &'static [&'static str] {
        &["Lock", "Unlock"]
    }

    async fn handle(
        &self,
        directive: &Directive,
        endpoint: Option<&ResolvedEndpoint>,
        context: &HandlerContext,
    ) -> Result<Outcome> {
        let endpoint = require_endpoint(endpoint)?;
        let property = target_property(directive, endpoint, CapabilityKind::LockController, PropertyKind::LockState)?;

        let state = if directive.name() == "Lock" { "LOCKED" } else { "UNLOCKED" };
        context.send_command(property, &json!(state)).await?;
        Ok(Outcome::Completed)
    }
}

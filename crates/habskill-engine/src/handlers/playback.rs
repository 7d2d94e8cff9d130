/*!
 * `Alexa.PlaybackController` directives.
 */
use async_trait::async_trait;
use serde_json::{json, Value};

use habskill_devices::capability::CapabilityKind;
use habskill_devices::endpoint::ResolvedEndpoint;
use habskill_devices::property::PropertyKind;

use super::{require_endpoint, target_property, DirectiveHandler, Outcome};
use crate::context::HandlerContext;
use crate::directive::Directive;
use crate::error::Result;

/// Playback controller handler
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaybackControllerHandler;

#[async_trait]
impl DirectiveHandler for PlaybackControllerHandler {
    fn namespace(&self) -> &'static str {
        "Alexa.PlaybackController"
    }

    fn names(&self) -> &'static [&'static str] {
        &["Play", "Pause", "Stop", "Next", "Previous", "Rewind", "FastForward"]
    }

    async fn handle(
        &self,
        directive: &Directive,
        endpoint: Option<&ResolvedEndpoint>,
        context: &HandlerContext,
    ) -> Result<Outcome> {
        let endpoint = require_endpoint(endpoint)?;

        if directive.name() == "Stop" {
            let property = target_property(
                directive,
                endpoint,
                CapabilityKind::PlaybackController,
                PropertyKind::PlaybackStop,
            )?;
            context.send_command(property, &Value::Null).await?;
        } else {
            let property = target_property(
                directive,
                endpoint,
                CapabilityKind::PlaybackController,
                PropertyKind::Playback,
            )?;
            context.send_command(property, &json!(directive.name())).await?;
        }

        Ok(Outcome::Completed)
    }
}

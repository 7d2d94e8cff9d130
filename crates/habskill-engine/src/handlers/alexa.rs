/*!
 * `Alexa` directives.
 */
use async_trait::async_trait;
use tracing::warn;

use habskill_devices::endpoint::ResolvedEndpoint;

use super::{require_endpoint, DirectiveHandler, Outcome};
use crate::context::HandlerContext;
use crate::directive::Directive;
use crate::error::{Error, Result};
use crate::response::{ContextProperty, Response, ALEXA_NAMESPACE};

/// Name of state report events
pub const STATE_REPORT_NAME: &str = "StateReport";

/// State report handler
#[derive(Debug, Clone, Copy, Default)]
pub struct AlexaHandler;

#[async_trait]
impl DirectiveHandler for AlexaHandler {
    fn namespace(&self) -> &'static str {
        ALEXA_NAMESPACE
    }

    fn names(&self) -> &'static [&'static str] {
        &["ReportState"]
    }

    async fn handle(
        &self,
        directive: &Directive,
        endpoint: Option<&ResolvedEndpoint>,
        context: &HandlerContext,
    ) -> Result<Outcome> {
        let endpoint = require_endpoint(endpoint)?;
        let states = context.read_properties(endpoint).await;

        // Item backed properties must yield at least one value
        let item_backed: Vec<bool> = states
            .iter()
            .filter(|(_, property, _)| property.item().is_some())
            .map(|(_, _, value)| value.is_some())
            .collect();
        if !item_backed.is_empty() && !item_backed.contains(&true) {
            warn!("No state available for endpoint {}", endpoint.id);
            return Err(Error::endpoint_unreachable("Unable to reach device"));
        }

        let properties = states
            .into_iter()
            .filter_map(|(capability, property, value)| {
                value.map(|value| ContextProperty::new(capability, property, value))
            })
            .collect();

        Ok(Outcome::Respond(
            Response::new(Some(directive), ALEXA_NAMESPACE, STATE_REPORT_NAME).with_properties(properties),
        ))
    }
}

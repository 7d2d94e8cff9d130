/*!
 * `Alexa.Discovery` directives.
 */
use async_trait::async_trait;
use serde_json::json;
use tracing::error;

use habskill_devices::endpoint::ResolvedEndpoint;
use habskill_devices::Discoverer;

use super::{DirectiveHandler, Outcome};
use crate::context::HandlerContext;
use crate::directive::Directive;
use crate::error::{Error, Result};
use crate::response::Response;

/// Discovery namespace
pub const DISCOVERY_NAMESPACE: &str = "Alexa.Discovery";

/// Name of discovery responses
pub const DISCOVER_RESPONSE_NAME: &str = "Discover.Response";

/// Discovery handler
#[derive(Debug, Clone, Default)]
pub struct DiscoveryHandler {
    discoverer: Discoverer,
}

impl DiscoveryHandler {
    /// Create a new discovery handler
    pub fn new(discoverer: Discoverer) -> Self {
        Self { discoverer }
    }
}

#[async_trait]
impl DirectiveHandler for DiscoveryHandler {
    fn namespace(&self) -> &'static str {
        DISCOVERY_NAMESPACE
    }

    fn names(&self) -> &'static [&'static str] {
        &["Discover"]
    }

    fn is_endpoint_scoped(&self) -> bool {
        false
    }

    async fn handle(
        &self,
        directive: &Directive,
        _endpoint: Option<&ResolvedEndpoint>,
        context: &HandlerContext,
    ) -> Result<Outcome> {
        let (items, settings) = futures::try_join!(
            context.backend().fetch_all_items(),
            context.backend().get_server_settings()
        )
        .map_err(|e| {
            error!("Failed to fetch items: {}", e);
            Error::bridge_unreachable("Unable to retrieve openHAB items")
        })?;

        let endpoints = self.discoverer.discover(&items, &settings)?;

        Ok(Outcome::Respond(
            Response::new(Some(directive), DISCOVERY_NAMESPACE, DISCOVER_RESPONSE_NAME)
                .without_endpoint()
                .with_payload(json!({ "endpoints": endpoints })),
        ))
    }
}

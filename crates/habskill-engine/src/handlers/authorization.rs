/*!
 * `Alexa.Authorization` directives.
 *
 * Accepting a grant exchanges the authorization code for Login with Amazon
 * credentials, stores the refresh token under the openHAB server uuid and,
 * when the server hosts the Alexa binding, forwards the credentials to it.
 */
use async_trait::async_trait;
use serde_json::{json, Map};
use tracing::{info, warn};

use habskill_devices::endpoint::ResolvedEndpoint;

use super::{DirectiveHandler, Outcome};
use crate::backend::UserSettings;
use crate::binding;
use crate::context::HandlerContext;
use crate::directive::Directive;
use crate::error::{Error, Result, AUTHORIZATION_NAMESPACE};
use crate::response::Response;

/// Name of accept grant responses
pub const ACCEPT_GRANT_RESPONSE_NAME: &str = "AcceptGrant.Response";

/// Authorization handler
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthorizationHandler;

#[async_trait]
impl DirectiveHandler for AuthorizationHandler {
    fn namespace(&self) -> &'static str {
        AUTHORIZATION_NAMESPACE
    }

    fn names(&self) -> &'static [&'static str] {
        &["AcceptGrant"]
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
        let code = directive
            .payload_field("grant")
            .and_then(|grant| grant.get("code"))
            .and_then(|code| code.as_str())
            .filter(|code| !code.is_empty())
            .ok_or_else(|| Error::accept_grant_failed("Missing authorization parameters"))?;

        let settings = context.server_settings().await?;

        let credentials = context.tokens().get_access_token(code).await.map_err(|e| {
            warn!("Failed to obtain access token: {}", e);
            Error::accept_grant_failed("Failed to obtain and store user credentials")
        })?;

        match settings.runtime.uuid.as_deref() {
            Some(user_id) => {
                let user_settings = UserSettings {
                    refresh_token: credentials.refresh_token.clone(),
                };
                context.credentials().save(user_id, user_settings).await.map_err(|e| {
                    warn!("Failed to save user credentials: {}", e);
                    Error::accept_grant_failed("Failed to obtain and store user credentials")
                })?;
                info!("Stored credentials for user {}", user_id);
            }
            None => warn!("Server uuid not available, credentials not stored"),
        }

        if binding::is_required(settings.runtime.version.as_deref()) {
            let mut extra = Map::new();
            extra.insert("credentials".to_string(), serde_json::to_value(&credentials)?);
            binding::relay(directive, context, extra).await?;
        }

        Ok(Outcome::Respond(
            Response::new(Some(directive), AUTHORIZATION_NAMESPACE, ACCEPT_GRANT_RESPONSE_NAME)
                .without_endpoint()
                .with_payload(json!({})),
        ))
    }
}

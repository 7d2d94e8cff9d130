/*!
 * Directive dispatcher.
 *
 * The dispatcher parses an inbound directive, resolves its handler and target
 * endpoint, runs the handler and converts the outcome into exactly one
 * response. Errors are converted into error responses here and nowhere else.
 */
use std::sync::Arc;

use serde_json::{json, Map, Value};
use tracing::{debug, error, warn, Instrument};

use habskill_core::logging::directive_span;
use habskill_devices::endpoint::ResolvedEndpoint;

use crate::binding;
use crate::context::HandlerContext;
use crate::directive::Directive;
use crate::error::{Error, Result};
use crate::handlers::{default_handlers, DirectiveHandler, Outcome};
use crate::response::Response;

/// Directive dispatcher
#[derive(Debug, Clone)]
pub struct Dispatcher {
    /// The registered handlers
    handlers: Vec<Arc<dyn DirectiveHandler>>,
    /// The handler context
    context: HandlerContext,
}

impl Dispatcher {
    /// Create a dispatcher without handlers
    pub fn new(context: HandlerContext) -> Self {
        Self {
            handlers: Vec::new(),
            context,
        }
    }

    /// Create a dispatcher with the default handlers
    pub fn with_default_handlers(context: HandlerContext) -> Self {
        Self {
            handlers: default_handlers(),
            context,
        }
    }

    /// Register a handler, replacing any handler of the same namespace
    pub fn register_handler<H: DirectiveHandler + 'static>(&mut self, handler: H) {
        self.handlers.retain(|h| h.namespace() != handler.namespace());
        self.handlers.push(Arc::new(handler));
    }

    /// Get the handler of a directive
    pub fn handler(&self, namespace: &str, name: &str) -> Option<&Arc<dyn DirectiveHandler>> {
        self.handlers.iter().find(|handler| handler.supports(namespace, name))
    }

    /// Get the handler context
    pub fn context(&self) -> &HandlerContext {
        &self.context
    }

    /// Handle a request and return the response event
    ///
    /// Never fails: every error is converted into an error response.
    pub async fn handle(&self, request: &Value) -> Value {
        let response = match Directive::parse(request) {
            Ok(directive) => {
                let span = directive_span(
                    directive.namespace(),
                    directive.name(),
                    &directive.header.message_id,
                );
                self.handle_directive(&directive).instrument(span).await
            }
            Err(err) => {
                warn!("Rejecting request: {}", err);
                Response::error(None, &err)
            }
        };

        response.to_json().unwrap_or_else(|e| {
            error!("Failed to serialize response: {}", e);
            json!({
                "event": {
                    "header": {
                        "namespace": "Alexa",
                        "name": "ErrorResponse",
                        "payloadVersion": "3",
                        "messageId": uuid::Uuid::new_v4().to_string(),
                    },
                    "payload": {"type": "INTERNAL_ERROR", "message": "Failed to serialize response"},
                }
            })
        })
    }

    /// Handle a parsed directive
    pub async fn handle_directive(&self, directive: &Directive) -> Response {
        match self.dispatch(directive).await {
            Ok(response) => {
                debug!("Directive handled with {}", response.name());
                response
            }
            Err(err @ Error::Internal(_)) => {
                error!("Directive failed: {}", err);
                Response::error(Some(directive), &err)
            }
            Err(err) => {
                warn!("Directive failed with {}: {}", err.kind(), err);
                Response::error(Some(directive), &err)
            }
        }
    }

    async fn dispatch(&self, directive: &Directive) -> Result<Response> {
        let handler = self.handler(directive.namespace(), directive.name()).ok_or_else(|| {
            debug!("Unsupported directive {}.{}", directive.namespace(), directive.name());
            Error::invalid_directive("Unsupported directive")
        })?;

        let endpoint = if handler.is_endpoint_scoped() {
            let endpoint = directive
                .endpoint
                .as_ref()
                .ok_or_else(|| Error::invalid_directive("Missing directive endpoint"))?;
            let endpoint = ResolvedEndpoint::from_value(endpoint)?;

            // Endpoints discovered by the binding are handled by the binding
            if endpoint.is_binding() {
                binding::relay(directive, &self.context, Map::new()).await?;
                return Ok(Response::deferred(directive));
            }

            Some(endpoint.resolve()?)
        } else {
            None
        };

        match handler.handle(directive, endpoint.as_ref(), &self.context).await? {
            Outcome::Respond(response) => Ok(response),
            Outcome::Completed => {
                let endpoint = endpoint
                    .as_ref()
                    .ok_or_else(|| Error::internal("Completed directive without endpoint"))?;
                let properties = self.context.context_properties(endpoint).await;
                Ok(Response::command(directive).with_properties(properties))
            }
        }
    }
}

/*!
 * Directive handlers.
 *
 * Each handler serves one namespace. Endpoint scoped handlers receive the
 * endpoint resolved from the directive cookie; command handlers only send the
 * backend commands and let the dispatcher answer with the endpoint state.
 */
use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use habskill_core::utils::decamelize;
use habskill_devices::capability::CapabilityKind;
use habskill_devices::endpoint::ResolvedEndpoint;
use habskill_devices::property::{Property, PropertyKind};

use crate::context::HandlerContext;
use crate::directive::Directive;
use crate::error::{Error, Result};
use crate::response::Response;

pub mod alexa;
pub mod authorization;
pub mod brightness;
pub mod color;
pub mod discovery;
pub mod lock;
pub mod mode;
pub mod percentage;
pub mod playback;
pub mod power;
pub mod range;
pub mod speaker;
pub mod step_speaker;
pub mod thermostat;
pub mod toggle;

pub use alexa::AlexaHandler;
pub use authorization::AuthorizationHandler;
pub use brightness::BrightnessControllerHandler;
pub use color::ColorControllerHandler;
pub use discovery::DiscoveryHandler;
pub use lock::LockControllerHandler;
pub use mode::ModeControllerHandler;
pub use percentage::PercentageControllerHandler;
pub use playback::PlaybackControllerHandler;
pub use power::PowerControllerHandler;
pub use range::RangeControllerHandler;
pub use speaker::SpeakerHandler;
pub use step_speaker::StepSpeakerHandler;
pub use thermostat::ThermostatControllerHandler;
pub use toggle::ToggleControllerHandler;

/// Result of a handled directive
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The response to send back
    Respond(Response),
    /// Commands were sent, answer with the current endpoint state
    Completed,
}

/// Directive handler trait
#[async_trait]
pub trait DirectiveHandler: Send + Sync + Debug {
    /// Get the namespace served by the handler
    fn namespace(&self) -> &'static str;

    /// Get the directive names served by the handler
    fn names(&self) -> &'static [&'static str];

    /// Whether the directives target an endpoint
    fn is_endpoint_scoped(&self) -> bool {
        true
    }

    /// Check if the handler serves a directive
    fn supports(&self, namespace: &str, name: &str) -> bool {
        self.namespace() == namespace && self.names().contains(&name)
    }

    /// Handle a directive
    ///
    /// # Arguments
    ///
    /// * `directive` - The directive
    /// * `endpoint` - The resolved endpoint, for endpoint scoped handlers
    /// * `context` - The handler context
    async fn handle(
        &self,
        directive: &Directive,
        endpoint: Option<&ResolvedEndpoint>,
        context: &HandlerContext,
    ) -> Result<Outcome>;
}

/// Get the default handlers, one per supported namespace
pub fn default_handlers() -> Vec<Arc<dyn DirectiveHandler>> {
    vec![
        Arc::new(DiscoveryHandler::default()),
        Arc::new(AuthorizationHandler),
        Arc::new(AlexaHandler),
        Arc::new(PowerControllerHandler),
        Arc::new(BrightnessControllerHandler),
        Arc::new(ColorControllerHandler),
        Arc::new(PercentageControllerHandler),
        Arc::new(ThermostatControllerHandler),
        Arc::new(ModeControllerHandler),
        Arc::new(RangeControllerHandler),
        Arc::new(ToggleControllerHandler),
        Arc::new(LockControllerHandler),
        Arc::new(SpeakerHandler),
        Arc::new(StepSpeakerHandler),
        Arc::new(PlaybackControllerHandler),
    ]
}

/// Get the resolved endpoint of an endpoint scoped directive
pub(crate) fn require_endpoint(endpoint: Option<&ResolvedEndpoint>) -> Result<&ResolvedEndpoint> {
    endpoint.ok_or_else(|| Error::invalid_directive("Missing directive endpoint"))
}

/// Get the controllable property targeted by a directive
///
/// The directive instance, if any, selects the capability instance.
///
/// # Errors
///
/// Returns an invalid value error if the endpoint has no such property or the
/// property is not controllable
pub(crate) fn target_property<'a>(
    directive: &Directive,
    endpoint: &'a ResolvedEndpoint,
    capability: CapabilityKind,
    kind: PropertyKind,
) -> Result<&'a Property> {
    let property = endpoint
        .property(capability, kind, directive.instance())
        .ok_or_else(|| Error::invalid_value(format!("No {} property defined.", decamelize(kind.name(), " "))))?;

    if !property.is_controllable() {
        return Err(Error::invalid_value(format!(
            "The {} is not controllable.",
            decamelize(kind.name(), " ")
        )));
    }

    Ok(property)
}

/// Get a payload field of a directive
pub(crate) fn payload_field<'a>(directive: &'a Directive, name: &str) -> Result<&'a Value> {
    directive
        .payload_field(name)
        .ok_or_else(|| Error::invalid_directive(format!("Missing payload field {}", name)))
}

/// Get a numeric payload field of a directive
pub(crate) fn payload_number(directive: &Directive, name: &str) -> Result<f64> {
    payload_field(directive, name)?
        .as_f64()
        .ok_or_else(|| Error::invalid_value(format!("Invalid {} value", decamelize(name, " "))))
}

/// Read a numeric property state
pub(crate) async fn current_number(context: &HandlerContext, property: &Property) -> Result<f64> {
    let state = context.current_state(property).await?;
    state
        .as_f64()
        .ok_or_else(|| Error::internal(format!("Unexpected {} state {}", property.name(), state)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_handlers_are_unique() {
        let handlers = default_handlers();
        let namespaces: HashSet<&str> = handlers.iter().map(|handler| handler.namespace()).collect();
        assert_eq!(namespaces.len(), handlers.len());

        let discovery = handlers
            .iter()
            .find(|handler| handler.supports("Alexa.Discovery", "Discover"))
            .unwrap();
        assert!(!discovery.is_endpoint_scoped());
        assert!(!discovery.supports("Alexa.Discovery", "Foo"));
    }
}

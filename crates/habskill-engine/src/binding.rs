/*!
 * openHAB Alexa binding relay.
 *
 * Recent openHAB servers host an Alexa binding which handles directives for
 * the endpoints it discovered itself. Those directives are forwarded as is
 * with the URLs the binding needs to answer asynchronously.
 */
use std::cmp::Ordering;

use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use habskill_core::utils::compare_version;

use crate::context::HandlerContext;
use crate::directive::Directive;
use crate::error::{Error, Result};

/// Minimum server version hosting the binding
pub const MINIMUM_VERSION: &str = "4.2.0";

/// Status code of an accepted directive
const ACCEPTED: u16 = 202;

/// Check if a server version requires the binding relay
pub fn is_required(version: Option<&str>) -> bool {
    version
        .and_then(|version| compare_version(version, MINIMUM_VERSION).ok())
        .map_or(false, |ordering| ordering != Ordering::Less)
}

/// Build the relay request body
pub fn relay_body(directive: &Directive, context: &HandlerContext, extra: Map<String, Value>) -> Result<Value> {
    let config = context.config().get();

    let mut relay_context = extra;
    relay_context.insert(
        "endpoints".to_string(),
        json!({
            "event": config.event_gateway_url(),
            "token": config.token_url().unwrap_or_default(),
        }),
    );

    Ok(json!({
        "directive": directive.to_json()?,
        "context": relay_context,
    }))
}

/// Forward a directive to the binding
///
/// # Arguments
///
/// * `directive` - The directive to forward
/// * `context` - The handler context
/// * `extra` - Additional relay context entries (e.g. credentials)
///
/// # Errors
///
/// Returns a bridge unreachable error if the binding cannot be reached or
/// does not accept the directive
pub async fn relay(directive: &Directive, context: &HandlerContext, extra: Map<String, Value>) -> Result<()> {
    let body = relay_body(directive, context, extra)?;

    match context.backend().send_alexa_directive(&body).await {
        Ok(ACCEPTED) => {
            debug!("Directive {}.{} relayed to binding", directive.namespace(), directive.name());
            Ok(())
        }
        Ok(status) => {
            warn!("Binding returned unexpected status code {}", status);
            Err(Error::bridge_unreachable("Unable to communicate with binding"))
        }
        Err(e) => {
            warn!("Failed to relay directive to binding: {}", e);
            Err(Error::bridge_unreachable("Unable to communicate with binding"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_required() {
        assert!(is_required(Some("4.2.0")));
        assert!(is_required(Some("4.3.1")));
        assert!(is_required(Some("5.0.0-SNAPSHOT")));
        assert!(!is_required(Some("4.1.3")));
        assert!(!is_required(Some("3.4.5")));
        assert!(!is_required(Some("unknown")));
        assert!(!is_required(None));
    }
}

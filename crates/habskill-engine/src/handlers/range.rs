/*!
 * `Alexa.RangeController` directives.
 */
use async_trait::async_trait;
use serde_json::json;

use habskill_devices::capability::CapabilityKind;
use habskill_devices::endpoint::ResolvedEndpoint;
use habskill_devices::property::PropertyKind;

use super::{
    current_number, payload_field, payload_number, require_endpoint, target_property, DirectiveHandler, Outcome,
};
use crate::context::HandlerContext;
use crate::directive::Directive;
use crate::error::{Error, Result};

/// Range controller handler, targeting the directive instance
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeControllerHandler;

#[async_trait]
impl DirectiveHandler for RangeControllerHandler {
    fn namespace(&self) -> &'static str {
        "Alexa.RangeController"
    }

    fn names(&self) -> &'static [&'static str] {
        &["SetRangeValue", "AdjustRangeValue"]
    }

    async fn handle(
        &self,
        directive: &Directive,
        endpoint: Option<&ResolvedEndpoint>,
        context: &HandlerContext,
    ) -> Result<Outcome> {
        let endpoint = require_endpoint(endpoint)?;
        let property = target_property(
            directive,
            endpoint,
            CapabilityKind::RangeController,
            PropertyKind::RangeValue,
        )?;

        if directive.name() == "SetRangeValue" {
            context.send_command(property, payload_field(directive, "rangeValue")?).await?;
            return Ok(Outcome::Completed);
        }

        let range = property
            .supported_range()
            .ok_or_else(|| Error::internal("Range value property without supported range"))?;

        let mut delta = payload_number(directive, "rangeValueDelta")?;
        if range.reversed {
            delta = -delta;
        }

        let value = current_number(context, property).await?;
        context.send_command(property, &json!(range.clamp(value + delta))).await?;

        Ok(Outcome::Completed)
    }
}

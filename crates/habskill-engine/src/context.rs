/*!
 * Directive handling context.
 *
 * The context gives handlers access to the external collaborators and the
 * configuration, and implements the state reads and command writes shared by
 * all handlers.
 */
use std::sync::Arc;

use futures::future::join_all;
use serde_json::Value;
use tracing::{debug, info, warn};

use habskill_core::config::SharedConfig;
use habskill_core::types::ServerSettings;
use habskill_core::utils::decamelize;
use habskill_devices::capability::Capability;
use habskill_devices::endpoint::ResolvedEndpoint;
use habskill_devices::property::Property;

use crate::backend::{Backend, CredentialStore, TokenExchange};
use crate::error::{Error, Result};
use crate::response::ContextProperty;

/// Context shared by the directive handlers
#[derive(Debug, Clone)]
pub struct HandlerContext {
    /// The openHAB server client
    backend: Arc<dyn Backend>,
    /// The credential store
    credentials: Arc<dyn CredentialStore>,
    /// The token exchange service
    tokens: Arc<dyn TokenExchange>,
    /// The configuration
    config: SharedConfig,
}

impl HandlerContext {
    /// Create a new handler context
    pub fn new(
        backend: Arc<dyn Backend>,
        credentials: Arc<dyn CredentialStore>,
        tokens: Arc<dyn TokenExchange>,
        config: SharedConfig,
    ) -> Self {
        Self {
            backend,
            credentials,
            tokens,
            config,
        }
    }

    /// Get the openHAB server client
    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    /// Get the credential store
    pub fn credentials(&self) -> &dyn CredentialStore {
        self.credentials.as_ref()
    }

    /// Get the token exchange service
    pub fn tokens(&self) -> &dyn TokenExchange {
        self.tokens.as_ref()
    }

    /// Get the configuration
    pub fn config(&self) -> &SharedConfig {
        &self.config
    }

    /// Fetch the server settings
    pub async fn server_settings(&self) -> Result<ServerSettings> {
        self.backend
            .get_server_settings()
            .await
            .map_err(|e| Error::bridge_unreachable(format!("Unable to get server settings: {}", e)))
    }

    /// Read the current value of a property
    ///
    /// # Returns
    ///
    /// The value, or `None` when the item is missing, undefined or cannot be read
    pub async fn read_state(&self, property: &Property) -> Option<Value> {
        let Some(name) = property.item_name() else {
            return property.get_state(None);
        };

        match self.backend.get_item(name).await {
            Ok(Some(item)) => property.get_state(item.state.as_deref()),
            Ok(None) => {
                debug!("Item {} not found", name);
                None
            }
            Err(e) => {
                warn!("Failed to read item {}: {}", name, e);
                None
            }
        }
    }

    /// Read the current value of a property needed to compute a command
    ///
    /// # Errors
    ///
    /// Returns an endpoint unreachable error when the value cannot be read
    pub async fn current_state(&self, property: &Property) -> Result<Value> {
        self.read_state(property).await.ok_or_else(|| {
            Error::endpoint_unreachable(format!("Unable to get {} state", decamelize(property.name(), " ")))
        })
    }

    /// Read all reportable properties of an endpoint concurrently
    pub async fn read_properties<'a>(
        &self,
        endpoint: &'a ResolvedEndpoint,
    ) -> Vec<(&'a Capability, &'a Property, Option<Value>)> {
        let reportable = endpoint.reportable_properties();

        let values = join_all(
            reportable
                .iter()
                .map(|(_, property)| self.read_state(*property)),
        )
        .await;

        reportable
            .into_iter()
            .zip(values)
            .map(|((capability, property), value)| (capability, property, value))
            .collect()
    }

    /// Read the context properties of an endpoint
    ///
    /// Properties without a value are left out.
    pub async fn context_properties(&self, endpoint: &ResolvedEndpoint) -> Vec<ContextProperty> {
        self.read_properties(endpoint)
            .await
            .into_iter()
            .filter_map(|(capability, property, value)| {
                value.map(|value| ContextProperty::new(capability, property, value))
            })
            .collect()
    }

    /// Convert a directive value and send it as a command to the property item
    ///
    /// # Errors
    ///
    /// Returns an invalid value error if the value cannot be converted, or an
    /// endpoint unreachable error if the command cannot be delivered
    pub async fn send_command(&self, property: &Property, value: &Value) -> Result<()> {
        let command = property.get_command(value)?;
        self.send_raw_command(property, &command).await
    }

    /// Send a backend command to the property item
    pub async fn send_raw_command(&self, property: &Property, command: &str) -> Result<()> {
        let name = property
            .item_name()
            .ok_or_else(|| Error::invalid_value(format!("The {} has no item", decamelize(property.name(), " "))))?;

        info!("Sending command {} to item {}", command, name);
        self.backend
            .send_command(name, command)
            .await
            .map_err(|e| Error::endpoint_unreachable(format!("Unable to send command to {}: {}", name, e)))
    }
}

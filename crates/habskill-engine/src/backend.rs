/*!
 * External collaborators.
 *
 * The engine talks to the openHAB server, the credential store and the
 * Login with Amazon token service through these traits. Implementations live
 * outside the engine; failures are opaque and wrapped by the handler that
 * issued the call.
 */
use std::collections::HashMap;
use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;

use habskill_core::types::{Item, ServerSettings};

/// openHAB server client
#[async_trait]
pub trait Backend: Send + Sync + Debug {
    /// Fetch all items with their metadata
    async fn fetch_all_items(&self) -> anyhow::Result<Vec<Item>>;

    /// Fetch one item, `None` if it does not exist
    async fn get_item(&self, name: &str) -> anyhow::Result<Option<Item>>;

    /// Send a command to an item
    async fn send_command(&self, name: &str, value: &str) -> anyhow::Result<()>;

    /// Post a state update to an item
    async fn post_update(&self, name: &str, value: &str) -> anyhow::Result<()>;

    /// Fetch the server settings
    async fn get_server_settings(&self) -> anyhow::Result<ServerSettings>;

    /// Send a directive to the openHAB Alexa binding
    ///
    /// # Returns
    ///
    /// The HTTP status code of the reply
    async fn send_alexa_directive(&self, body: &Value) -> anyhow::Result<u16>;
}

/// User settings persisted in the credential store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    /// The Login with Amazon refresh token
    pub refresh_token: String,
}

/// Credential store keyed by user id
#[async_trait]
pub trait CredentialStore: Send + Sync + Debug {
    /// Get the settings of a user
    async fn get(&self, user_id: &str) -> anyhow::Result<Option<UserSettings>>;

    /// Save the settings of a user
    async fn save(&self, user_id: &str, settings: UserSettings) -> anyhow::Result<()>;
}

/// Login with Amazon credentials
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    /// The access token
    pub access_token: String,
    /// The refresh token
    pub refresh_token: String,
    /// The token type
    pub token_type: String,
    /// The access token lifetime in seconds
    pub expires_in: u64,
}

/// Login with Amazon authorization code exchange
#[async_trait]
pub trait TokenExchange: Send + Sync + Debug {
    /// Exchange an authorization code for credentials
    async fn get_access_token(&self, code: &str) -> anyhow::Result<Credentials>;
}

/// An in-memory credential store
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    settings: RwLock<HashMap<String, UserSettings>>,
}

impl MemoryCredentialStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored users
    pub async fn len(&self) -> usize {
        self.settings.read().await.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.settings.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self, user_id: &str) -> anyhow::Result<Option<UserSettings>> {
        Ok(self.settings.read().await.get(user_id).cloned())
    }

    async fn save(&self, user_id: &str, settings: UserSettings) -> anyhow::Result<()> {
        self.settings.write().await.insert(user_id.to_string(), settings);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_credential_store() {
        tokio_test::block_on(async {
            let store = MemoryCredentialStore::new();
            assert!(store.is_empty().await);
            assert_eq!(store.get("user").await.unwrap(), None);

            let settings = UserSettings {
                refresh_token: "refresh".to_string(),
            };
            store.save("user", settings.clone()).await.unwrap();
            assert_eq!(store.len().await, 1);
            assert_eq!(store.get("user").await.unwrap(), Some(settings));
        });
    }

    #[test]
    fn test_credentials_deserialize() {
        let credentials: Credentials = serde_json::from_value(serde_json::json!({
            "access_token": "foo",
            "refresh_token": "bar",
            "token_type": "bearer",
            "expires_in": 42
        }))
        .unwrap();
        assert_eq!(credentials.refresh_token, "bar");
        assert_eq!(credentials.expires_in, 42);
    }
}

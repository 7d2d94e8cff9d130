/*!
 * Configuration management for habskill.
 *
 * This module loads the skill settings (Alexa and Login with Amazon API
 * endpoints, openHAB connection settings, skill credentials) from defaults,
 * an optional file and environment variables.
 */
use std::path::Path;
use std::sync::Arc;

use config::{Config as ConfigLib, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Skill configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillConfig {
    /// Alexa API configuration
    #[serde(default)]
    pub alexa: AlexaConfig,

    /// Login with Amazon API configuration
    #[serde(default)]
    pub lwa: LwaConfig,

    /// openHAB server configuration
    #[serde(default)]
    pub openhab: OpenHabConfig,

    /// Skill deployment configuration
    #[serde(default)]
    pub skill: SkillSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Alexa API configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlexaConfig {
    /// Alexa API endpoint
    #[serde(default = "default_alexa_api_url")]
    pub api_url: String,
}

/// Login with Amazon API configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LwaConfig {
    /// Login with Amazon API endpoint
    #[serde(default = "default_lwa_api_url")]
    pub api_url: String,
}

/// openHAB server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenHabConfig {
    /// Base URL of the openHAB server
    #[serde(default = "default_openhab_base_url")]
    pub base_url: String,

    /// Basic auth username, OAuth2 tokens are used when unset
    #[serde(default)]
    pub user: Option<String>,

    /// Basic auth password
    #[serde(default)]
    pub pass: Option<String>,

    /// SSL client certificate file path
    #[serde(default = "default_cert_file")]
    pub cert_file: String,

    /// SSL client certificate passphrase
    #[serde(default)]
    pub cert_pass: Option<String>,
}

/// Skill deployment configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillSettings {
    /// Skill API endpoint
    #[serde(default)]
    pub api_url: Option<String>,

    /// Skill client id
    #[serde(default)]
    pub client_id: Option<String>,

    /// Skill client secret
    #[serde(default)]
    pub client_secret: Option<String>,

    /// Credential table name
    #[serde(default = "default_table_name")]
    pub table_name: String,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for AlexaConfig {
    fn default() -> Self {
        Self {
            api_url: default_alexa_api_url(),
        }
    }
}

impl Default for LwaConfig {
    fn default() -> Self {
        Self {
            api_url: default_lwa_api_url(),
        }
    }
}

impl Default for OpenHabConfig {
    fn default() -> Self {
        Self {
            base_url: default_openhab_base_url(),
            user: None,
            pass: None,
            cert_file: default_cert_file(),
            cert_pass: None,
        }
    }
}

impl Default for SkillSettings {
    fn default() -> Self {
        Self {
            api_url: None,
            client_id: None,
            client_secret: None,
            table_name: default_table_name(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_alexa_api_url() -> String {
    "https://api.amazonalexa.com".to_string()
}

fn default_lwa_api_url() -> String {
    "https://api.amazon.com".to_string()
}

fn default_openhab_base_url() -> String {
    "https://myopenhab.org".to_string()
}

fn default_cert_file() -> String {
    "ssl/client.pfx".to_string()
}

fn default_table_name() -> String {
    "AlexaOpenHABSkillSettings".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl SkillConfig {
    /// Parse a configuration from a TOML document, missing keys take their defaults
    pub fn from_toml(document: &str) -> Result<Self> {
        toml::from_str(document).map_err(|e| Error::config(format!("Invalid TOML configuration: {}", e)))
    }

    /// Alexa event gateway URL
    pub fn event_gateway_url(&self) -> String {
        format!("{}/v3/events", self.alexa.api_url.trim_end_matches('/'))
    }

    /// Skill token endpoint URL, if the skill API URL is configured
    pub fn token_url(&self) -> Option<String> {
        self.skill
            .api_url
            .as_ref()
            .map(|url| format!("{}/auth/token", url.trim_end_matches('/')))
    }
}

/// A builder for creating a configuration
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config_file: Option<String>,
    environment_prefix: Option<String>,
    override_with: Option<SkillConfig>,
}

impl ConfigBuilder {
    /// Create a new ConfigBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the config file path
    pub fn with_config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_string_lossy().to_string());
        self
    }

    /// Set the environment variable prefix for configuration
    pub fn with_environment_prefix<S: AsRef<str>>(mut self, prefix: S) -> Self {
        self.environment_prefix = Some(prefix.as_ref().to_string());
        self
    }

    /// Override with an existing config
    pub fn override_with(mut self, config: SkillConfig) -> Self {
        self.override_with = Some(config);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<SkillConfig> {
        if let Some(config) = self.override_with {
            return Ok(config);
        }

        let mut config_builder = ConfigLib::builder();

        let default_config = SkillConfig::default();
        config_builder = config_builder.add_source(
            ConfigLib::try_from(&default_config)
                .map_err(|e| Error::config(format!("Failed to create default config: {}", e)))?,
        );

        if let Some(config_file) = self.config_file {
            let path = Path::new(&config_file);
            if path.exists() {
                debug!("Loading configuration from {}", config_file);
                config_builder = config_builder.add_source(File::with_name(&config_file));
            } else {
                debug!("Configuration file {} does not exist, using defaults", config_file);
            }
        }

        if let Some(prefix) = self.environment_prefix {
            debug!("Loading configuration from environment variables with prefix {}", prefix);
            config_builder = config_builder.add_source(
                Environment::with_prefix(&prefix)
                    .separator("__")
                    .try_parsing(true),
            );
        }

        let config_lib = config_builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build configuration: {}", e)))?;

        let config: SkillConfig = config_lib
            .try_deserialize()
            .map_err(|e| Error::config(format!("Failed to deserialize configuration: {}", e)))?;

        info!("Configuration loaded successfully");
        Ok(config)
    }
}

/// A thread-safe reference to a configuration
#[derive(Debug, Clone, Default)]
pub struct SharedConfig(Arc<SkillConfig>);

impl SharedConfig {
    /// Create a new SharedConfig
    pub fn new(config: SkillConfig) -> Self {
        Self(Arc::new(config))
    }

    /// Get a reference to the config
    pub fn get(&self) -> &SkillConfig {
        &self.0
    }
}

impl From<SkillConfig> for SharedConfig {
    fn from(config: SkillConfig) -> Self {
        Self::new(config)
    }
}

impl AsRef<SkillConfig> for SharedConfig {
    fn as_ref(&self) -> &SkillConfig {
        self.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = SkillConfig::default();
        assert_eq!(config.alexa.api_url, "https://api.amazonalexa.com");
        assert_eq!(config.lwa.api_url, "https://api.amazon.com");
        assert_eq!(config.openhab.base_url, "https://myopenhab.org");
        assert_eq!(config.skill.table_name, "AlexaOpenHABSkillSettings");
        assert_eq!(config.logging.level, "info");
        assert!(config.skill.api_url.is_none());
    }

    #[test]
    fn test_config_builder_defaults() {
        let config = ConfigBuilder::new().build().unwrap();
        assert_eq!(config, SkillConfig::default());
    }

    #[test]
    fn test_config_builder_with_file() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("habskill.toml");

        {
            let mut file = File::create(&file_path)?;
            file.write_all(
                br#"
                [alexa]
                api_url = "https://api.eu.amazonalexa.com"

                [skill]
                api_url = "https://skill.example.com/"
                client_id = "client"
            "#,
            )?;
        }

        let config = ConfigBuilder::new().with_config_file(file_path).build()?;

        assert_eq!(config.alexa.api_url, "https://api.eu.amazonalexa.com");
        assert_eq!(config.skill.client_id.as_deref(), Some("client"));
        assert_eq!(config.lwa.api_url, "https://api.amazon.com");
        assert_eq!(config.event_gateway_url(), "https://api.eu.amazonalexa.com/v3/events");
        assert_eq!(config.token_url().as_deref(), Some("https://skill.example.com/auth/token"));

        Ok(())
    }

    #[test]
    fn test_config_builder_with_env() -> Result<()> {
        env::set_var("HABSKILL__LWA__API_URL", "https://lwa.example.com");
        env::set_var("HABSKILL__LOGGING__LEVEL", "trace");

        let config = ConfigBuilder::new().with_environment_prefix("habskill").build()?;

        assert_eq!(config.lwa.api_url, "https://lwa.example.com");
        assert_eq!(config.logging.level, "trace");

        env::remove_var("HABSKILL__LWA__API_URL");
        env::remove_var("HABSKILL__LOGGING__LEVEL");

        Ok(())
    }

    #[test]
    fn test_config_from_toml() -> Result<()> {
        let config = SkillConfig::from_toml("[openhab]\nbase_url = \"http://localhost:8080\"\nuser = \"admin\"")?;
        assert_eq!(config.openhab.base_url, "http://localhost:8080");
        assert_eq!(config.openhab.user.as_deref(), Some("admin"));
        assert_eq!(config.openhab.cert_file, "ssl/client.pfx");
        assert!(config.token_url().is_none());

        assert!(SkillConfig::from_toml("[openhab").is_err());
        Ok(())
    }

    #[test]
    fn test_shared_config() {
        let shared = SharedConfig::new(SkillConfig::default());
        let shared2 = shared.clone();
        assert_eq!(shared2.get().alexa.api_url, "https://api.amazonalexa.com");
    }
}

//! Application configuration.
//!
//! Loaded via the `config` crate from `HELPDESK__*` environment variables,
//! e.g. `HELPDESK__USER_NAME` or `HELPDESK__CHAT__CONNECT_DELAY_MS`.
//!
//! See [`ChatConfig`] for the session settings.

use helpdesk_conversation::ChatConfig;
use serde::Deserialize;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "HELPDESK";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Display name override; otherwise taken from the login environment.
    #[serde(default)]
    pub user_name: Option<String>,

    /// Chat session settings.
    #[serde(default)]
    pub chat: ChatConfig,
}

impl AppConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_source(environment())
    }

    fn from_source(source: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

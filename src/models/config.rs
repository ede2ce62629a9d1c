//! Configuration model loaded from external sources.

use std::env;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::domain::auth::Credential;

fn default_timeout() -> u64 {
    30
}

#[derive(Clone, Debug, Deserialize)]
/// Settings for talking to the remote vehicle collection.
pub struct ConsoleConfig {
    /// Root of the API, e.g. `http://127.0.0.1:8000/api`.
    pub api_base_url: String,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// Token obtained from the login flow, usually supplied as `APP_TOKEN`.
    #[serde(default)]
    pub token: Option<String>,
}

impl ConsoleConfig {
    /// Loads `config/default.yaml`, the optional `config/{APP_ENV}.yaml`
    /// (`local` when unset) and `APP_*` environment variables, in that order.
    pub fn load() -> Result<Self, ConfigError> {
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

        Config::builder()
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{app_env}")).required(false))
            .add_source(Environment::with_prefix("APP"))
            .build()?
            .try_deserialize()
    }

    /// Credential built from the configured token, if any.
    pub fn credential(&self) -> Option<Credential> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(Credential::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_token(token: Option<&str>) -> ConsoleConfig {
        ConsoleConfig {
            api_base_url: "http://localhost/api".to_string(),
            request_timeout_secs: default_timeout(),
            token: token.map(str::to_string),
        }
    }

    #[test]
    fn blank_token_yields_no_credential() {
        assert!(config_with_token(None).credential().is_none());
        assert!(config_with_token(Some("  ")).credential().is_none());
        assert_eq!(
            config_with_token(Some("abc")).credential(),
            Some(Credential::new("abc"))
        );
    }

    #[test]
    fn deserializes_with_default_timeout() {
        let config = Config::builder()
            .set_override("api_base_url", "http://localhost/api")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize::<ConsoleConfig>()
            .unwrap();
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.token.is_none());
    }
}

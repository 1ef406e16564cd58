pub mod api;
pub mod clickup;
pub mod error;
pub mod logging;
pub mod relay;
pub mod task_ref;
pub mod webhook;

use axum::{Router, routing};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clickup::{ClickUpClient, ClickUpConfig, DEFAULT_API_URL};
use error::{RelayError, Result};

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
pub const API_TOKEN_VAR: &str = "CLICKUP_API_TOKEN";

/// Settings read from the optional TOML file; environment variables win.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RelayConfig {
    pub bind_address: String,
    pub clickup_api_url: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            clickup_api_url: DEFAULT_API_URL.to_string(),
            log_dir: None,
        }
    }
}

impl RelayConfig {
    /// Parses a TOML config document.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Reads the config file at `path`. A missing file is only an error when
    /// `required` is set, otherwise defaults are used.
    pub fn load(path: &Path, required: bool) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content).map_err(|e| {
                RelayError::ConfigError(format!(
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => Ok(Self::default()),
            Err(e) => Err(RelayError::ConfigError(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))),
        }
    }

    /// Applies `BIND_ADDRESS`, `CLICKUP_API_URL` and `RELAY_LOG_DIR` overrides.
    pub fn with_env_overrides<F>(mut self, var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = var("BIND_ADDRESS") {
            self.bind_address = addr;
        }
        if let Some(url) = var("CLICKUP_API_URL") {
            self.clickup_api_url = url;
        }
        if let Some(dir) = var("RELAY_LOG_DIR") {
            self.log_dir = Some(PathBuf::from(dir));
        }
        self
    }
}

/// Reads the ClickUp credential; an unset or blank value is fatal.
pub fn api_token_from<F>(var: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    var(API_TOKEN_VAR)
        .filter(|token| !token.trim().is_empty())
        .ok_or(RelayError::MissingCredential(API_TOKEN_VAR))
}

pub struct AppState {
    pub clickup: ClickUpClient,
    pub config: RelayConfig,
    pub start_time: Instant,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: RelayConfig, api_key: String) -> Result<Self> {
        let clickup = ClickUpClient::new(ClickUpConfig {
            api_key,
            base_url: config.clickup_api_url.clone(),
        })
        .map_err(|e| RelayError::ConfigError(format!("Failed to build ClickUp client: {}", e)))?;

        Ok(Self {
            clickup,
            config,
            start_time: Instant::now(),
            started_at: Utc::now(),
        })
    }
}

pub type SharedState = Arc<AppState>;

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/", routing::get(api::root))
        .route("/status", routing::get(api::status))
        .route("/github-webhook", routing::post(api::handle_webhook))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn empty_file_gives_defaults() {
        let config = RelayConfig::from_toml("").unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:3000");
        assert_eq!(config.clickup_api_url, "https://api.clickup.com/api/v2");
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn file_values_are_read() {
        let config = RelayConfig::from_toml(
            r#"
            bind_address = "127.0.0.1:8080"
            log_dir = "/var/log/relay"
            "#,
        )
        .unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:8080");
        assert_eq!(config.clickup_api_url, DEFAULT_API_URL);
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/relay")));
    }

    #[test]
    fn invalid_toml_is_rejected() {
        assert!(matches!(
            RelayConfig::from_toml("bind_address = 3000"),
            Err(RelayError::TomlParseError(_))
        ));
    }

    #[test]
    fn missing_default_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = RelayConfig::load(&dir.path().join("relay_config.toml"), false).unwrap();
        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(config.clickup_api_url, DEFAULT_API_URL);
    }

    #[test]
    fn missing_named_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = RelayConfig::load(&dir.path().join("absent.toml"), true);
        assert!(matches!(result, Err(RelayError::ConfigError(_))));
    }

    #[test]
    fn unparsable_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relay_config.toml");
        std::fs::write(&path, "bind_address = [").unwrap();

        match RelayConfig::load(&path, false) {
            Err(RelayError::ConfigError(msg)) => {
                assert!(msg.starts_with("Failed to parse config file"));
            }
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn existing_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relay_config.toml");
        std::fs::write(&path, "clickup_api_url = \"http://localhost:4000/api/v2\"\n").unwrap();

        let config = RelayConfig::load(&path, true).unwrap();
        assert_eq!(config.clickup_api_url, "http://localhost:4000/api/v2");
        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
    }

    #[test]
    fn env_overrides_file() {
        let config = RelayConfig::default().with_env_overrides(env(&[
            ("BIND_ADDRESS", "127.0.0.1:9000"),
            ("CLICKUP_API_URL", "http://localhost:1234"),
        ]));
        assert_eq!(config.bind_address, "127.0.0.1:9000");
        assert_eq!(config.clickup_api_url, "http://localhost:1234");
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn missing_or_blank_token_is_an_error() {
        assert!(matches!(
            api_token_from(env(&[])),
            Err(RelayError::MissingCredential("CLICKUP_API_TOKEN"))
        ));
        assert!(api_token_from(env(&[("CLICKUP_API_TOKEN", "  ")])).is_err());
        assert_eq!(
            api_token_from(env(&[("CLICKUP_API_TOKEN", "pk_123")])).unwrap(),
            "pk_123"
        );
    }
}

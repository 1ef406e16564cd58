use std::io;

/// Custom error type for startup and configuration of the relay
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Missing credential: environment variable {0} is not set")]
    MissingCredential(&'static str),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParseError(#[from] toml::de::Error),
}

/// Error returned by a single call against the ClickUp API
#[derive(Debug, thiserror::Error)]
pub enum ClickUpError {
    #[error("request to ClickUp failed")]
    Transport(#[from] reqwest::Error),

    #[error("ClickUp responded with {status}")]
    Api {
        status: reqwest::StatusCode,
        body: Option<serde_json::Value>,
    },
}

impl ClickUpError {
    /// Structured body ClickUp sent back with an error status, if any
    pub fn response_body(&self) -> Option<&serde_json::Value> {
        match self {
            ClickUpError::Api { body, .. } => body.as_ref(),
            ClickUpError::Transport(_) => None,
        }
    }
}

/// Helper type for Results that use RelayError
pub type Result<T> = std::result::Result<T, RelayError>;

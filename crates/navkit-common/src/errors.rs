use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// User-visible navigation failures.
///
/// None of these are fatal to the process. Validation and blocklist
/// failures are produced synchronously by the session controller; the
/// others arrive from the renderer through a `Failed` lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum WebViewError {
    #[error("The URL is invalid")]
    InvalidUrl,

    #[error("Network error: {0}")]
    Network(String),

    #[error("SSL error: {0}")]
    Tls(String),

    #[error("Content was blocked")]
    ContentBlocked,

    #[error("Request timed out")]
    Timeout,

    #[error("Unknown error: {0}")]
    Unknown(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum NavkitError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    WebView(#[from] WebViewError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("persistence error: {0}")]
    Persistence(String),

    #[error("{0}")]
    Other(String),
}

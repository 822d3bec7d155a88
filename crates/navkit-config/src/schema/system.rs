//! System configuration types: scripting and logging.

use serde::{Deserialize, Serialize};

/// JavaScript evaluation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptingConfig {
    /// Evaluation timeout in milliseconds (valid range: 100-120000).
    pub evaluation_timeout_ms: u32,
}

impl Default for ScriptingConfig {
    fn default() -> Self {
        Self {
            evaluation_timeout_ms: 5000,
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// The `tracing` filter directive for this level.
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "navkit=trace",
            LogLevel::Debug => "navkit=debug",
            LogLevel::Info => "navkit=info",
            LogLevel::Warn => "navkit=warn",
            LogLevel::Error => "navkit=error",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}

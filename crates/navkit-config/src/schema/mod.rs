//! Configuration schema types for navkit.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod browser;
mod system;
mod webview;

pub use browser::*;
pub use system::*;
pub use webview::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct NavkitConfig {
    pub browser: BrowserConfig,
    pub webview: WebViewSettings,
    pub scripting: ScriptingConfig,
    pub logging: LoggingConfig,
}

// =============================================================================
// Tests
// =============================================================================

//! navkit configuration system.
//!
//! Provides TOML-based configuration with full validation. All config
//! sections use sensible defaults so partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use navkit_config::{load_config, config_to_json};
//!
//! let config = load_config(None).expect("failed to load config");
//! let json = config_to_json(&config);
//! println!("{json}");
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    BrowserConfig, LogLevel, MediaType, NavkitConfig, ScriptingConfig, WebViewSettings,
    CONFIG_SCHEMA_VERSION,
};

use std::path::Path;

use navkit_common::ConfigError;

/// Load config from an explicit path, or from the platform default path.
///
/// An explicit path must exist; the default path is created with a
/// documented template on first use. Invalid values are repaired by the
/// loader, so the returned config always passes `validation::validate`.
pub fn load_config(path: Option<&Path>) -> Result<NavkitConfig, ConfigError> {
    match path {
        Some(path) => toml_loader::load_from_path(path),
        None => toml_loader::load_default(),
    }
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &NavkitConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let json = config_to_json(&NavkitConfig::default());
        assert!(json.contains("\"browser\""));
        assert!(json.contains("\"webview\""));
        assert!(json.contains("\"scripting\""));
        assert!(json.contains("\"logging\""));
        assert!(json.contains("\"google\""));
    }

    #[test]
    fn config_schema_version_is_1() {
        assert_eq!(CONFIG_SCHEMA_VERSION, 1);
    }

    #[test]
    fn default_config_round_trips_through_json() {
        let json = config_to_json(&NavkitConfig::default());
        let parsed: NavkitConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.browser.home_page, "https://www.apple.com");
        assert_eq!(parsed.scripting.evaluation_timeout_ms, 5000);
    }

    #[test]
    fn load_config_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("navkit.toml");
        std::fs::write(&path, "[browser]\nsearch_engine = \"ecosia\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(
            config.browser.search_engine,
            navkit_common::SearchEngine::Ecosia
        );
    }

    #[test]
    fn load_config_returns_repaired_file_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("navkit.toml");
        std::fs::write(
            &path,
            "[browser]\nblocked_domains = [\"ads.example.com\", \"tracker.net\"]\n\n[scripting]\nevaluation_timeout_ms = 50\n",
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.browser.blocked_domains.len(), 2);
        assert_eq!(config.scripting.evaluation_timeout_ms, 100);
    }

    #[test]
    fn load_config_missing_explicit_path_errors() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }
}

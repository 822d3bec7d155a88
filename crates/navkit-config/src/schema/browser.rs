//! Browser session configuration: search engine, home page, blocklist.

use navkit_common::SearchEngine;
use serde::{Deserialize, Serialize};

/// Session-level browsing behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Engine used when address bar input is not a URL.
    pub search_engine: SearchEngine,
    /// Page opened by a fresh session.
    pub home_page: String,
    /// Host substrings that may never be navigated to.
    ///
    /// Matching is case-insensitive substring containment on the host, so
    /// `ads.example.com` also blocks `sub.ads.example.com`.
    pub blocked_domains: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            search_engine: SearchEngine::Google,
            home_page: "https://www.apple.com".into(),
            blocked_domains: Vec::new(),
        }
    }
}

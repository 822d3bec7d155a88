//! Navigation gating: URL validation and the domain blocklist.

use navkit_common::WebViewError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

/// Outcome of a policy check for a pending navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationDecision {
    Allow,
    Cancel,
}

/// Parse `raw` as a URL, retrying with an `https://` prefix.
pub fn validate_url(raw: &str) -> Result<Url, WebViewError> {
    if let Ok(url) = Url::parse(raw) {
        return Ok(url);
    }

    Url::parse(&format!("https://{raw}")).map_err(|_| WebViewError::InvalidUrl)
}

/// Check a URL against blocked host substrings.
///
/// A host is blocked when any entry appears anywhere inside it, compared
/// case-insensitively. This is containment, not suffix matching:
/// `blocked.com` also matches `notblocked.com.example`. Blank entries are
/// skipped. URLs without a host are always allowed.
pub fn should_allow_navigation<I, S>(url: &Url, blocked_domains: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let Some(host) = url.host_str() else {
        return true;
    };
    let host = host.to_lowercase();

    !blocked_domains.into_iter().any(|domain| {
        let domain = domain.as_ref().trim();
        !domain.is_empty() && host.contains(&domain.to_lowercase())
    })
}

/// The raw host component, without normalization.
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(str::to_string)
}

/// A blocklist bound to the decision functions above.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationPolicy {
    blocked_domains: Vec<String>,
}

impl NavigationPolicy {
    pub fn new(blocked_domains: Vec<String>) -> Self {
        Self { blocked_domains }
    }

    pub fn blocked_domains(&self) -> &[String] {
        &self.blocked_domains
    }

    pub fn allows(&self, url: &Url) -> bool {
        should_allow_navigation(url, &self.blocked_domains)
    }

    pub fn decide(&self, url: &Url) -> NavigationDecision {
        if self.allows(url) {
            debug!(url = %url, "navigation allowed");
            NavigationDecision::Allow
        } else {
            warn!(url = %url, "navigation blocked: host matches blocklist");
            NavigationDecision::Cancel
        }
    }
}

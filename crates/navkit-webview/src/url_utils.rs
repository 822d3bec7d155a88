//! Pure URL helpers: scheme classification, host display, address bar input.

use navkit_common::SearchEngine;
use url::Url;

/// True iff the scheme is `https` (case-insensitive).
pub fn is_secure(url: &Url) -> bool {
    url.scheme().eq_ignore_ascii_case("https")
}

/// True iff the scheme is `http` or `https` (case-insensitive).
pub fn is_web_url(url: &Url) -> bool {
    let scheme = url.scheme();
    scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")
}

/// Lower-cased host with a leading `www.` removed.
pub fn display_host(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    match host.strip_prefix("www.") {
        Some(rest) => Some(rest.to_string()),
        None => Some(host),
    }
}

/// Turn address bar input into a URL.
///
/// Input that already parses with a scheme is returned as-is. Input that
/// looks like a bare domain (has a `.` and no space) gets `https://`.
/// Anything else becomes a query against `engine`. Blank input yields `None`.
pub fn resolve_input(input: &str, engine: SearchEngine) -> Option<Url> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(url) = Url::parse(trimmed) {
        if !url.scheme().is_empty() {
            return Some(url);
        }
    }

    if trimmed.contains('.') && !trimmed.contains(' ') {
        return Url::parse(&format!("https://{trimmed}")).ok();
    }

    let encoded = urlencoding::encode(trimmed);
    Url::parse(&engine.search_url(&encoded)).ok()
}

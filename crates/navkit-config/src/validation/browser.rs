//! Validation for the `[browser]` section.

use crate::schema::{BrowserConfig, NavkitConfig};

/// The home page must be an absolute URL.
pub(crate) fn validate_home_page(errors: &mut Vec<String>, config: &NavkitConfig) {
    let home = config.browser.home_page.trim();
    if home.is_empty() {
        errors.push("browser.home_page is empty".into());
        return;
    }
    if let Err(e) = url::Url::parse(home) {
        errors.push(format!("browser.home_page = {home:?} is not a valid URL: {e}"));
    }
}

/// Blocklist entries are host substrings: non-empty, no whitespace.
///
/// An empty entry would be contained in every host.
pub(crate) fn validate_blocklist(errors: &mut Vec<String>, config: &NavkitConfig) {
    for (i, entry) in config.browser.blocked_domains.iter().enumerate() {
        if entry.trim().is_empty() {
            errors.push(format!("browser.blocked_domains[{i}] is empty"));
        } else if entry.chars().any(char::is_whitespace) {
            errors.push(format!(
                "browser.blocked_domains[{i}] = {entry:?} contains whitespace"
            ));
        }
    }
}

/// Replace an unusable home page with the default one.
pub(crate) fn repair_home_page(repairs: &mut Vec<String>, config: &mut NavkitConfig) {
    let mut errors = Vec::new();
    validate_home_page(&mut errors, config);
    if errors.is_empty() {
        return;
    }
    let fallback = BrowserConfig::default().home_page;
    repairs.push(format!(
        "browser.home_page = {:?} replaced with {fallback}",
        config.browser.home_page
    ));
    config.browser.home_page = fallback;
}

/// Trim blocklist entries and drop the ones that still cannot match a host.
/// Valid entries are kept in order.
pub(crate) fn repair_blocklist(repairs: &mut Vec<String>, config: &mut NavkitConfig) {
    let entries = std::mem::take(&mut config.browser.blocked_domains);
    for (i, entry) in entries.into_iter().enumerate() {
        let trimmed = entry.trim();
        if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
            repairs.push(format!("browser.blocked_domains[{i}] = {entry:?} dropped"));
        } else {
            config.browser.blocked_domains.push(trimmed.to_string());
        }
    }
}

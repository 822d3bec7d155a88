//! Validation for smaller config sections: scripting and webview.

use crate::schema::NavkitConfig;

use super::helpers::{clamp_range, validate_range};

/// Validate scripting constraints.
pub(crate) fn validate_scripting(errors: &mut Vec<String>, config: &NavkitConfig) {
    validate_range(
        errors,
        "scripting.evaluation_timeout_ms",
        config.scripting.evaluation_timeout_ms,
        100,
        120_000,
    );
}

/// Validate webview settings.
pub(crate) fn validate_webview(errors: &mut Vec<String>, config: &NavkitConfig) {
    if let Some(ua) = &config.webview.custom_user_agent {
        if ua.trim().is_empty() {
            errors.push("webview.custom_user_agent is set but empty".into());
        }
    }
}

pub(crate) fn repair_scripting(repairs: &mut Vec<String>, config: &mut NavkitConfig) {
    clamp_range(
        repairs,
        "scripting.evaluation_timeout_ms",
        &mut config.scripting.evaluation_timeout_ms,
        100,
        120_000,
    );
}

/// A blank user agent means "use the engine default".
pub(crate) fn repair_webview(repairs: &mut Vec<String>, config: &mut NavkitConfig) {
    if config
        .webview
        .custom_user_agent
        .as_deref()
        .is_some_and(|ua| ua.trim().is_empty())
    {
        repairs.push("webview.custom_user_agent is empty, unset".into());
        config.webview.custom_user_agent = None;
    }
}

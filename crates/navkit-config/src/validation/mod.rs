//! Full configuration validation.
//!
//! Each section has its own submodule; this orchestrator calls them all
//! and collects errors into a single `ConfigError`. `repair` fixes the
//! same problems field by field so one bad value does not discard the
//! rest of a user's file.

mod browser;
mod helpers;
mod misc;


use crate::schema::NavkitConfig;
use navkit_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &NavkitConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    browser::validate_home_page(&mut errors, config);
    browser::validate_blocklist(&mut errors, config);
    misc::validate_scripting(&mut errors, config);
    misc::validate_webview(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

/// Fix every invalid field in place, leaving valid fields untouched.
///
/// Returns one description per change. Afterwards `validate` passes.
pub fn repair(config: &mut NavkitConfig) -> Vec<String> {
    let mut repairs: Vec<String> = Vec::new();

    browser::repair_home_page(&mut repairs, config);
    browser::repair_blocklist(&mut repairs, config);
    misc::repair_scripting(&mut repairs, config);
    misc::repair_webview(&mut repairs, config);

    repairs
}

//! Default TOML config template with inline documentation.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# navkit configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[browser]
# search_engine = "google"     # google, duckduckgo, bing, ecosia
# home_page = "https://www.apple.com"
# Host substrings to refuse; "ads.example.com" also blocks "sub.ads.example.com"
# blocked_domains = []

[webview]
# allows_inline_media_playback = true
# media_types_requiring_user_action = []   # "audio", "video"
# allows_back_forward_gestures = true
# allows_link_preview = true
# javascript_enabled = true
# custom_user_agent = "MyApp/1.0"

[scripting]
# evaluation_timeout_ms = 5000 # 100-120000

[logging]
# level = "info"               # trace, debug, info, warn, error
"##
    .to_string()
}

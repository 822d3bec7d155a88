//! Settings handed to the web-rendering component when it is created.

use serde::{Deserialize, Serialize};

/// Media kinds that may require a user gesture before playback.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Audio,
    Video,
}

/// Renderer behavior toggles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebViewSettings {
    pub allows_inline_media_playback: bool,
    pub media_types_requiring_user_action: Vec<MediaType>,
    pub allows_back_forward_gestures: bool,
    pub allows_link_preview: bool,
    pub javascript_enabled: bool,
    pub custom_user_agent: Option<String>,
}

impl Default for WebViewSettings {
    fn default() -> Self {
        Self {
            allows_inline_media_playback: true,
            media_types_requiring_user_action: Vec::new(),
            allows_back_forward_gestures: true,
            allows_link_preview: true,
            javascript_enabled: true,
            custom_user_agent: None,
        }
    }
}

impl WebViewSettings {
    /// Whether autoplay may start without a user gesture for every media kind.
    pub fn autoplay_allowed(&self) -> bool {
        self.media_types_requiring_user_action.is_empty()
    }
}

//! Load status of a single WebView.
//!
//! `NavigationState` is a value type. Its fields are private and every
//! change goes through a transition that returns a new state, so the two
//! invariants below hold after any sequence of transitions:
//!
//! - not loading implies progress is exactly `0.0` or `1.0`
//! - an error is only present while not loading

use navkit_common::WebViewError;
use serde::Serialize;
use url::Url;

/// Progress reported as soon as a navigation starts, so an indicator has
/// something to draw before the renderer sends real progress.
pub const STARTED_PROGRESS: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavigationState {
    current_url: Option<Url>,
    title: String,
    is_loading: bool,
    loading_progress: f64,
    can_go_back: bool,
    can_go_forward: bool,
    last_error: Option<WebViewError>,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::initial()
    }
}

impl NavigationState {
    pub fn initial() -> Self {
        Self {
            current_url: None,
            title: String::new(),
            is_loading: false,
            loading_progress: 0.0,
            can_go_back: false,
            can_go_forward: false,
            last_error: None,
        }
    }

    // -- accessors --

    pub fn current_url(&self) -> Option<&Url> {
        self.current_url.as_ref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn loading_progress(&self) -> f64 {
        self.loading_progress
    }

    pub fn can_go_back(&self) -> bool {
        self.can_go_back
    }

    pub fn can_go_forward(&self) -> bool {
        self.can_go_forward
    }

    pub fn last_error(&self) -> Option<&WebViewError> {
        self.last_error.as_ref()
    }

    /// Whether both state invariants hold.
    pub fn is_consistent(&self) -> bool {
        let settled = self.is_loading
            || self.loading_progress == 0.0
            || self.loading_progress == 1.0;
        let error_idle = self.last_error.is_none() || !self.is_loading;
        settled && error_idle
    }

    // -- transitions --

    #[must_use]
    pub fn start_navigation(&self) -> Self {
        Self {
            is_loading: true,
            loading_progress: STARTED_PROGRESS,
            last_error: None,
            ..self.clone()
        }
    }

    /// Clamp `progress` into `[0, 1]`.
    ///
    /// Ignored while idle (and for NaN): a late progress report must not
    /// leave partial progress behind a finished or failed load.
    #[must_use]
    pub fn update_progress(&self, progress: f64) -> Self {
        if !self.is_loading || progress.is_nan() {
            return self.clone();
        }
        Self {
            loading_progress: progress.clamp(0.0, 1.0),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn finish_navigation(
        &self,
        url: Url,
        title: impl Into<String>,
        can_go_back: bool,
        can_go_forward: bool,
    ) -> Self {
        Self {
            current_url: Some(url),
            title: title.into(),
            is_loading: false,
            loading_progress: 1.0,
            can_go_back,
            can_go_forward,
            last_error: None,
        }
    }

    /// Stop loading and record `error`. URL and title keep describing the
    /// last page that did load, so it can be retried.
    #[must_use]
    pub fn fail_navigation(&self, error: WebViewError) -> Self {
        Self {
            is_loading: false,
            loading_progress: 0.0,
            last_error: Some(error),
            ..self.clone()
        }
    }

    /// The renderer began receiving content for `url`.
    #[must_use]
    pub fn commit_navigation(&self, url: Url) -> Self {
        Self {
            current_url: Some(url),
            ..self.clone()
        }
    }

    /// A server redirect moved the in-flight load to `to`.
    #[must_use]
    pub fn redirect_navigation(&self, to: Url) -> Self {
        Self {
            current_url: Some(to),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn retitle(&self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self.clone()
        }
    }

    /// The user stopped the in-flight load. Partial progress is dropped;
    /// an idle state is returned unchanged.
    #[must_use]
    pub fn cancel_navigation(&self) -> Self {
        if !self.is_loading {
            return self.clone();
        }
        Self {
            is_loading: false,
            loading_progress: 0.0,
            ..self.clone()
        }
    }
}

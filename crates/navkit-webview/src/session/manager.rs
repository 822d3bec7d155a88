//! SessionController struct, construction and read-only accessors.

use std::time::Duration;

use navkit_common::{EventBus, SearchEngine, WebViewError};
use navkit_config::NavkitConfig;
use tokio::sync::broadcast;
use tracing::warn;
use url::Url;

use crate::adapter::{EventAdapter, FramePolicy};
use crate::bridge::MessageRouter;
use crate::decision::NavigationPolicy;
use crate::events::NavigationToken;
use crate::renderer::WebRenderer;
use crate::state::NavigationState;

use super::types::{Bookmark, SessionEvent, DEFAULT_SCRIPT_TIMEOUT, EVENT_BUS_CAPACITY};

/// Coordinates one WebView: validation, history, bookmarks, renderer
/// commands and event folding.
///
/// Every mutation takes `&mut self`; the controller lives on a single
/// coordination context and receives renderer events from a channel.
pub struct SessionController<R: WebRenderer> {
    /// Folds renderer events and owns the navigation state.
    pub(super) adapter: EventAdapter,
    pub(super) renderer: R,
    /// Requested URLs, adjacent repeats collapsed.
    pub(super) history: Vec<Url>,
    pub(super) bookmarks: Vec<Bookmark>,
    /// Engine for address bar input that is not a URL.
    pub(super) search_engine: SearchEngine,
    /// Target of `open_home`.
    pub(super) home_page: Option<String>,
    /// Upper bound on a single script evaluation.
    pub(super) script_timeout: Duration,
    pub(super) router: MessageRouter,
    pub(super) events: EventBus<SessionEvent>,
}

impl<R: WebRenderer> SessionController<R> {
    pub fn new(renderer: R, policy: NavigationPolicy) -> Self {
        Self {
            adapter: EventAdapter::new(policy),
            renderer,
            history: Vec::new(),
            bookmarks: Vec::new(),
            search_engine: SearchEngine::default(),
            home_page: None,
            script_timeout: DEFAULT_SCRIPT_TIMEOUT,
            router: MessageRouter::new(),
            events: EventBus::new(EVENT_BUS_CAPACITY),
        }
    }

    /// Build a controller from the `[browser]` and `[scripting]` sections.
    pub fn from_config(renderer: R, config: &NavkitConfig) -> Self {
        let policy = NavigationPolicy::new(config.browser.blocked_domains.clone());
        Self::new(renderer, policy)
            .with_search_engine(config.browser.search_engine)
            .with_home_page(config.browser.home_page.clone())
            .with_script_timeout(Duration::from_millis(u64::from(
                config.scripting.evaluation_timeout_ms,
            )))
    }

    pub fn with_search_engine(mut self, engine: SearchEngine) -> Self {
        self.search_engine = engine;
        self
    }

    pub fn with_home_page(mut self, home_page: impl Into<String>) -> Self {
        self.home_page = Some(home_page.into());
        self
    }

    pub fn with_script_timeout(mut self, timeout: Duration) -> Self {
        self.script_timeout = timeout;
        self
    }

    pub fn with_frame_policy(mut self, frames: FramePolicy) -> Self {
        self.adapter = self.adapter.with_frame_policy(frames);
        self
    }

    /// Seed the bookmark collection, e.g. from the bookmark store.
    pub fn with_bookmarks(mut self, bookmarks: Vec<Bookmark>) -> Self {
        self.bookmarks = bookmarks;
        self
    }

    // -- accessors --

    pub fn state(&self) -> &NavigationState {
        self.adapter.state()
    }

    pub fn history(&self) -> &[Url] {
        &self.history
    }

    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    pub fn current_token(&self) -> NavigationToken {
        self.adapter.current_token()
    }

    pub fn search_engine(&self) -> SearchEngine {
        self.search_engine
    }

    pub fn home_page(&self) -> Option<&str> {
        self.home_page.as_deref()
    }

    pub fn script_timeout(&self) -> Duration {
        self.script_timeout
    }

    pub fn policy(&self) -> &NavigationPolicy {
        self.adapter.policy()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Receive [`SessionEvent`]s published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    // -- internal helpers --

    /// Issue the next navigation token and make it current.
    pub(super) fn issue_token(&mut self) -> NavigationToken {
        let token = self.adapter.current_token().next();
        self.adapter.begin(token);
        token
    }

    pub(super) fn publish_state(&self) {
        self.events
            .publish(SessionEvent::StateChanged(self.adapter.state().clone()));
    }

    /// Record an error detected before the renderer saw the request.
    pub(super) fn fail_locally(&mut self, error: WebViewError) {
        warn!(error = %error, "navigation rejected");
        self.adapter.fail_locally(error);
        self.publish_state();
    }
}

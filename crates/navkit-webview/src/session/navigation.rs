//! Navigation commands, event folding and the JavaScript bridge.

use navkit_common::WebViewError;
use tracing::{debug, info, warn};
use url::Url;

use crate::adapter::FoldOutcome;
use crate::bridge::{js_dispatch_message, DispatchOutcome, MessageBody, MessageHandler};
use crate::decision::{validate_url, NavigationDecision};
use crate::events::{EventReceiver, FrameInfo, NavigationEnvelope, NavigationToken};
use crate::renderer::WebRenderer;
use crate::url_utils::resolve_input;

use super::manager::SessionController;
use super::types::SessionEvent;

impl<R: WebRenderer> SessionController<R> {
    /// Validate `raw`, gate it through the blocklist, record it in history
    /// and ask the renderer to load it.
    ///
    /// The state's URL and error are left to the renderer's lifecycle
    /// events, except that a rejected request records its error at once.
    pub fn navigate(&mut self, raw: &str) -> Result<NavigationToken, WebViewError> {
        let url = match validate_url(raw) {
            Ok(url) => url,
            Err(error) => {
                debug!(input = raw, "invalid navigation input");
                self.fail_locally(error.clone());
                return Err(error);
            }
        };

        if self.adapter.policy().decide(&url) == NavigationDecision::Cancel {
            self.fail_locally(WebViewError::ContentBlocked);
            return Err(WebViewError::ContentBlocked);
        }

        self.record_history(&url);
        let token = self.issue_token();
        info!(url = %url, %token, "navigating");
        self.command(token, |renderer, token| renderer.load(&url, token))
    }

    /// Navigate to free-form address bar input, falling back to a search
    /// with the configured engine.
    pub fn navigate_input(&mut self, input: &str) -> Result<NavigationToken, WebViewError> {
        match resolve_input(input, self.search_engine) {
            Some(url) => self.navigate(url.as_str()),
            None => {
                self.fail_locally(WebViewError::InvalidUrl);
                Err(WebViewError::InvalidUrl)
            }
        }
    }

    /// Navigate to the configured home page. `None` when the session has
    /// no home page.
    pub fn open_home(&mut self) -> Result<Option<NavigationToken>, WebViewError> {
        let Some(home) = self.home_page.clone() else {
            debug!("open_home ignored: no home page");
            return Ok(None);
        };
        self.navigate(&home).map(Some)
    }

    /// Step back in the renderer's history. `None` when there is nowhere
    /// to go.
    pub fn go_back(&mut self) -> Result<Option<NavigationToken>, WebViewError> {
        if !self.state().can_go_back() {
            debug!("go_back ignored: no back entry");
            return Ok(None);
        }
        let token = self.issue_token();
        self.command(token, |renderer, token| renderer.go_back(token))
            .map(Some)
    }

    pub fn go_forward(&mut self) -> Result<Option<NavigationToken>, WebViewError> {
        if !self.state().can_go_forward() {
            debug!("go_forward ignored: no forward entry");
            return Ok(None);
        }
        let token = self.issue_token();
        self.command(token, |renderer, token| renderer.go_forward(token))
            .map(Some)
    }

    /// Reload the current page. `None` when nothing has been loaded.
    pub fn reload(&mut self) -> Result<Option<NavigationToken>, WebViewError> {
        if self.state().current_url().is_none() {
            debug!("reload ignored: no current page");
            return Ok(None);
        }
        let token = self.issue_token();
        self.command(token, |renderer, token| renderer.reload(token))
            .map(Some)
    }

    /// Stop the in-flight load. Late events from it are discarded; events
    /// the page produces afterwards carry the returned token.
    pub fn stop_loading(&mut self) -> Result<NavigationToken, WebViewError> {
        let token = self.issue_token();
        self.command(token, |renderer, token| renderer.stop_loading(token))?;
        if self.state().is_loading() {
            debug!(%token, "load stopped");
            self.adapter.cancel_locally();
            self.publish_state();
        }
        Ok(token)
    }

    /// Render an HTML string. History is not touched.
    pub fn load_html(
        &mut self,
        html: &str,
        base_url: Option<&Url>,
    ) -> Result<NavigationToken, WebViewError> {
        let token = self.issue_token();
        debug!(%token, html_len = html.len(), "loading inline html");
        self.command(token, |renderer, token| {
            renderer.load_html(html, base_url, token)
        })
    }

    // -- renderer events --

    /// Fold one renderer event into the navigation state.
    pub fn handle_event(&mut self, envelope: &NavigationEnvelope) -> FoldOutcome {
        let before = self.adapter.state().clone();
        let outcome = self.adapter.fold(envelope);
        if outcome.is_applied() && self.adapter.state() != &before {
            self.publish_state();
        }
        outcome
    }

    /// Fold every event currently queued on `events` without waiting.
    /// Returns how many were applied.
    pub fn drain_events(&mut self, events: &mut EventReceiver) -> usize {
        let mut applied = 0;
        while let Ok(envelope) = events.try_recv() {
            if self.handle_event(&envelope).is_applied() {
                applied += 1;
            }
        }
        applied
    }

    /// Policy answer for a navigation the renderer is about to perform.
    pub fn decide_policy(&self, url: &Url, frame: &FrameInfo) -> NavigationDecision {
        self.adapter.decide_policy(url, frame)
    }

    // -- JavaScript --

    /// Evaluate `script` in the page, bounded by the script timeout.
    pub async fn evaluate_javascript(&self, script: &str) -> Result<MessageBody, WebViewError> {
        match tokio::time::timeout(self.script_timeout, self.renderer.evaluate_javascript(script))
            .await
        {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    timeout_ms = self.script_timeout.as_millis() as u64,
                    "script evaluation timed out"
                );
                Err(WebViewError::Timeout)
            }
        }
    }

    /// Invoke the page-side callback registered with `window.navkit.on(name)`.
    pub async fn post_message(
        &self,
        name: &str,
        payload: &serde_json::Value,
    ) -> Result<(), WebViewError> {
        self.evaluate_javascript(&js_dispatch_message(name, payload))
            .await
            .map(|_| ())
    }

    /// Route page messages posted under `name` to `handler`, replacing any
    /// previous handler for that name.
    pub fn register_message_handler(
        &mut self,
        name: &str,
        handler: MessageHandler,
    ) -> Result<(), WebViewError> {
        if !self.router.is_registered(name) {
            self.renderer.register_message_handler(name)?;
        }
        self.router.register(name, handler);
        Ok(())
    }

    /// Deliver a raw page message to its handler.
    pub fn dispatch_message(&self, raw: &str, frame: FrameInfo) -> DispatchOutcome {
        self.router.dispatch_raw(raw, frame)
    }

    // -- internal --

    fn record_history(&mut self, url: &Url) {
        if self.history.last() == Some(url) {
            return;
        }
        self.history.push(url.clone());
        self.events.publish(SessionEvent::HistoryChanged {
            len: self.history.len(),
        });
    }

    /// Send a token-carrying command, recording a renderer refusal as a
    /// navigation failure.
    fn command<F>(&mut self, token: NavigationToken, send: F) -> Result<NavigationToken, WebViewError>
    where
        F: FnOnce(&mut R, NavigationToken) -> Result<(), WebViewError>,
    {
        match send(&mut self.renderer, token) {
            Ok(()) => Ok(token),
            Err(error) => {
                self.fail_locally(error.clone());
                Err(error)
            }
        }
    }
}

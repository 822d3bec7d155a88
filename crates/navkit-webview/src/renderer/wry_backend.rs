//! `WebRenderer` backed by a platform WebView through `wry`.
//!
//! Lifecycle callbacks run on the window's event loop. They stamp each
//! event with the token of the navigation command that is current at that
//! moment and send it over the session's event channel; the session folds
//! them on its next `drain_events`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use navkit_common::WebViewError;
use navkit_config::WebViewSettings;
use tokio::sync::oneshot;
use tracing::{debug, warn};
use url::Url;
use wry::raw_window_handle;
use wry::{PageLoadEvent, WebView, WebViewBuilder};

use crate::bridge::{MessageBody, BRIDGE_INIT_SCRIPT};
use crate::decision::{NavigationDecision, NavigationPolicy};
use crate::events::{EventSender, NavigationEnvelope, NavigationEvent, NavigationToken};

use super::WebRenderer;

// =============================================================================
// BACK/FORWARD TRACKING
// =============================================================================

/// wry exposes no back/forward list, so finished loads are tracked here
/// to report `can_go_back` / `can_go_forward`.
#[derive(Debug, Default)]
struct HistoryCursor {
    entries: Vec<String>,
    pos: usize,
    /// Pending history traversal (-1 back, +1 forward).
    traversal: Option<isize>,
}

impl HistoryCursor {
    fn finished(&mut self, url: &str) {
        if let Some(delta) = self.traversal.take() {
            let target = self.pos as isize + delta;
            if target >= 0 && (target as usize) < self.entries.len() {
                self.pos = target as usize;
                return;
            }
        }
        if self.entries.get(self.pos).map(String::as_str) == Some(url) {
            return;
        }
        if !self.entries.is_empty() {
            self.entries.truncate(self.pos + 1);
        }
        self.entries.push(url.to_string());
        self.pos = self.entries.len() - 1;
    }

    fn can_go_back(&self) -> bool {
        self.pos > 0
    }

    fn can_go_forward(&self) -> bool {
        self.pos + 1 < self.entries.len()
    }
}

// =============================================================================
// RENDERER
// =============================================================================

pub struct WryRenderer {
    webview: WebView,
    token: Arc<AtomicU64>,
    cursor: Arc<Mutex<HistoryCursor>>,
    /// Raw IPC bodies waiting for `drain_messages`.
    messages: Arc<Mutex<Vec<String>>>,
}

impl WryRenderer {
    /// Create the WebView as a child of `window`, positioned at `bounds`.
    pub fn create<W: raw_window_handle::HasWindowHandle>(
        window: &W,
        bounds: wry::Rect,
        settings: &WebViewSettings,
        policy: NavigationPolicy,
        events: EventSender,
    ) -> Result<Self, wry::Error> {
        let token = Arc::new(AtomicU64::new(NavigationToken::INITIAL.value()));
        let cursor = Arc::new(Mutex::new(HistoryCursor::default()));
        let messages = Arc::new(Mutex::new(Vec::new()));
        let title = Arc::new(Mutex::new(String::new()));

        let mut builder = WebViewBuilder::new()
            .with_bounds(bounds)
            .with_autoplay(settings.autoplay_allowed())
            .with_back_forward_navigation_gestures(settings.allows_back_forward_gestures)
            .with_initialization_script(BRIDGE_INIT_SCRIPT)
            .with_html("<html><body></body></html>");

        if let Some(ua) = &settings.custom_user_agent {
            builder = builder.with_user_agent(ua);
        }

        // IPC handler: page -> host
        let queue = Arc::clone(&messages);
        builder = builder.with_ipc_handler(move |request| {
            let body = request.body().to_string();
            debug!(body_len = body.len(), "page message");
            if let Ok(mut pending) = queue.lock() {
                pending.push(body);
            }
        });

        // Page load handler
        let (load_token, load_cursor, load_title, load_events) = (
            Arc::clone(&token),
            Arc::clone(&cursor),
            Arc::clone(&title),
            events.clone(),
        );
        builder = builder.with_on_page_load_handler(move |event, raw| {
            let Ok(url) = Url::parse(&raw) else {
                warn!(url = %raw, "page load for unparseable url");
                return;
            };
            let token = NavigationToken::new(load_token.load(Ordering::SeqCst));
            let event = match event {
                PageLoadEvent::Started => NavigationEvent::Started { url },
                PageLoadEvent::Finished => {
                    let (can_go_back, can_go_forward) = match load_cursor.lock() {
                        Ok(mut cursor) => {
                            cursor.finished(&raw);
                            (cursor.can_go_back(), cursor.can_go_forward())
                        }
                        Err(_) => (false, false),
                    };
                    let title = load_title.lock().map(|t| t.clone()).unwrap_or_default();
                    NavigationEvent::Finished {
                        url,
                        title,
                        can_go_back,
                        can_go_forward,
                    }
                }
            };
            debug!(%token, ?event, "page load");
            let _ = load_events.send(NavigationEnvelope::main(token, event));
        });

        // Title change handler
        let (title_token, title_events) = (Arc::clone(&token), events);
        builder = builder.with_document_title_changed_handler(move |new_title| {
            debug!(title = %new_title, "title changed");
            if let Ok(mut current) = title.lock() {
                current.clone_from(&new_title);
            }
            let token = NavigationToken::new(title_token.load(Ordering::SeqCst));
            let _ = title_events.send(NavigationEnvelope::main(
                token,
                NavigationEvent::TitleChanged { title: new_title },
            ));
        });

        // Navigation handler: blocklist
        builder = builder.with_navigation_handler(move |raw| {
            let Ok(url) = Url::parse(&raw) else {
                return true;
            };
            policy.decide(&url) == NavigationDecision::Allow
        });

        let webview = builder.build_as_child(window)?;
        debug!("WebView created");

        Ok(Self {
            webview,
            token,
            cursor,
            messages,
        })
    }

    /// Take the page messages received since the last call. Feed them to
    /// `SessionController::dispatch_message`.
    pub fn drain_messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|mut pending| std::mem::take(&mut *pending))
            .unwrap_or_default()
    }

    pub fn set_bounds(&self, bounds: wry::Rect) -> Result<(), wry::Error> {
        self.webview.set_bounds(bounds)
    }

    pub fn inner(&self) -> &WebView {
        &self.webview
    }

    fn activate(&self, token: NavigationToken) {
        self.token.store(token.value(), Ordering::SeqCst);
    }

    fn traverse(&self, delta: isize, script: &str, token: NavigationToken) -> Result<(), WebViewError> {
        self.activate(token);
        if let Ok(mut cursor) = self.cursor.lock() {
            cursor.traversal = Some(delta);
        }
        self.webview.evaluate_script(script).map_err(to_webview_error)
    }
}

fn to_webview_error(e: wry::Error) -> WebViewError {
    WebViewError::Unknown(e.to_string())
}

#[async_trait(?Send)]
impl WebRenderer for WryRenderer {
    fn load(&mut self, url: &Url, token: NavigationToken) -> Result<(), WebViewError> {
        self.activate(token);
        self.webview.load_url(url.as_str()).map_err(to_webview_error)
    }

    /// wry cannot attach a base URL to inline HTML; `base_url` is ignored.
    fn load_html(
        &mut self,
        html: &str,
        base_url: Option<&Url>,
        token: NavigationToken,
    ) -> Result<(), WebViewError> {
        if let Some(base) = base_url {
            debug!(base = %base, "base url not supported by wry, ignoring");
        }
        self.activate(token);
        self.webview.load_html(html).map_err(to_webview_error)
    }

    fn go_back(&mut self, token: NavigationToken) -> Result<(), WebViewError> {
        self.traverse(-1, "history.back();", token)
    }

    fn go_forward(&mut self, token: NavigationToken) -> Result<(), WebViewError> {
        self.traverse(1, "history.forward();", token)
    }

    fn reload(&mut self, token: NavigationToken) -> Result<(), WebViewError> {
        self.activate(token);
        self.webview
            .evaluate_script("location.reload();")
            .map_err(to_webview_error)
    }

    fn stop_loading(&mut self, token: NavigationToken) -> Result<(), WebViewError> {
        self.activate(token);
        self.webview
            .evaluate_script("window.stop();")
            .map_err(to_webview_error)
    }

    async fn evaluate_javascript(&self, script: &str) -> Result<MessageBody, WebViewError> {
        let (tx, rx) = oneshot::channel::<String>();
        let tx = Mutex::new(Some(tx));
        self.webview
            .evaluate_script_with_callback(script, move |result| {
                if let Some(tx) = tx.lock().ok().and_then(|mut slot| slot.take()) {
                    let _ = tx.send(result);
                }
            })
            .map_err(to_webview_error)?;

        let raw = rx
            .await
            .map_err(|_| WebViewError::Unknown("script result dropped".into()))?;
        if raw.is_empty() {
            return Ok(MessageBody::Null);
        }
        MessageBody::from_json_str(&raw).map_err(|e| WebViewError::Unknown(e.to_string()))
    }

    /// The bridge script carries every name over one IPC channel, so
    /// there is nothing to install per handler.
    fn register_message_handler(&mut self, name: &str) -> Result<(), WebViewError> {
        debug!(handler = name, "message handler available");
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_tracks_new_loads() {
        let mut cursor = HistoryCursor::default();
        cursor.finished("https://a.com/");
        assert!(!cursor.can_go_back());
        cursor.finished("https://b.com/");
        assert!(cursor.can_go_back());
        assert!(!cursor.can_go_forward());
    }

    #[test]
    fn cursor_reload_is_not_an_entry() {
        let mut cursor = HistoryCursor::default();
        cursor.finished("https://a.com/");
        cursor.finished("https://a.com/");
        assert_eq!(cursor.entries.len(), 1);
    }

    #[test]
    fn cursor_traversal_and_truncation() {
        let mut cursor = HistoryCursor::default();
        cursor.finished("https://a.com/");
        cursor.finished("https://b.com/");

        cursor.traversal = Some(-1);
        cursor.finished("https://a.com/");
        assert!(!cursor.can_go_back());
        assert!(cursor.can_go_forward());

        cursor.finished("https://c.com/");
        assert_eq!(cursor.entries, ["https://a.com/", "https://c.com/"]);
        assert!(!cursor.can_go_forward());
    }
}

//! The seam between the session controller and the web-rendering component.
//!
//! The controller only issues commands through [`WebRenderer`]; everything
//! the renderer observes comes back asynchronously as
//! [`NavigationEnvelope`](crate::events::NavigationEnvelope)s stamped with
//! the token of the command that caused them.

use async_trait::async_trait;
use navkit_common::WebViewError;
use url::Url;

use crate::bridge::MessageBody;
use crate::events::NavigationToken;

mod recording;
#[cfg(feature = "wry")]
mod wry_backend;

pub use recording::{RecordingRenderer, RendererCommand};
#[cfg(feature = "wry")]
pub use wry_backend::WryRenderer;

/// Commands understood by a web-rendering component.
///
/// Navigation commands carry the token the renderer must stamp on the
/// lifecycle events they produce. Implementations run on the single
/// coordination context that owns the session, so futures need not be `Send`.
#[async_trait(?Send)]
pub trait WebRenderer {
    fn load(&mut self, url: &Url, token: NavigationToken) -> Result<(), WebViewError>;

    /// Render `html` directly. `base_url` resolves relative links when the
    /// renderer supports it.
    fn load_html(
        &mut self,
        html: &str,
        base_url: Option<&Url>,
        token: NavigationToken,
    ) -> Result<(), WebViewError>;

    fn go_back(&mut self, token: NavigationToken) -> Result<(), WebViewError>;

    fn go_forward(&mut self, token: NavigationToken) -> Result<(), WebViewError>;

    fn reload(&mut self, token: NavigationToken) -> Result<(), WebViewError>;

    /// Stop the in-flight load. Events the page produces afterwards are
    /// stamped with `token`.
    fn stop_loading(&mut self, token: NavigationToken) -> Result<(), WebViewError>;

    /// Run `script` in the page and return its decoded result.
    ///
    /// Latency is unbounded; callers apply their own timeout.
    async fn evaluate_javascript(&self, script: &str) -> Result<MessageBody, WebViewError>;

    /// Expose a page-to-host message channel under `name`.
    fn register_message_handler(&mut self, name: &str) -> Result<(), WebViewError>;
}

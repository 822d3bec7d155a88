//! Headless renderer that records commands instead of rendering.
//!
//! Used by tests and by the CLI `replay` command, where lifecycle events
//! are scripted rather than produced by a real engine.

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use navkit_common::WebViewError;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::bridge::MessageBody;
use crate::events::NavigationToken;

use super::WebRenderer;

/// A command received by [`RecordingRenderer`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum RendererCommand {
    Load {
        url: Url,
        token: NavigationToken,
    },
    LoadHtml {
        html: String,
        base_url: Option<Url>,
        token: NavigationToken,
    },
    GoBack {
        token: NavigationToken,
    },
    GoForward {
        token: NavigationToken,
    },
    Reload {
        token: NavigationToken,
    },
    StopLoading {
        token: NavigationToken,
    },
    EvaluateJavaScript {
        script: String,
    },
    RegisterMessageHandler {
        name: String,
    },
}

#[derive(Debug, Default)]
pub struct RecordingRenderer {
    commands: RefCell<Vec<RendererCommand>>,
    script_results: HashMap<String, MessageBody>,
    script_delay: Option<Duration>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `script` with `result` instead of `Null`.
    pub fn with_script_result(mut self, script: impl Into<String>, result: MessageBody) -> Self {
        self.script_results.insert(script.into(), result);
        self
    }

    /// Delay every script evaluation, to simulate a slow page.
    pub fn with_script_delay(mut self, delay: Duration) -> Self {
        self.script_delay = Some(delay);
        self
    }

    pub fn commands(&self) -> Vec<RendererCommand> {
        self.commands.borrow().clone()
    }

    /// The most recent `Load` target, if any.
    pub fn last_loaded(&self) -> Option<Url> {
        self.commands.borrow().iter().rev().find_map(|cmd| match cmd {
            RendererCommand::Load { url, .. } => Some(url.clone()),
            _ => None,
        })
    }

    fn record(&mut self, command: RendererCommand) {
        debug!(?command, "renderer command");
        self.commands.get_mut().push(command);
    }
}

#[async_trait(?Send)]
impl WebRenderer for RecordingRenderer {
    fn load(&mut self, url: &Url, token: NavigationToken) -> Result<(), WebViewError> {
        self.record(RendererCommand::Load {
            url: url.clone(),
            token,
        });
        Ok(())
    }

    fn load_html(
        &mut self,
        html: &str,
        base_url: Option<&Url>,
        token: NavigationToken,
    ) -> Result<(), WebViewError> {
        self.record(RendererCommand::LoadHtml {
            html: html.to_string(),
            base_url: base_url.cloned(),
            token,
        });
        Ok(())
    }

    fn go_back(&mut self, token: NavigationToken) -> Result<(), WebViewError> {
        self.record(RendererCommand::GoBack { token });
        Ok(())
    }

    fn go_forward(&mut self, token: NavigationToken) -> Result<(), WebViewError> {
        self.record(RendererCommand::GoForward { token });
        Ok(())
    }

    fn reload(&mut self, token: NavigationToken) -> Result<(), WebViewError> {
        self.record(RendererCommand::Reload { token });
        Ok(())
    }

    fn stop_loading(&mut self, token: NavigationToken) -> Result<(), WebViewError> {
        self.record(RendererCommand::StopLoading { token });
        Ok(())
    }

    async fn evaluate_javascript(&self, script: &str) -> Result<MessageBody, WebViewError> {
        self.commands
            .borrow_mut()
            .push(RendererCommand::EvaluateJavaScript {
                script: script.to_string(),
            });

        if let Some(delay) = self.script_delay {
            tokio::time::sleep(delay).await;
        }

        Ok(self
            .script_results
            .get(script)
            .cloned()
            .unwrap_or(MessageBody::Null))
    }

    fn register_message_handler(&mut self, name: &str) -> Result<(), WebViewError> {
        self.record(RendererCommand::RegisterMessageHandler {
            name: name.to_string(),
        });
        Ok(())
    }
}

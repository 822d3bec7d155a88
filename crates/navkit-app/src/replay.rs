//! Scripted sessions for the `replay` command.
//!
//! A script is a JSON array of steps. User commands and renderer events
//! are interleaved in the order they should happen:
//!
//! ```json
//! [
//!   {"navigate": "apple.com"},
//!   {"event": {"token": 1, "event": {"type": "started", "url": "https://apple.com"}}},
//!   {"event": {"token": 1, "event": {"type": "finished", "url": "https://apple.com", "title": "Apple"}}},
//!   "add_bookmark"
//! ]
//! ```

use std::path::Path;

use navkit_common::{BookmarkId, NavkitError, WebViewError};
use navkit_webview::{
    Bookmark, DispatchOutcome, FoldOutcome, FrameInfo, MessageBody, NavigationEnvelope,
    NavigationState, NavigationToken, RecordingRenderer, SessionController,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

/// One scripted action.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Navigate(String),
    NavigateInput(String),
    /// Navigate to the configured home page.
    OpenHome,
    GoBack,
    GoForward,
    Reload,
    StopLoading,
    LoadHtml {
        html: String,
        #[serde(default)]
        base_url: Option<Url>,
    },
    /// A lifecycle event reported by the renderer.
    Event(NavigationEnvelope),
    /// A raw page message, as posted through the bridge.
    Message(serde_json::Value),
    Evaluate(String),
    AddBookmark,
    RemoveBookmark(BookmarkId),
    ClearHistory,
}

/// What a step produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum StepResult {
    Issued { token: NavigationToken },
    /// A command that had nothing to act on (e.g. back with no history).
    Skipped,
    Done,
    Rejected { error: WebViewError },
    Applied,
    Ignored { reason: String },
    Value { value: MessageBody },
    Bookmarked { id: BookmarkId },
}

#[derive(Debug, Serialize)]
pub struct ReplayReport<'a> {
    pub steps: Vec<StepResult>,
    pub state: &'a NavigationState,
    pub history: &'a [Url],
    pub bookmarks: &'a [Bookmark],
}

pub fn load_script(path: &Path) -> navkit_common::Result<Vec<Step>> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| {
        NavkitError::Other(format!("invalid replay script {}: {e}", path.display()))
    })
}

/// Run every step in order, collecting one result per step.
pub async fn run(
    session: &mut SessionController<RecordingRenderer>,
    steps: Vec<Step>,
) -> Vec<StepResult> {
    let mut results = Vec::with_capacity(steps.len());
    for (index, step) in steps.into_iter().enumerate() {
        debug!(index, ?step, "replay step");
        results.push(apply(session, step).await);
    }
    info!(steps = results.len(), "replay finished");
    results
}

pub fn report<'a>(
    session: &'a SessionController<RecordingRenderer>,
    steps: Vec<StepResult>,
) -> ReplayReport<'a> {
    ReplayReport {
        steps,
        state: session.state(),
        history: session.history(),
        bookmarks: session.bookmarks(),
    }
}

async fn apply(session: &mut SessionController<RecordingRenderer>, step: Step) -> StepResult {
    match step {
        Step::Navigate(raw) => issued(session.navigate(&raw)),
        Step::NavigateInput(raw) => issued(session.navigate_input(&raw)),
        Step::OpenHome => maybe_issued(session.open_home()),
        Step::GoBack => maybe_issued(session.go_back()),
        Step::GoForward => maybe_issued(session.go_forward()),
        Step::Reload => maybe_issued(session.reload()),
        Step::StopLoading => issued(session.stop_loading()),
        Step::LoadHtml { html, base_url } => issued(session.load_html(&html, base_url.as_ref())),
        Step::Event(envelope) => match session.handle_event(&envelope) {
            FoldOutcome::Applied => StepResult::Applied,
            FoldOutcome::Stale { current, received } => StepResult::Ignored {
                reason: format!("stale token {received} (current {current})"),
            },
            FoldOutcome::Unknown { current, received } => StepResult::Ignored {
                reason: format!("unissued token {received} (current {current})"),
            },
            FoldOutcome::SubFrame => StepResult::Ignored {
                reason: "sub-frame event".into(),
            },
        },
        Step::Message(raw) => match session.dispatch_message(&raw.to_string(), FrameInfo::main()) {
            DispatchOutcome::Delivered(_) => StepResult::Done,
            DispatchOutcome::Unhandled(message) => StepResult::Ignored {
                reason: format!("no handler named {}", message.name),
            },
            DispatchOutcome::Malformed => StepResult::Ignored {
                reason: "malformed message".into(),
            },
        },
        Step::Evaluate(script) => match session.evaluate_javascript(&script).await {
            Ok(value) => StepResult::Value { value },
            Err(error) => StepResult::Rejected { error },
        },
        Step::AddBookmark => match session.add_bookmark() {
            Some(id) => StepResult::Bookmarked { id },
            None => StepResult::Skipped,
        },
        Step::RemoveBookmark(id) => {
            if session.remove_bookmark(&id) {
                StepResult::Done
            } else {
                StepResult::Skipped
            }
        }
        Step::ClearHistory => {
            session.clear_history();
            StepResult::Done
        }
    }
}

fn issued(result: Result<NavigationToken, WebViewError>) -> StepResult {
    match result {
        Ok(token) => StepResult::Issued { token },
        Err(error) => StepResult::Rejected { error },
    }
}

fn maybe_issued(result: Result<Option<NavigationToken>, WebViewError>) -> StepResult {
    match result {
        Ok(Some(token)) => StepResult::Issued { token },
        Ok(None) => StepResult::Skipped,
        Err(error) => StepResult::Rejected { error },
    }
}

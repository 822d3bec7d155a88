//! Folds renderer lifecycle events into `NavigationState`.
//!
//! The adapter is the only writer of the navigation state outside the
//! session controller's synchronous error path. It drops events that
//! belong to a superseded navigation (older token) and, by default,
//! events from sub-frames.

use tracing::{debug, trace, warn};
use url::Url;

use crate::decision::{NavigationDecision, NavigationPolicy};
use crate::events::{FrameInfo, NavigationEnvelope, NavigationEvent, NavigationToken};
use crate::state::NavigationState;


/// Which frames drive the visible navigation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FramePolicy {
    #[default]
    MainFrameOnly,
    AllFrames,
}

/// What happened to an envelope handed to [`EventAdapter::fold`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldOutcome {
    Applied,
    /// Stamped with a token older than the current navigation.
    Stale {
        current: NavigationToken,
        received: NavigationToken,
    },
    /// Stamped with a token that was never issued.
    Unknown {
        current: NavigationToken,
        received: NavigationToken,
    },
    /// Came from a sub-frame while the policy only follows the main frame.
    SubFrame,
}

impl FoldOutcome {
    pub fn is_applied(self) -> bool {
        matches!(self, FoldOutcome::Applied)
    }
}

pub struct EventAdapter {
    state: NavigationState,
    current: NavigationToken,
    frames: FramePolicy,
    policy: NavigationPolicy,
}

impl EventAdapter {
    pub fn new(policy: NavigationPolicy) -> Self {
        Self {
            state: NavigationState::initial(),
            current: NavigationToken::INITIAL,
            frames: FramePolicy::default(),
            policy,
        }
    }

    pub fn with_frame_policy(mut self, frames: FramePolicy) -> Self {
        self.frames = frames;
        self
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn current_token(&self) -> NavigationToken {
        self.current
    }

    pub fn frame_policy(&self) -> FramePolicy {
        self.frames
    }

    pub fn policy(&self) -> &NavigationPolicy {
        &self.policy
    }

    /// Make `token` the navigation whose events are accepted.
    ///
    /// Tokens only move forward; an older token is ignored.
    pub fn begin(&mut self, token: NavigationToken) {
        if token < self.current {
            warn!(%token, current = %self.current, "ignoring out-of-order navigation token");
            return;
        }
        debug!(%token, "navigation token issued");
        self.current = token;
    }

    /// Allow/deny a navigation the renderer is about to perform.
    ///
    /// Sub-frame navigations are checked too: blocked content stays blocked
    /// inside iframes.
    pub fn decide_policy(&self, url: &Url, frame: &FrameInfo) -> NavigationDecision {
        trace!(url = %url, main_frame = frame.is_main_frame, "policy check");
        self.policy.decide(url)
    }

    /// Record a failure detected before anything reached the renderer.
    pub(crate) fn fail_locally(&mut self, error: navkit_common::WebViewError) {
        self.state = self.state.fail_navigation(error);
    }

    /// Settle an in-flight load the user stopped.
    pub(crate) fn cancel_locally(&mut self) {
        self.state = self.state.cancel_navigation();
    }

    /// Apply one envelope to the state.
    pub fn fold(&mut self, envelope: &NavigationEnvelope) -> FoldOutcome {
        if envelope.token < self.current {
            debug!(
                received = %envelope.token,
                current = %self.current,
                "dropping event from superseded navigation"
            );
            return FoldOutcome::Stale {
                current: self.current,
                received: envelope.token,
            };
        }
        if envelope.token > self.current {
            warn!(
                received = %envelope.token,
                current = %self.current,
                "dropping event with unissued navigation token"
            );
            return FoldOutcome::Unknown {
                current: self.current,
                received: envelope.token,
            };
        }
        if !envelope.frame.is_main_frame && self.frames == FramePolicy::MainFrameOnly {
            trace!("ignoring sub-frame event");
            return FoldOutcome::SubFrame;
        }

        self.state = Self::transition(&self.state, &envelope.event);
        debug_assert!(self.state.is_consistent(), "{:?}", self.state);
        FoldOutcome::Applied
    }

    /// Fold a batch of envelopes in order, returning how many were applied.
    pub fn fold_all<'a, I>(&mut self, envelopes: I) -> usize
    where
        I: IntoIterator<Item = &'a NavigationEnvelope>,
    {
        envelopes
            .into_iter()
            .filter(|envelope| self.fold(envelope).is_applied())
            .count()
    }

    fn transition(state: &NavigationState, event: &NavigationEvent) -> NavigationState {
        match event {
            NavigationEvent::Started { url } => {
                debug!(url = %url, "navigation started");
                state.start_navigation()
            }
            NavigationEvent::Committed { url } => state.commit_navigation(url.clone()),
            NavigationEvent::Finished {
                url,
                title,
                can_go_back,
                can_go_forward,
            } => {
                debug!(url = %url, title = %title, "navigation finished");
                state.finish_navigation(url.clone(), title.clone(), *can_go_back, *can_go_forward)
            }
            NavigationEvent::Failed { error } => {
                debug!(error = %error, "navigation failed");
                state.fail_navigation(error.clone())
            }
            NavigationEvent::Redirected { from, to } => {
                debug!(from = %from, to = %to, "server redirect");
                state.redirect_navigation(to.clone())
            }
            NavigationEvent::TitleChanged { title } => state.retitle(title.clone()),
            NavigationEvent::Progress { progress } => state.update_progress(*progress),
        }
    }
}

impl Default for EventAdapter {
    fn default() -> Self {
        Self::new(NavigationPolicy::default())
    }
}

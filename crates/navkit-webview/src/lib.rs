//! Navigation-state synchronization for an embedded WebView.
//!
//! Provides:
//! - The navigation state value and its pure transitions
//! - URL validation, address bar resolution and the domain blocklist
//! - Folding of renderer lifecycle events, with stale-load filtering
//! - A session controller owning history and bookmarks
//! - A JavaScript message bridge (page <-> host)
//! - The `WebRenderer` seam, with a headless recording implementation and
//!   an optional `wry` backend
//! - Bookmark persistence

pub mod adapter;
pub mod bridge;
pub mod decision;
pub mod events;
pub mod renderer;
pub mod session;
pub mod state;
pub mod store;
pub mod url_utils;

pub use adapter::{EventAdapter, FoldOutcome, FramePolicy};
pub use bridge::{DispatchOutcome, JavaScriptMessage, MessageBody, MessageRouter};
pub use decision::{NavigationDecision, NavigationPolicy};
pub use events::{
    event_channel, EventReceiver, EventSender, FrameInfo, NavigationEnvelope, NavigationEvent,
    NavigationToken, SecurityOrigin,
};
pub use renderer::{RecordingRenderer, RendererCommand, WebRenderer};
pub use session::{Bookmark, SessionController, SessionEvent};
pub use state::NavigationState;

//! Session controller: the single owner of one WebView's navigation state.
//!
//! A `SessionController` turns user requests into renderer commands, keeps
//! the history and bookmark collections, and folds renderer events back
//! into the navigation state. Observers read snapshots through accessors
//! or subscribe to [`SessionEvent`]s.

mod bookmarks;
mod manager;
mod navigation;
mod types;

#[cfg(test)]
mod tests;

pub use manager::SessionController;
pub use types::{Bookmark, SessionEvent, DEFAULT_SCRIPT_TIMEOUT};

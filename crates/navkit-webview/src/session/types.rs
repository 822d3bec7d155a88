//! Session value types.

use std::time::Duration;

use chrono::{DateTime, Utc};
use navkit_common::BookmarkId;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::state::NavigationState;

/// Used when no `[scripting]` configuration is supplied.
pub const DEFAULT_SCRIPT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Buffered session events per subscriber before it starts lagging.
pub(crate) const EVENT_BUS_CAPACITY: usize = 64;

/// A saved page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: BookmarkId,
    pub url: Url,
    pub title: String,
    pub date_added: DateTime<Utc>,
}

impl Bookmark {
    pub fn new(url: Url, title: impl Into<String>) -> Self {
        Self {
            id: BookmarkId::new(),
            url,
            title: title.into(),
            date_added: Utc::now(),
        }
    }
}

/// Change notifications published by the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The navigation state changed; carries the new snapshot.
    StateChanged(NavigationState),
    HistoryChanged { len: usize },
    BookmarksChanged { count: usize },
}

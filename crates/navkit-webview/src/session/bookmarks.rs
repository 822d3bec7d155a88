//! Bookmark and history maintenance.

use navkit_common::BookmarkId;
use tracing::{debug, info};
use url::Url;

use crate::renderer::WebRenderer;

use super::manager::SessionController;
use super::types::{Bookmark, SessionEvent};

const UNTITLED: &str = "Untitled";

impl<R: WebRenderer> SessionController<R> {
    /// Bookmark the current page.
    ///
    /// Returns the new bookmark's id, or `None` when no page is loaded or
    /// the URL is already bookmarked.
    pub fn add_bookmark(&mut self) -> Option<BookmarkId> {
        let url = self.state().current_url()?.clone();
        if self.is_bookmarked(&url) {
            debug!(url = %url, "already bookmarked");
            return None;
        }

        let bookmark = Bookmark::new(url.clone(), bookmark_title(self.state().title(), &url));
        let id = bookmark.id.clone();
        info!(url = %url, title = %bookmark.title, "bookmark added");
        self.bookmarks.push(bookmark);
        self.publish_bookmarks();
        Some(id)
    }

    /// Remove the bookmark with `id`. Returns whether one was removed.
    pub fn remove_bookmark(&mut self, id: &BookmarkId) -> bool {
        let before = self.bookmarks.len();
        self.bookmarks.retain(|bookmark| &bookmark.id != id);
        let removed = self.bookmarks.len() != before;
        if removed {
            debug!(%id, "bookmark removed");
            self.publish_bookmarks();
        }
        removed
    }

    pub fn is_bookmarked(&self, url: &Url) -> bool {
        self.bookmarks.iter().any(|bookmark| &bookmark.url == url)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        debug!("history cleared");
        self.events.publish(SessionEvent::HistoryChanged { len: 0 });
    }

    fn publish_bookmarks(&self) {
        self.events.publish(SessionEvent::BookmarksChanged {
            count: self.bookmarks.len(),
        });
    }
}

/// Page title, else the host, else a placeholder.
fn bookmark_title(title: &str, url: &Url) -> String {
    if !title.is_empty() {
        return title.to_string();
    }
    url.host_str().unwrap_or(UNTITLED).to_string()
}

//! Bookmark persistence as a JSON document.

use std::path::{Path, PathBuf};

use navkit_common::{NavkitError, Result};
use tracing::{debug, info};

use crate::session::Bookmark;

/// File name under the navkit data directory.
pub const BOOKMARKS_FILE: &str = "bookmarks.json";

/// `<data_dir>/navkit/bookmarks.json`, or `None` if the platform has no
/// data directory.
pub fn default_bookmarks_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("navkit").join(BOOKMARKS_FILE))
}

/// Read bookmarks from `path`. A missing file is an empty collection.
pub fn load_bookmarks(path: &Path) -> Result<Vec<Bookmark>> {
    if !path.exists() {
        debug!(path = %path.display(), "no bookmark file yet");
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path)?;
    let bookmarks: Vec<Bookmark> = serde_json::from_str(&content).map_err(|e| {
        NavkitError::Persistence(format!("failed to parse {}: {e}", path.display()))
    })?;

    info!(path = %path.display(), count = bookmarks.len(), "loaded bookmarks");
    Ok(bookmarks)
}

/// Write `bookmarks` to `path`, creating parent directories.
pub fn save_bookmarks(path: &Path, bookmarks: &[Bookmark]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(bookmarks)
        .map_err(|e| NavkitError::Persistence(format!("failed to encode bookmarks: {e}")))?;
    std::fs::write(path, json)?;

    info!(path = %path.display(), count = bookmarks.len(), "saved bookmarks");
    Ok(())
}

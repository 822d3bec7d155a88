pub mod errors;
pub mod events;
pub mod id;
pub mod types;

pub use errors::{ConfigError, NavkitError, WebViewError};
pub use events::EventBus;
pub use id::{new_id, BookmarkId};
pub use types::SearchEngine;

pub type Result<T> = std::result::Result<T, NavkitError>;

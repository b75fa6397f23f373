//! Chat sessions: data model, persistence port and lifecycle management

pub mod manager;
pub mod store;
pub mod types;

pub use manager::ChatManager;
pub use store::{GUIDES_KEY, KeyValueStore, MemoryKvStore, SNAPSHOT_KEY, SqliteKvStore};
pub use types::{
    ChatSession, GREETING_MESSAGE_ID, Message, PREVIEW_MAX, Role, TITLE_MAX, derive_preview,
    derive_title, relative_time_label,
};

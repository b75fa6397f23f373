//! Session types

use chrono::{DateTime, Duration, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::i18n::{Language, translations};

/// Sentinel id of the seeded greeting message. The greeting is the only
/// message whose text may be rewritten after creation (on language change,
/// while it is still the session's sole message).
pub const GREETING_MESSAGE_ID: &str = "init";

/// Session titles are cut to this many characters (plus an ellipsis)
pub const TITLE_MAX: usize = 30;

/// Previews are cut to this many characters
pub const PREVIEW_MAX: usize = 40;

/// Who authored a message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
    System,
}

/// One chat message. Immutable once created; removed only when its whole
/// session is deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a user message
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    /// Create a model message
    pub fn model(text: impl Into<String>) -> Self {
        Self::new(Role::Model, text)
    }

    /// The localized greeting that seeds every new session
    pub fn greeting(lang: Language) -> Self {
        Self {
            id: GREETING_MESSAGE_ID.to_string(),
            role: Role::Model,
            text: translations(lang).ask_anything.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// A conversation thread
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: String,
    /// Derived from the first user message, then fixed
    pub title: String,
    /// Short excerpt of the most recent message
    pub preview: String,
    pub updated_at: DateTime<Utc>,
    pub messages: Vec<Message>,
}

impl ChatSession {
    /// Create a session seeded with the localized greeting
    pub fn new(lang: Language) -> Self {
        let t = translations(lang);
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: t.new_chat.to_string(),
            preview: t.ask_anything.to_string(),
            updated_at: Utc::now(),
            messages: vec![Message::greeting(lang)],
        }
    }

    /// True while the session holds nothing but the unanswered greeting
    pub fn is_unanswered_greeting(&self) -> bool {
        self.messages.len() == 1 && self.messages[0].role == Role::Model
    }
}

/// First `max` characters of `s`. Counts chars, not grapheme clusters,
/// which is fine for one-line display use.
fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Session title for a first user message: 30 chars plus an ellipsis when cut
pub fn derive_title(text: &str) -> String {
    let mut title = truncate_chars(text, TITLE_MAX);
    if text.chars().count() > TITLE_MAX {
        title.push_str("...");
    }
    title
}

/// Session preview: first 40 chars, no ellipsis
pub fn derive_preview(text: &str) -> String {
    truncate_chars(text, PREVIEW_MAX)
}

/// Display label for a session's last activity: clock time for today, a
/// localized "Yesterday" for the previous calendar day, a date otherwise.
pub fn relative_time_label(updated_at: DateTime<Utc>, now: DateTime<Local>, lang: Language) -> String {
    let local = updated_at.with_timezone(&Local);
    let today = now.date_naive();

    if local.date_naive() == today {
        return local.format("%H:%M").to_string();
    }
    if local.date_naive() == today - Duration::days(1) {
        return translations(lang).yesterday.to_string();
    }
    local.format("%Y-%m-%d").to_string()
}

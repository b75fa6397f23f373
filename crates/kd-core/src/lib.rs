//! kd-core: Kissan Dost Core Library
//!
//! Chat session management, Gemini API access, localization tables,
//! advisory datasets and the offline library for the Kissan Dost
//! agricultural assistant.

pub mod advisory;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod guides;
pub mod i18n;
pub mod llm;
pub mod session;

pub use config::{AppConfig, Config, LlmConfig, StorageConfig};
pub use diagnostic::{DiagnosticResult, parse_diagnostic};
pub use error::{Error, Result};
pub use guides::{GuideLibrary, OfflineGuide};
pub use i18n::{Language, Localized, Translations, translations};
pub use llm::{GeminiClient, ReplyGenerator};
pub use session::{ChatManager, ChatSession, KeyValueStore, Message, Role, SqliteKvStore};

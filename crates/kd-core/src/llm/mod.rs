//! Gemini API integration
//!
//! The session store talks to the model through the [`ReplyGenerator`] trait
//! so tests can substitute a canned collaborator.

pub mod client;
pub mod types;

pub use client::GeminiClient;
pub use types::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, InlineData, Part,
    strip_data_url,
};

use async_trait::async_trait;

use crate::Result;
use crate::i18n::Language;
use crate::session::Message;

/// Remote reply-generation collaborator: an opaque asynchronous
/// text-completion function with no latency bound.
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    /// Generate a reply to `new_message` given the conversation so far.
    async fn generate_reply(
        &self,
        history: &[Message],
        new_message: &str,
        language: Language,
    ) -> Result<String>;
}

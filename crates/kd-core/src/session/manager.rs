//! Chat session lifecycle
//!
//! `ChatManager` owns the conversation threads, tracks the active one, keeps
//! the collection synchronized with durable storage, and mediates message
//! exchange with the reply-generation collaborator. Single-threaded with
//! cooperative suspension: the only await point is the remote call, and the
//! `sending` flag keeps it to one outstanding request per manager.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::i18n::{Language, translations};
use crate::llm::ReplyGenerator;
use crate::session::store::{KeyValueStore, SNAPSHOT_KEY};
use crate::session::types::{ChatSession, Message, derive_preview, derive_title};

/// Session store and remote-call mediator
pub struct ChatManager {
    store: Arc<dyn KeyValueStore>,
    generator: Arc<dyn ReplyGenerator>,
    language: Language,
    /// Most-recent-first
    sessions: Vec<ChatSession>,
    active_id: Option<String>,
    /// At most one in-flight remote call, across all sessions
    sending: bool,
}

impl ChatManager {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        generator: Arc<dyn ReplyGenerator>,
        language: Language,
    ) -> Self {
        Self {
            store,
            generator,
            language,
            sessions: Vec::new(),
            active_id: None,
            sending: false,
        }
    }

    /// Hydrate from the persisted snapshot, or start with one fresh session.
    ///
    /// Never fails outward: a missing or unparsable snapshot means "no
    /// snapshot".
    pub fn initialize(&mut self) {
        match self.store.get(SNAPSHOT_KEY) {
            Ok(Some(blob)) => match serde_json::from_str::<Vec<ChatSession>>(&blob) {
                Ok(sessions) if !sessions.is_empty() => {
                    info!("Restored {} chat sessions", sessions.len());
                    self.active_id = Some(sessions[0].id.clone());
                    self.sessions = sessions;
                    return;
                }
                Ok(_) => debug!("Session snapshot is empty"),
                Err(e) => warn!("Failed to parse session snapshot: {}", e),
            },
            Ok(None) => debug!("No session snapshot found"),
            Err(e) => warn!("Failed to load session snapshot: {}", e),
        }

        self.create_session();
    }

    /// Create a fresh session, insert it at the front and make it active
    pub fn create_session(&mut self) {
        let session = ChatSession::new(self.language);
        info!("Creating new chat session: {}", session.id);
        self.active_id = Some(session.id.clone());
        self.sessions.insert(0, session);
        self.persist();
    }

    /// Remove a session. Unknown ids are a no-op for the removal, but the
    /// active-session invariant is re-checked regardless: if the active
    /// session is gone the front-most remaining one takes over, and an empty
    /// collection is replaced with a fresh session.
    pub fn delete_session(&mut self, id: &str) {
        let before = self.sessions.len();
        self.sessions.retain(|s| s.id != id);
        if self.sessions.len() < before {
            info!("Deleted chat session: {}", id);
        }

        let active_exists = match self.active_id.as_deref() {
            Some(active) => self.sessions.iter().any(|s| s.id == active),
            None => false,
        };

        if !active_exists {
            match self.sessions.first() {
                Some(front) => self.active_id = Some(front.id.clone()),
                None => {
                    // create_session persists the replacement
                    self.create_session();
                    return;
                }
            }
        }

        self.persist();
    }

    /// Make the session with `id` active; unknown ids are a no-op
    pub fn select_session(&mut self, id: &str) {
        if self.sessions.iter().any(|s| s.id == id) {
            self.active_id = Some(id.to_string());
        }
    }

    /// Send a user message in the active session and await the reply.
    ///
    /// No-op for blank input, while a send is in flight, or without an
    /// active session. The user message is applied optimistically before the
    /// remote call; a failed call leaves it in place with no reply and no
    /// rollback. The reply is routed by the session id captured here, never
    /// by re-reading the active pointer after the await.
    pub async fn send_message(&mut self, text: &str) {
        if text.trim().is_empty() || self.sending {
            return;
        }
        let Some(active_id) = self.active_id.clone() else {
            return;
        };
        let Some(session) = self.sessions.iter_mut().find(|s| s.id == active_id) else {
            return;
        };

        // Optimistic update
        let first_user_message = session.messages.len() <= 1;
        session.messages.push(Message::user(text));
        if first_user_message {
            session.title = derive_title(text);
        }
        session.preview = derive_preview(text);
        session.updated_at = Utc::now();
        let history = session.messages.clone();
        self.persist();

        self.sending = true;
        let result = self
            .generator
            .generate_reply(&history, text, self.language)
            .await;
        self.sending = false;

        match result {
            Ok(reply) => match self.sessions.iter_mut().find(|s| s.id == active_id) {
                Some(session) => {
                    session.preview = derive_preview(&reply);
                    session.updated_at = Utc::now();
                    session.messages.push(Message::model(reply));
                    self.persist();
                }
                None => warn!("Dropping reply for deleted session: {}", active_id),
            },
            Err(e) => {
                // Chat failures are absorbed: the optimistic message stays,
                // no error reaches the user
                error!("Reply generation failed: {}", e);
            }
        }
    }

    /// Switch the interface language. The active session's seeded greeting is
    /// re-localized, but only while it is still the sole, unanswered message;
    /// no other session or message is touched.
    pub fn set_language(&mut self, lang: Language) {
        self.language = lang;

        let Some(active_id) = self.active_id.as_deref() else {
            return;
        };
        let Some(session) = self.sessions.iter_mut().find(|s| s.id == active_id) else {
            return;
        };

        if session.is_unanswered_greeting() {
            session.messages[0].text = translations(lang).ask_anything.to_string();
            self.persist();
        }
    }

    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    pub fn active_session(&self) -> Option<&ChatSession> {
        let active_id = self.active_id.as_deref()?;
        self.sessions.iter().find(|s| s.id == active_id)
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Write the full snapshot. An empty collection is never persisted, so a
    /// transient construction-order race cannot erase a good snapshot.
    fn persist(&self) {
        if self.sessions.is_empty() {
            return;
        }
        match serde_json::to_string(&self.sessions) {
            Ok(blob) => {
                if let Err(e) = self.store.set(SNAPSHOT_KEY, &blob) {
                    warn!("Failed to persist session snapshot: {}", e);
                }
            }
            Err(e) => warn!("Failed to serialize session snapshot: {}", e),
        }
    }
}

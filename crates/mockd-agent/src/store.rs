//! In-memory session and message tables.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::types::{
    CreateSessionRequest, Message, MessagePart, MessageRole, MessageTime, Session, SessionPath,
    SessionStatus, SessionTime, UpdateSessionRequest,
};

/// Working directory reported for every session.
const SESSION_CWD: &str = "/test";

/// Title applied when a create request omits one.
const DEFAULT_TITLE: &str = "New Session";

/// Prefix applied to synthesized assistant replies.
const REPLY_PREFIX: &str = "Mock response to: ";

/// Process-lifetime session/message tables.
///
/// A single lock guards both tables and the id counter, so every
/// read-modify-write sequence is atomic on a multi-threaded runtime. No
/// await point occurs while the lock is held.
#[derive(Debug, Default)]
pub struct SessionStore {
    inner: RwLock<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    sessions: HashMap<String, Session>,
    messages: HashMap<String, Vec<Message>>,
    /// Session ids in creation order; listings follow this.
    order: Vec<String>,
    counter: u64,
}

impl Tables {
    fn next_id(&mut self, prefix: &str) -> String {
        self.counter += 1;
        format!(
            "{}-{}-{}",
            prefix,
            Utc::now().timestamp_millis(),
            self.counter
        )
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session together with its empty message list.
    pub async fn create_session(&self, request: CreateSessionRequest) -> Session {
        let mut tables = self.inner.write().await;
        let id = tables.next_id("session");
        let session = Session {
            id: id.clone(),
            title: request
                .title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            status: SessionStatus::Idle,
            time: SessionTime {
                created: Utc::now().timestamp_millis(),
                archived: None,
            },
            path: SessionPath {
                cwd: SESSION_CWD.to_string(),
            },
            parent_id: request.parent_id,
        };
        tables.sessions.insert(id.clone(), session.clone());
        tables.messages.insert(id.clone(), Vec::new());
        tables.order.push(id);
        session
    }

    /// All sessions in creation order.
    pub async fn list_sessions(&self) -> Vec<Session> {
        let tables = self.inner.read().await;
        tables
            .order
            .iter()
            .filter_map(|id| tables.sessions.get(id).cloned())
            .collect()
    }

    pub async fn get_session(&self, id: &str) -> Option<Session> {
        self.inner.read().await.sessions.get(id).cloned()
    }

    /// Apply a title/archival update. Setting an archival timestamp also
    /// moves status to archived; there is no reverse transition.
    pub async fn update_session(
        &self,
        id: &str,
        update: UpdateSessionRequest,
    ) -> Option<Session> {
        let mut tables = self.inner.write().await;
        let session = tables.sessions.get_mut(id)?;
        if let Some(title) = update.title.filter(|t| !t.is_empty()) {
            session.title = title;
        }
        if let Some(archived) = update.time.and_then(|t| t.archived) {
            session.time.archived = Some(archived);
            session.status = SessionStatus::Archived;
        }
        Some(session.clone())
    }

    /// Remove a session and its whole message list together. Unknown ids
    /// are a no-op.
    pub async fn delete_session(&self, id: &str) {
        let mut tables = self.inner.write().await;
        tables.sessions.remove(id);
        tables.messages.remove(id);
        tables.order.retain(|existing| existing != id);
    }

    /// Messages for a session, empty for unknown ids.
    pub async fn list_messages(&self, session_id: &str) -> Vec<Message> {
        self.inner
            .read()
            .await
            .messages
            .get(session_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Store the submitted user message plus a synthesized assistant reply
    /// in one critical section. Returns the user message only; the reply is
    /// observable through `list_messages`. `None` when the session does not
    /// exist, so no message can outlive its session.
    pub async fn append_message(&self, session_id: &str, content: &str) -> Option<Message> {
        let mut tables = self.inner.write().await;
        if !tables.sessions.contains_key(session_id) {
            return None;
        }

        let user_id = tables.next_id("msg");
        let assistant_id = tables.next_id("msg");
        let now = Utc::now().timestamp_millis();

        let user_message = Message {
            id: user_id,
            session_id: session_id.to_string(),
            role: MessageRole::User,
            parts: vec![MessagePart::text(content)],
            time: MessageTime { created: now },
        };
        let assistant_message = Message {
            id: assistant_id,
            session_id: session_id.to_string(),
            role: MessageRole::Assistant,
            parts: vec![MessagePart::text(format!("{REPLY_PREFIX}{content}"))],
            time: MessageTime { created: now },
        };

        let list = tables.messages.entry(session_id.to_string()).or_default();
        list.push(user_message.clone());
        list.push(assistant_message);
        Some(user_message)
    }

    /// Status by id for every live session.
    pub async fn status_map(&self) -> HashMap<String, SessionStatus> {
        self.inner
            .read()
            .await
            .sessions
            .iter()
            .map(|(id, session)| (id.clone(), session.status))
            .collect()
    }
}

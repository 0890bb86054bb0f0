//! Session and message wire types.

use serde::{Deserialize, Serialize};

/// A conversational context owning an ordered message list.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: String,
    pub title: String,
    pub status: SessionStatus,
    pub time: SessionTime,
    pub path: SessionPath,
    /// Serialized as an explicit `null` when absent.
    #[serde(rename = "parentID")]
    pub parent_id: Option<String>,
}

/// Lifecycle status. The only transition is idle -> archived; archived is
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Idle,
    Archived,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionTime {
    /// Unix millis.
    pub created: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionPath {
    pub cwd: String,
}

/// A stored message. Appended on send, never mutated, removed only together
/// with its session.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub id: String,
    #[serde(rename = "sessionID")]
    pub session_id: String,
    pub role: MessageRole,
    pub parts: Vec<MessagePart>,
    pub time: MessageTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// A tagged content fragment; always a text fragment here.
#[derive(Debug, Clone, Serialize)]
pub struct MessagePart {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

impl MessagePart {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text",
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageTime {
    /// Unix millis.
    pub created: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    pub title: Option<String>,
    #[serde(rename = "parentID")]
    pub parent_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateSessionRequest {
    pub title: Option<String>,
    pub time: Option<UpdateSessionTime>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateSessionTime {
    pub archived: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SendMessageRequest {
    pub content: Option<String>,
}

/// Static project descriptor for `/project`.
#[derive(Debug, Serialize)]
pub struct ProjectInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub worktree: &'static str,
}

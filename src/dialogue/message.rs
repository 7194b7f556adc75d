//! Chat transcript messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::{Meeting, Reflection};

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

/// Structured payload a message references, for UI use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessageMeta {
    /// Meetings listed in the message body, in display order.
    Meetings { meetings: Vec<Meeting> },
    /// Reflections listed in the message body, in display order.
    Reflections { reflections: Vec<Reflection> },
}

/// One rendered utterance in the transcript.
///
/// Immutable once created. The engine creates bot messages; the caller
/// creates user messages and owns the history lifecycle. Ids are UUIDv7,
/// so sorting by id preserves creation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub body: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<MessageMeta>,
}

impl ChatMessage {
    /// Create a bot message.
    pub fn bot(body: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            body: body.into(),
            sender: Sender::Bot,
            timestamp: Utc::now(),
            meta: None,
        }
    }

    /// Create a bot message carrying structured metadata.
    pub fn bot_with_meta(body: impl Into<String>, meta: MessageMeta) -> Self {
        Self {
            meta: Some(meta),
            ..Self::bot(body)
        }
    }

    /// Create a user message.
    pub fn user(body: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            body: body.into(),
            sender: Sender::User,
            timestamp: Utc::now(),
            meta: None,
        }
    }
}

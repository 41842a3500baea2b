//! Conversation message types.

use crate::topic::TopicKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

/// Represents the author of a message in a conversation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MessageRole {
    /// Message typed by the user.
    User,
    /// Reply shown by the support assistant.
    Assistant,
}

/// A single immutable message in a session.
///
/// Messages are only ever appended; nothing mutates one after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier (UUID format)
    pub id: String,
    /// The text as displayed.
    pub text: String,
    /// Who wrote the message.
    pub role: MessageRole,
    /// When the message was created.
    pub created_at: DateTime<Utc>,
    /// Suggested resource for assistant messages. Never sent back to the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_key: Option<TopicKey>,
}

impl Message {
    fn new(role: MessageRole, text: impl Into<String>, resource_key: Option<TopicKey>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            role,
            created_at: Utc::now(),
            resource_key,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageRole::User, text, None)
    }

    pub fn assistant(text: impl Into<String>, resource_key: Option<TopicKey>) -> Self {
        Self::new(MessageRole::Assistant, text, resource_key)
    }

    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }

    pub fn is_assistant(&self) -> bool {
        self.role == MessageRole::Assistant
    }
}

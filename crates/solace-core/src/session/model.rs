//! Session domain model.

use super::message::Message;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title given to every new session until the first user message arrives.
pub const DEFAULT_SESSION_TITLE: &str = "New Chat";

/// Assistant greeting seeded into every new session.
pub const GREETING_TEXT: &str = "Hi, I'm here to listen. How are you feeling today? \
You can tell me what's on your mind, or type \"help\" to see what I can do.";

/// One independent, named conversation thread.
///
/// `messages` is chronological and append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier (UUID format)
    pub id: String,
    /// Human-readable session title
    pub title: String,
    /// Set once the user renamed the session; stops title auto-derivation.
    #[serde(default)]
    pub title_locked: bool,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// Last time a message was appended.
    pub last_active_at: DateTime<Utc>,
    /// Ordered conversation history.
    pub messages: Vec<Message>,
}

impl Session {
    /// Creates a session seeded with the assistant greeting.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: DEFAULT_SESSION_TITLE.to_string(),
            title_locked: false,
            created_at: now,
            last_active_at: now,
            messages: vec![Message::assistant(GREETING_TEXT, None)],
        }
    }

    /// The most recent assistant message, if any.
    pub fn last_assistant_message(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|message| message.is_assistant())
    }

    /// The first message the user wrote, if any.
    pub fn first_user_message(&self) -> Option<&Message> {
        self.messages.iter().find(|message| message.is_user())
    }

    /// Whether the title is still the auto-assigned default.
    pub fn has_default_title(&self) -> bool {
        !self.title_locked && self.title == DEFAULT_SESSION_TITLE
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a title from a user message: whitespace collapsed, cut to
/// `max_chars` characters with a trailing ellipsis when shortened.
pub fn derive_title(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return DEFAULT_SESSION_TITLE.to_string();
    }
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }
    let truncated: String = collapsed.chars().take(max_chars).collect();
    format!("{}...", truncated.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_seeded() {
        let session = Session::new();
        assert_eq!(session.title, DEFAULT_SESSION_TITLE);
        assert_eq!(session.messages.len(), 1);
        assert!(session.messages[0].is_assistant());
        assert_eq!(session.messages[0].text, GREETING_TEXT);
        assert!(session.has_default_title());
        assert!(session.first_user_message().is_none());
    }

    #[test]
    fn test_derive_title() {
        assert_eq!(derive_title("  short   one ", 30), "short one");
        assert_eq!(
            derive_title("I have been feeling anxious about my exams lately", 30),
            "I have been feeling anxious ab..."
        );
        assert_eq!(derive_title("   ", 30), DEFAULT_SESSION_TITLE);
        // counts characters, not bytes
        assert_eq!(derive_title("ééééé", 3), "ééé...");
    }
}

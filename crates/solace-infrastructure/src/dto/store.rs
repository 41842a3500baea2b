//! Persisted representation of the conversation store.
//!
//! The DTOs are deliberately loose: roles and topic keys stay strings,
//! timestamps stay text, and both snake_case and the camelCase names written
//! by the earlier web front end are accepted. Conversion into the domain
//! snapshot is where unknown values get normalized or dropped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use solace_core::TopicKey;
use solace_core::session::{DEFAULT_SESSION_TITLE, Message, MessageRole, Session, StoreSnapshot};
use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;
use uuid::Uuid;

/// Schema version written by this build.
pub const CURRENT_STORE_VERSION: &str = "1.0.0";

fn legacy_version() -> String {
    "0.0.0".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreDto {
    /// Missing in stores written before versioning.
    #[serde(default = "legacy_version")]
    pub version: String,
    #[serde(default)]
    pub sessions: SessionsDto,
    #[serde(default, alias = "activeSessionId")]
    pub active_session_id: Option<String>,
}

/// Sessions are a list today; legacy stores kept an id → session map.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SessionsDto {
    List(Vec<SessionDto>),
    Map(BTreeMap<String, SessionDto>),
}

impl Default for SessionsDto {
    fn default() -> Self {
        SessionsDto::List(Vec::new())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDto {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, alias = "titleLocked")]
    pub title_locked: bool,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
    #[serde(default, alias = "lastActive", alias = "lastActiveAt")]
    pub last_active_at: Option<String>,
    #[serde(default)]
    pub messages: Vec<MessageDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDto {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(alias = "content")]
    pub text: String,
    #[serde(alias = "sender")]
    pub role: String,
    #[serde(default, alias = "createdAt", alias = "timestamp")]
    pub created_at: Option<String>,
    #[serde(default, alias = "resourceKey", skip_serializing_if = "Option::is_none")]
    pub resource_key: Option<String>,
}

fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|value| DateTime::parse_from_rfc3339(value).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_role(raw: &str) -> Option<MessageRole> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "bot" => Some(MessageRole::Assistant),
        other => MessageRole::from_str(other).ok(),
    }
}

impl MessageDto {
    fn from_domain(message: &Message) -> Self {
        Self {
            id: Some(message.id.clone()),
            text: message.text.clone(),
            role: message.role.to_string(),
            created_at: Some(message.created_at.to_rfc3339()),
            resource_key: message.resource_key.map(|key| key.to_string()),
        }
    }

    /// Returns `None` when the role is unknown.
    fn into_domain(self, fallback_time: DateTime<Utc>) -> Option<Message> {
        let Some(role) = parse_role(&self.role) else {
            tracing::warn!("[StoreDto] Dropping message with unknown role '{}'", self.role);
            return None;
        };

        let resource_key = match self.resource_key.as_deref() {
            Some(raw) => match TopicKey::from_str(raw) {
                Ok(key) => Some(key),
                Err(_) => {
                    tracing::debug!("[StoreDto] Ignoring unknown resource key '{}'", raw);
                    None
                }
            },
            None => None,
        };

        Some(Message {
            id: self.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            text: self.text,
            role,
            created_at: parse_timestamp(self.created_at.as_deref()).unwrap_or(fallback_time),
            resource_key,
        })
    }
}

impl SessionDto {
    fn from_domain(session: &Session) -> Self {
        Self {
            id: Some(session.id.clone()),
            title: Some(session.title.clone()),
            title_locked: session.title_locked,
            created_at: Some(session.created_at.to_rfc3339()),
            last_active_at: Some(session.last_active_at.to_rfc3339()),
            messages: session.messages.iter().map(MessageDto::from_domain).collect(),
        }
    }

    fn into_domain(self, key: Option<String>, seen_messages: &mut HashSet<String>) -> Session {
        let now = Utc::now();
        let created_at = parse_timestamp(self.created_at.as_deref());
        let last_active_at = parse_timestamp(self.last_active_at.as_deref());

        let mut messages: Vec<Message> = self
            .messages
            .into_iter()
            .filter_map(|dto| dto.into_domain(created_at.unwrap_or(now)))
            .collect();

        // A message id may only ever belong to one session
        for message in &mut messages {
            if !seen_messages.insert(message.id.clone()) {
                message.id = Uuid::new_v4().to_string();
                seen_messages.insert(message.id.clone());
            }
        }

        let created_at = created_at
            .or_else(|| messages.first().map(|m| m.created_at))
            .unwrap_or(now);
        let last_active_at = last_active_at
            .or_else(|| messages.last().map(|m| m.created_at))
            .unwrap_or(created_at);

        Session {
            id: self
                .id
                .or(key)
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            title: self
                .title
                .unwrap_or_else(|| DEFAULT_SESSION_TITLE.to_string()),
            title_locked: self.title_locked,
            created_at,
            last_active_at,
            messages,
        }
    }
}

impl StoreDto {
    pub fn from_snapshot(snapshot: &StoreSnapshot) -> Self {
        Self {
            version: CURRENT_STORE_VERSION.to_string(),
            sessions: SessionsDto::List(
                snapshot.sessions.iter().map(SessionDto::from_domain).collect(),
            ),
            active_session_id: Some(snapshot.active_session_id.clone()),
        }
    }

    /// Normalizes into a domain snapshot.
    ///
    /// Returns `None` when no session survives, which callers treat the same
    /// as a missing store.
    pub fn into_snapshot(self) -> Option<StoreSnapshot> {
        if self.version != CURRENT_STORE_VERSION {
            tracing::info!(
                "[StoreDto] Migrating store from version {} to {}",
                self.version,
                CURRENT_STORE_VERSION
            );
        }

        let mut seen_messages = HashSet::new();
        let mut sessions: Vec<Session> = match self.sessions {
            SessionsDto::List(list) => list
                .into_iter()
                .map(|dto| dto.into_domain(None, &mut seen_messages))
                .collect(),
            SessionsDto::Map(map) => {
                let mut sessions: Vec<Session> = map
                    .into_iter()
                    .map(|(key, dto)| dto.into_domain(Some(key), &mut seen_messages))
                    .collect();
                sessions.sort_by_key(|session| session.created_at);
                sessions
            }
        };

        let mut seen_sessions = HashSet::new();
        sessions.retain(|session| {
            let fresh = seen_sessions.insert(session.id.clone());
            if !fresh {
                tracing::warn!("[StoreDto] Dropping duplicate session '{}'", session.id);
            }
            fresh
        });

        let first_id = sessions.first()?.id.clone();
        let active_session_id = match self.active_session_id {
            Some(id) if sessions.iter().any(|session| session.id == id) => id,
            Some(id) => {
                tracing::warn!(
                    "[StoreDto] Active session '{}' not found, activating '{}'",
                    id,
                    first_id
                );
                first_id
            }
            None => first_id,
        };

        Some(StoreSnapshot {
            sessions,
            active_session_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_preserves_snapshot() {
        let mut snapshot = StoreSnapshot::with_default_session();
        let mut second = Session::new();
        second.title = "Exams".to_string();
        second.title_locked = true;
        second.messages.push(Message::user("I am anxious about exams"));
        second
            .messages
            .push(Message::assistant("That sounds hard.", Some(TopicKey::Anxiety)));
        snapshot.sessions.push(second);

        let json = serde_json::to_string(&StoreDto::from_snapshot(&snapshot)).unwrap();
        let restored = serde_json::from_str::<StoreDto>(&json)
            .unwrap()
            .into_snapshot()
            .unwrap();

        assert_eq!(restored, snapshot);
    }

    #[test]
    fn test_unknown_values_are_normalized() {
        let json = r#"{
            "version": "1.0.0",
            "sessions": [{
                "id": "s1",
                "title": "Chat",
                "messages": [
                    {"id": "m1", "text": "hi", "role": "user"},
                    {"id": "m2", "text": "beep", "role": "robot"},
                    {"id": "m3", "text": "hello", "role": "assistant", "resource_key": "astrology"},
                    {"id": "m4", "text": "try this", "role": "assistant", "resource_key": "breathing"}
                ]
            }],
            "active_session_id": "gone"
        }"#;
        let snapshot = serde_json::from_str::<StoreDto>(json)
            .unwrap()
            .into_snapshot()
            .unwrap();

        let session = &snapshot.sessions[0];
        let ids: Vec<&str> = session.messages.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m3", "m4"]);
        assert_eq!(session.messages[1].resource_key, None);
        assert_eq!(session.messages[2].resource_key, Some(TopicKey::Breathing));
        assert_eq!(snapshot.active_session_id, "s1");
        assert!(snapshot.is_consistent());
    }

    #[test]
    fn test_legacy_camel_case_map_store() {
        let json = r#"{
            "activeSessionId": "b",
            "sessions": {
                "b": {"title": "Second", "createdAt": "2024-02-01T10:00:00Z",
                      "messages": [{"content": "hey", "sender": "bot", "timestamp": "2024-02-01T10:00:00Z"}]},
                "a": {"title": "First", "createdAt": "2024-01-01T10:00:00Z",
                      "messages": [{"content": "yo", "sender": "user", "resourceKey": "music"}]}
            }
        }"#;
        let snapshot = serde_json::from_str::<StoreDto>(json)
            .unwrap()
            .into_snapshot()
            .unwrap();

        let titles: Vec<&str> = snapshot.sessions.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second"]);
        assert_eq!(snapshot.active_session_id, "b");
        assert_eq!(snapshot.sessions[1].messages[0].role, MessageRole::Assistant);
        assert_eq!(snapshot.sessions[0].messages[0].resource_key, Some(TopicKey::Music));
    }

    #[test]
    fn test_empty_store_is_none() {
        let dto: StoreDto = serde_json::from_str(r#"{"sessions": []}"#).unwrap();
        assert!(dto.into_snapshot().is_none());
    }

    #[test]
    fn test_duplicate_ids_are_repaired() {
        let json = r#"{"sessions": [
            {"id": "s1", "messages": [{"id": "m", "text": "a", "role": "user"}]},
            {"id": "s1", "messages": []},
            {"id": "s2", "messages": [{"id": "m", "text": "b", "role": "user"}]}
        ]}"#;
        let snapshot = serde_json::from_str::<StoreDto>(json)
            .unwrap()
            .into_snapshot()
            .unwrap();

        assert_eq!(snapshot.sessions.len(), 2);
        assert_ne!(
            snapshot.sessions[0].messages[0].id,
            snapshot.sessions[1].messages[0].id
        );
        assert!(snapshot.is_consistent());
    }
}

//! Whole-store snapshot, the unit of persistence.

use super::model::Session;
use serde::{Deserialize, Serialize};

/// Every session plus the active pointer.
///
/// `sessions` keeps creation order; that order is what "first remaining
/// session" refers to when the active session is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub sessions: Vec<Session>,
    pub active_session_id: String,
}

impl StoreSnapshot {
    /// A snapshot holding one fresh session, which is active.
    pub fn with_default_session() -> Self {
        let session = Session::new();
        Self {
            active_session_id: session.id.clone(),
            sessions: vec![session],
        }
    }

    pub fn find(&self, session_id: &str) -> Option<&Session> {
        self.sessions.iter().find(|session| session.id == session_id)
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.find(session_id).is_some()
    }

    /// True when the snapshot satisfies the store invariants: at least one
    /// session, unique ids, and an active id that exists.
    pub fn is_consistent(&self) -> bool {
        let mut ids: Vec<&str> = self.sessions.iter().map(|s| s.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        !self.sessions.is_empty()
            && ids.len() == self.sessions.len()
            && self.contains(&self.active_session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_snapshot_is_consistent() {
        let snapshot = StoreSnapshot::with_default_session();
        assert!(snapshot.is_consistent());
        assert_eq!(snapshot.sessions.len(), 1);
    }

    #[test]
    fn test_dangling_active_id_is_inconsistent() {
        let mut snapshot = StoreSnapshot::with_default_session();
        snapshot.active_session_id = "missing".to_string();
        assert!(!snapshot.is_consistent());
    }

    #[test]
    fn test_duplicate_ids_are_inconsistent() {
        let mut snapshot = StoreSnapshot::with_default_session();
        let copy = snapshot.sessions[0].clone();
        snapshot.sessions.push(copy);
        assert!(!snapshot.is_consistent());
    }
}

//! Multi-session conversation store.
//!
//! `SessionStore` owns the in-memory [`StoreSnapshot`] and writes the whole
//! snapshot through its [`StoreRepository`] after every mutation. Persistence
//! is fail-soft: the in-memory change is kept and the failure is handed back
//! inside the [`Mutation`] report.

use solace_core::session::{Message, Session, StoreRepository, StoreSnapshot, derive_title};
use std::collections::HashSet;
use std::sync::Arc;

/// Default maximum length of an auto-derived title, in characters.
pub const DEFAULT_TITLE_MAX_CHARS: usize = 30;

/// A save that did not reach the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistenceFailure {
    pub message: String,
}

/// Result of a store operation together with the outcome of persisting it.
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation<T> {
    pub value: T,
    /// `Some` when the change is in memory only.
    pub persistence: Option<PersistenceFailure>,
}

impl<T> Mutation<T> {
    fn new(value: T, persistence: Option<PersistenceFailure>) -> Self {
        Self { value, persistence }
    }

    /// A no-op: nothing changed, nothing was written.
    fn unchanged(value: T) -> Self {
        Self::new(value, None)
    }

    pub fn is_persisted(&self) -> bool {
        self.persistence.is_none()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Mutation<U> {
        Mutation::new(f(self.value), self.persistence)
    }
}

pub struct SessionStore {
    repository: Arc<dyn StoreRepository>,
    snapshot: StoreSnapshot,
    title_max_chars: usize,
}

impl SessionStore {
    /// Loads the persisted store.
    ///
    /// Missing, unreadable or empty data re-initializes the store with one
    /// fresh session, which is persisted right away.
    pub fn open(repository: Arc<dyn StoreRepository>) -> Self {
        let loaded = match repository.load() {
            Ok(Some(snapshot)) => Self::repair(snapshot),
            Ok(None) => {
                tracing::info!("[SessionStore] No persisted store, starting fresh");
                None
            }
            Err(e) => {
                tracing::warn!("[SessionStore] Failed to load store, starting fresh: {}", e);
                None
            }
        };

        match loaded {
            Some(snapshot) => {
                tracing::info!(
                    "[SessionStore] Loaded {} sessions (active: {})",
                    snapshot.sessions.len(),
                    snapshot.active_session_id
                );
                Self {
                    repository,
                    snapshot,
                    title_max_chars: DEFAULT_TITLE_MAX_CHARS,
                }
            }
            None => {
                let store = Self {
                    repository,
                    snapshot: StoreSnapshot::with_default_session(),
                    title_max_chars: DEFAULT_TITLE_MAX_CHARS,
                };
                // Logged inside persist; nobody to report to yet.
                let _ = store.persist();
                store
            }
        }
    }

    pub fn with_title_max_chars(mut self, title_max_chars: usize) -> Self {
        self.title_max_chars = title_max_chars.max(1);
        self
    }

    /// Restores the store invariants on a loaded snapshot. `None` if nothing
    /// usable is left.
    fn repair(mut snapshot: StoreSnapshot) -> Option<StoreSnapshot> {
        if snapshot.is_consistent() {
            return Some(snapshot);
        }

        let mut seen = HashSet::new();
        snapshot
            .sessions
            .retain(|session| seen.insert(session.id.clone()));

        let first_id = snapshot.sessions.first()?.id.clone();
        if !snapshot.contains(&snapshot.active_session_id) {
            tracing::warn!(
                "[SessionStore] Active session {} missing, activating {}",
                snapshot.active_session_id,
                first_id
            );
            snapshot.active_session_id = first_id;
        }
        Some(snapshot)
    }

    fn persist(&self) -> Option<PersistenceFailure> {
        match self.repository.save(&self.snapshot) {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!("[SessionStore] Failed to persist store: {}", e);
                Some(PersistenceFailure {
                    message: e.to_string(),
                })
            }
        }
    }

    fn session_mut(&mut self, session_id: &str) -> Option<&mut Session> {
        self.snapshot
            .sessions
            .iter_mut()
            .find(|session| session.id == session_id)
    }

    /// Creates a greeting-seeded session and makes it active.
    pub fn create_session(&mut self) -> Mutation<Session> {
        let session = Session::new();
        tracing::info!("[SessionStore] Created session {}", session.id);
        self.snapshot.active_session_id = session.id.clone();
        self.snapshot.sessions.push(session.clone());
        Mutation::new(session, self.persist())
    }

    /// Overwrites a title and stops auto-derivation for that session.
    ///
    /// Empty and duplicate titles are accepted. Returns `false` for an
    /// unknown id.
    pub fn rename_session(&mut self, session_id: &str, title: &str) -> Mutation<bool> {
        let Some(session) = self.session_mut(session_id) else {
            tracing::debug!("[SessionStore] Rename of unknown session {}", session_id);
            return Mutation::unchanged(false);
        };
        session.title = title.to_string();
        session.title_locked = true;
        Mutation::new(true, self.persist())
    }

    /// Removes a session unless it is the last one.
    ///
    /// Deleting the active session activates the first remaining session in
    /// creation order.
    pub fn delete_session(&mut self, session_id: &str) -> Mutation<bool> {
        if self.snapshot.sessions.len() <= 1 {
            tracing::debug!("[SessionStore] Refusing to delete the only session");
            return Mutation::unchanged(false);
        }
        let Some(index) = self
            .snapshot
            .sessions
            .iter()
            .position(|session| session.id == session_id)
        else {
            tracing::debug!("[SessionStore] Delete of unknown session {}", session_id);
            return Mutation::unchanged(false);
        };

        self.snapshot.sessions.remove(index);
        if self.snapshot.active_session_id == session_id {
            // len > 1 before removal, so a first session exists
            if let Some(first) = self.snapshot.sessions.first() {
                self.snapshot.active_session_id = first.id.clone();
            }
        }
        tracing::info!("[SessionStore] Deleted session {}", session_id);
        Mutation::new(true, self.persist())
    }

    /// Appends messages in order and refreshes `last_active_at`.
    ///
    /// A session still titled "New Chat" takes its title from the first user
    /// message. Returns `false` for an unknown id or an empty batch.
    pub fn append_messages(&mut self, session_id: &str, messages: Vec<Message>) -> Mutation<bool> {
        if messages.is_empty() {
            return Mutation::unchanged(false);
        }
        let title_max_chars = self.title_max_chars;
        let Some(session) = self.session_mut(session_id) else {
            tracing::debug!("[SessionStore] Append to unknown session {}", session_id);
            return Mutation::unchanged(false);
        };

        let newest = messages.iter().map(|message| message.created_at).max();
        session.messages.extend(messages);
        session.last_active_at = newest
            .map(|at| at.max(session.last_active_at))
            .unwrap_or(session.last_active_at);

        if session.has_default_title() {
            if let Some(first_user) = session.first_user_message() {
                session.title = derive_title(&first_user.text, title_max_chars);
            }
        }

        Mutation::new(true, self.persist())
    }

    /// Switches the active session. Returns `false` for an unknown id.
    pub fn set_active(&mut self, session_id: &str) -> Mutation<bool> {
        if !self.snapshot.contains(session_id) {
            tracing::debug!("[SessionStore] Select of unknown session {}", session_id);
            return Mutation::unchanged(false);
        }
        self.snapshot.active_session_id = session_id.to_string();
        Mutation::new(true, self.persist())
    }

    pub fn get(&self, session_id: &str) -> Option<&Session> {
        self.snapshot.find(session_id)
    }

    pub fn active_id(&self) -> &str {
        &self.snapshot.active_session_id
    }

    /// The active session. The snapshot invariants guarantee it exists.
    pub fn active(&self) -> &Session {
        self.snapshot
            .find(&self.snapshot.active_session_id)
            .unwrap_or(&self.snapshot.sessions[0])
    }

    /// Sessions ordered for display, most recently active first.
    pub fn list(&self) -> Vec<&Session> {
        let mut sessions: Vec<&Session> = self.snapshot.sessions.iter().collect();
        sessions.sort_by(|a, b| b.last_active_at.cmp(&a.last_active_at));
        sessions
    }

    pub fn snapshot(&self) -> &StoreSnapshot {
        &self.snapshot
    }

    pub fn len(&self) -> usize {
        self.snapshot.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.sessions.is_empty()
    }
}

//! Store persistence trait.
//!
//! Defines the interface for loading and saving the conversation store.

use super::snapshot::StoreSnapshot;
use crate::error::Result;

/// An abstract repository for the conversation store.
///
/// The whole store is loaded and saved as one snapshot under a single
/// well-known key. Calls are synchronous; callers on a multi-threaded
/// runtime serialize access through the owning `SessionStore`.
pub trait StoreRepository: Send + Sync {
    /// Loads the persisted store.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(StoreSnapshot))`: A store was persisted and parsed
    /// - `Ok(None)`: Nothing persisted yet
    /// - `Err(_)`: Data exists but could not be read or parsed
    fn load(&self) -> Result<Option<StoreSnapshot>>;

    /// Persists the full store, replacing whatever was saved before.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Store saved
    /// - `Err(_)`: Save failed; the caller's in-memory state stays authoritative
    fn save(&self, snapshot: &StoreSnapshot) -> Result<()>;
}

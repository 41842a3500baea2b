//! Conversation store repositories.
//!
//! - `JsonStoreRepository`: the whole store in one atomically replaced JSON file
//! - `InMemoryStoreRepository`: process-local, for `--ephemeral` runs and tests

use crate::dto::StoreDto;
use crate::paths::SolacePaths;
use crate::storage::AtomicJsonFile;
use solace_core::error::{Result, SolaceError};
use solace_core::session::{StoreRepository, StoreSnapshot};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// File-backed store repository.
pub struct JsonStoreRepository {
    file: AtomicJsonFile<StoreDto>,
}

impl JsonStoreRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicJsonFile::new(path),
        }
    }

    /// Repository at the store file resolved by [`SolacePaths`].
    pub fn at(paths: &SolacePaths) -> Result<Self> {
        let path = paths
            .store_file()
            .map_err(|e| SolaceError::config(format!("Failed to resolve store path: {}", e)))?;
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

impl StoreRepository for JsonStoreRepository {
    fn load(&self) -> Result<Option<StoreSnapshot>> {
        let dto = self.file.load().map_err(|e| {
            SolaceError::persistence(format!(
                "Failed to load store from {}: {}",
                self.path().display(),
                e
            ))
        })?;

        Ok(dto.and_then(StoreDto::into_snapshot))
    }

    fn save(&self, snapshot: &StoreSnapshot) -> Result<()> {
        self.file.save(&StoreDto::from_snapshot(snapshot)).map_err(|e| {
            SolaceError::persistence(format!(
                "Failed to save store to {}: {}",
                self.path().display(),
                e
            ))
        })
    }
}

/// Keeps the last saved snapshot in memory.
#[derive(Default)]
pub struct InMemoryStoreRepository {
    snapshot: Mutex<Option<StoreSnapshot>>,
    fail_saves: AtomicBool,
    save_count: AtomicUsize,
}

impl InMemoryStoreRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            snapshot: Mutex::new(Some(snapshot)),
            ..Self::default()
        }
    }

    /// Makes every following `save` fail, simulating a full or read-only disk.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }

    /// The last successfully saved snapshot.
    pub fn stored(&self) -> Option<StoreSnapshot> {
        self.snapshot.lock().ok().and_then(|guard| guard.clone())
    }
}

impl StoreRepository for InMemoryStoreRepository {
    fn load(&self) -> Result<Option<StoreSnapshot>> {
        let guard = self
            .snapshot
            .lock()
            .map_err(|e| SolaceError::internal(format!("Store lock poisoned: {}", e)))?;
        Ok(guard.clone())
    }

    fn save(&self, snapshot: &StoreSnapshot) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(SolaceError::persistence("in-memory store is set to fail"));
        }
        let mut guard = self
            .snapshot
            .lock()
            .map_err(|e| SolaceError::internal(format!("Store lock poisoned: {}", e)))?;
        *guard = Some(snapshot.clone());
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_json_repository_missing_file_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let repo = JsonStoreRepository::new(temp_dir.path().join("chat_sessions.json"));
        assert!(repo.load().unwrap().is_none());
    }

    #[test]
    fn test_json_repository_corrupt_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("chat_sessions.json");
        std::fs::write(&path, "[[[").unwrap();
        let repo = JsonStoreRepository::new(path);
        assert!(repo.load().unwrap_err().is_persistence());
    }

    #[test]
    fn test_in_memory_failure_switch() {
        let repo = InMemoryStoreRepository::new();
        let snapshot = StoreSnapshot::with_default_session();

        repo.save(&snapshot).unwrap();
        assert_eq!(repo.save_count(), 1);

        repo.set_fail_saves(true);
        assert!(repo.save(&snapshot).is_err());
        assert_eq!(repo.save_count(), 1);
        assert_eq!(repo.stored(), Some(snapshot));
    }
}

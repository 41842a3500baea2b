//! Unified path management for solace files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/solace/            # Config directory
//! ├── config.toml              # Application configuration
//! └── secret.json              # API keys
//!
//! ~/.local/share/solace/       # Data directory
//! ├── chat_sessions.json       # Conversation store
//! └── logs/                    # Application logs
//!     └── solace.log.YYYY-MM-DD
//! ```
//!
//! A base directory override (e.g. `--data-dir`) puts everything under it.

use std::path::{Path, PathBuf};

const APP_NAME: &str = "solace";

/// Well-known storage key of the conversation store.
pub const STORE_KEY: &str = "chat_sessions";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Resolves every file location the application touches.
#[derive(Debug, Clone, Default)]
pub struct SolacePaths {
    base: Option<PathBuf>,
}

impl SolacePaths {
    /// Creates a resolver. `base` replaces both platform directories.
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Returns the configuration directory (e.g. `~/.config/solace/`).
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(base) = &self.base {
            return Ok(base.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_NAME))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the data directory (e.g. `~/.local/share/solace/`).
    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(base) = &self.base {
            return Ok(base.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_NAME))
            .ok_or(PathError::HomeDirNotFound)
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the path to the secrets file.
    ///
    /// # Security Note
    ///
    /// Keep this file readable by the owner only (e.g. 600).
    pub fn secret_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("secret.json"))
    }

    /// Returns the conversation store file, named after [`STORE_KEY`].
    pub fn store_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join(format!("{STORE_KEY}.json")))
    }

    pub fn log_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_override() {
        let base = PathBuf::from("/tmp/solace-test");
        let paths = SolacePaths::new(Some(&base));
        assert_eq!(paths.config_file().unwrap(), base.join("config.toml"));
        assert_eq!(paths.secret_file().unwrap(), base.join("secret.json"));
        assert_eq!(paths.store_file().unwrap(), base.join("chat_sessions.json"));
        assert_eq!(paths.log_dir().unwrap(), base.join("logs"));
    }

    #[test]
    fn test_platform_dirs_end_with_app_name() {
        let paths = SolacePaths::default();
        if let Ok(dir) = paths.config_dir() {
            assert!(dir.ends_with(APP_NAME));
        }
    }
}

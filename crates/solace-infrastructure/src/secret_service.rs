//! Secret service implementation.
//!
//! Loads API keys from `secret.json`, falling back to environment variables
//! for providers the file does not configure.

use crate::paths::SolacePaths;
use crate::storage::AtomicJsonFile;
use solace_core::config::{ClaudeConfig, GeminiConfig, OpenAIConfig, SecretConfig};
use solace_core::error::{Result, SolaceError};
use solace_core::secret::SecretService;
use std::env;
use std::path::PathBuf;

const ANTHROPIC_API_KEY: &str = "ANTHROPIC_API_KEY";
const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
const OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// Reads `secret.json` on every call; the file is tiny and rarely read.
pub struct SecretServiceImpl {
    file: AtomicJsonFile<SecretConfig>,
    env_fallback: bool,
}

impl SecretServiceImpl {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicJsonFile::new(path),
            env_fallback: true,
        }
    }

    pub fn at(paths: &SolacePaths) -> Result<Self> {
        let path = paths
            .secret_file()
            .map_err(|e| SolaceError::config(format!("Failed to resolve secret path: {}", e)))?;
        Ok(Self::new(path))
    }

    /// Only consult the file, never the process environment.
    pub fn without_env_fallback(mut self) -> Self {
        self.env_fallback = false;
        self
    }

    fn non_empty_env(name: &str) -> Option<String> {
        env::var(name).ok().filter(|value| !value.trim().is_empty())
    }

    fn apply_env_fallback(config: &mut SecretConfig) {
        if config.claude.is_none() {
            config.claude = Self::non_empty_env(ANTHROPIC_API_KEY).map(|api_key| ClaudeConfig {
                api_key,
                model_name: None,
            });
        }
        if config.gemini.is_none() {
            config.gemini = Self::non_empty_env(GEMINI_API_KEY).map(|api_key| GeminiConfig {
                api_key,
                model_name: None,
            });
        }
        if config.openai.is_none() {
            config.openai = Self::non_empty_env(OPENAI_API_KEY).map(|api_key| OpenAIConfig {
                api_key,
                model_name: None,
            });
        }
    }
}

impl SecretService for SecretServiceImpl {
    fn load_secrets(&self) -> Result<SecretConfig> {
        // The parse error text may quote file content, so it is not forwarded
        let mut config = self
            .file
            .load()
            .map_err(|_| {
                SolaceError::config(format!(
                    "Failed to read secret file {}",
                    self.file.path().display()
                ))
            })?
            .unwrap_or_default();

        if self.env_fallback {
            Self::apply_env_fallback(&mut config);
        }

        Ok(config)
    }

    fn secret_file_exists(&self) -> bool {
        self.file.path().exists()
    }
}

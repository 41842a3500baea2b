//! Secret management service trait.
//!
//! Defines the interface for loading API keys.

use crate::config::SecretConfig;
use crate::error::Result;

/// Service for loading secret configuration.
///
/// # Security Note
///
/// Implementations must never log key material or put it in error messages.
pub trait SecretService: Send + Sync {
    /// Loads the secret configuration.
    ///
    /// A missing secret file is not an error; it yields an empty config.
    fn load_secrets(&self) -> Result<SecretConfig>;

    /// Checks if the secret file exists.
    fn secret_file_exists(&self) -> bool;
}

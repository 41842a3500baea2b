//! Session domain module.
//!
//! # Module Structure
//!
//! - `message`: Conversation message types (`MessageRole`, `Message`)
//! - `model`: Core session model (`Session`) and title derivation
//! - `snapshot`: Whole-store snapshot (`StoreSnapshot`)
//! - `repository`: Persistence trait (`StoreRepository`)

mod message;
mod model;
mod repository;
mod snapshot;

// Re-export public API
pub use message::{Message, MessageRole};
pub use model::{DEFAULT_SESSION_TITLE, GREETING_TEXT, Session, derive_title};
pub use repository::StoreRepository;
pub use snapshot::StoreSnapshot;

//! Core domain for the Solace support chat.
//!
//! Holds everything the message pipeline reasons about without touching the
//! file system or the network: topics, safety patterns, sessions, the store
//! persistence contract and the completion provider contract.

pub mod config;
pub mod error;
pub mod provider;
pub mod safety;
pub mod secret;
pub mod session;
pub mod topic;

// Re-export common types
pub use error::{Result, SolaceError};
pub use topic::{NavigationTarget, TopicKey, TopicResource};

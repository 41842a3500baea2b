//! Safety layer: pattern library, crisis classifier and resource matcher.
//!
//! - `patterns`: static crisis and topic patterns, compiled once
//! - `classifier`: `CrisisClassifier` (detection and redaction)
//! - `matcher`: `ResourceMatcher` (text to `TopicKey`)

mod classifier;
mod matcher;
pub mod patterns;

pub use classifier::{CrisisClassifier, REDACTION_TOKEN};
pub use matcher::ResourceMatcher;

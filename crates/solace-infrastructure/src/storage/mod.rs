//! File storage primitives.

mod atomic_json;

pub use atomic_json::{AtomicFileError, AtomicJsonFile};

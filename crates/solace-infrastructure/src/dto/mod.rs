//! Data transfer objects for persisted state.

pub mod store;

pub use store::{CURRENT_STORE_VERSION, MessageDto, SessionDto, SessionsDto, StoreDto};

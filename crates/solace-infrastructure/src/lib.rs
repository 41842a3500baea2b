//! File system adapters for Solace: paths, atomic storage, persisted DTOs,
//! the conversation store repositories and the config/secret services.

pub mod config_service;
pub mod dto;
pub mod paths;
pub mod secret_service;
pub mod storage;
pub mod store_repository;

pub use crate::config_service::ConfigService;
pub use crate::paths::SolacePaths;
pub use crate::secret_service::SecretServiceImpl;
pub use crate::store_repository::{InMemoryStoreRepository, JsonStoreRepository};

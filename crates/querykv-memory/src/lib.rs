mod config;
mod error;
mod repository;

pub use config::RepositoryConfig;
pub use error::MemoryError;
pub use repository::{DocumentKey, MemoryRepository};

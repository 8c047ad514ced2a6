//! Infrastructure for the Portal client: storage, HTTP and configuration.

pub mod config;
pub mod http_client;
pub mod navigator;
pub mod paths;
pub mod storage;

pub use crate::config::ClientConfig;
pub use crate::http_client::HttpApiClient;
pub use crate::navigator::LoggingNavigator;
pub use crate::paths::PortalPaths;
pub use crate::storage::{JsonFileStore, MemoryStore};

//! Domain models and seams for the Portal client.
//!
//! This crate does no I/O. Storage, HTTP and navigation are reached through
//! the traits in [`storage`], [`api`] and [`navigation`].

pub mod api;
pub mod auth;
pub mod error;
pub mod lifecycle;
pub mod navigation;
pub mod settings;
pub mod storage;
pub mod telemetry;
pub mod user;

pub use api::{ApiError, Endpoints, RemoteApi};
pub use error::{PortalError, Result};
pub use lifecycle::SessionObserver;
pub use navigation::{Destination, Navigator};
pub use storage::{KeyValueStore, SETTINGS_KEY, TOKEN_KEY, USER_KEY};

//! Persistent key-value storage seam.

use crate::error::Result;

/// Key holding the raw bearer token.
pub const TOKEN_KEY: &str = "token";
/// Key holding the JSON-serialized user profile.
pub const USER_KEY: &str = "user";
/// Key holding the JSON-serialized (possibly partial) settings object.
pub const SETTINGS_KEY: &str = "appSettings";

/// Durable, string-valued storage shared by the state containers.
///
/// Each container reads and writes its own keys only. Access is synchronous;
/// implementations use interior mutability so a store can be shared behind an
/// `Arc`. Values may be removed by something outside this process at any time,
/// so readers must treat every key as optional.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

//! Navigation side effects emitted by the session manager.

use serde::{Deserialize, Serialize};

/// Where the UI should go after an authentication transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Destination {
    /// After a successful login or registration
    PostLogin,
    /// After logout or session invalidation
    Login,
}

impl Destination {
    pub fn path(self) -> &'static str {
        match self {
            Destination::PostLogin => "/landing",
            Destination::Login => "/login",
        }
    }
}

/// Receiver of navigation requests (router, CLI output, test recorder).
pub trait Navigator: Send + Sync {
    fn navigate(&self, destination: Destination);
}

//! Navigator that logs route changes instead of driving a router.

use portal_core::navigation::{Destination, Navigator};
use std::sync::{Mutex, PoisonError};

/// Records the most recent destination and logs every request.
#[derive(Debug, Default)]
pub struct LoggingNavigator {
    last: Mutex<Option<Destination>>,
}

impl LoggingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_destination(&self) -> Option<Destination> {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Navigator for LoggingNavigator {
    fn navigate(&self, destination: Destination) {
        tracing::info!(path = destination.path(), "navigate");
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(destination);
    }
}

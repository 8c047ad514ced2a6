//! Application layer of the Portal client.
//!
//! Three independent state containers:
//! - [`SessionManager`]: token and profile lifecycle
//! - [`SettingsManager`]: user preferences and their remote sync
//! - [`SessionTelemetry`]: in-memory session metrics
//!
//! [`PortalContext`] builds and wires them once at start-up.

mod in_flight;

pub mod context;
pub mod messages;
pub mod session_manager;
pub mod settings_manager;
pub mod telemetry;

#[cfg(test)]
mod test_support;

pub use context::{Bootstrap, PortalContext};
pub use session_manager::SessionManager;
pub use settings_manager::SettingsManager;
pub use telemetry::SessionTelemetry;

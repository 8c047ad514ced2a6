pub mod profile;
pub mod session;
pub mod settings;
pub mod status;
pub mod telemetry;

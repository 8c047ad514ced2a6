//! User domain module.
//!
//! # Module Structure
//!
//! - `model`: User profile as returned by the backend, and the partial update body
//!
//! # Usage
//!
//! ```ignore
//! use portal_core::user::{UserProfile, ProfileUpdate};
//! ```

mod model;

// Re-export public API
pub use model::{ProfileUpdate, UserProfile};

//! User-facing error strings.
//!
//! Rejections with a server message show that message instead; these are the
//! fallbacks per operation.

pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTRATION_FAILED: &str = "Registration failed";
pub const PROFILE_UPDATE_FAILED: &str = "Failed to update profile";
pub const PASSWORD_CHANGE_FAILED: &str = "Failed to change password";
pub const SETTINGS_SAVE_FAILED: &str = "Failed to save settings";

pub const AUTH_NETWORK_ERROR: &str = "Network error. Please try again.";
pub const PROFILE_NETWORK_ERROR: &str = "Network error while updating profile";
pub const PASSWORD_NETWORK_ERROR: &str = "Network error while changing password";
pub const SETTINGS_NETWORK_ERROR: &str = "Network error while saving settings";

pub const NOT_AUTHENTICATED: &str = "Not authenticated";
pub const SESSION_ENDED: &str = "Session ended before the request completed";
pub const SESSION_NOT_SAVED: &str = "Could not store the session on this device";
pub const SETTINGS_NOT_STORED: &str = "Could not store settings on this device";

//! Remote API seam.
//!
//! The state containers talk to the backend only through [`RemoteApi`], so the
//! HTTP client can be swapped for a mock in tests.

use async_trait::async_trait;
use thiserror::Error;

use crate::auth::{AuthResponse, Credentials, PasswordChange, Registration};
use crate::settings::RemoteSettingsPayload;
use crate::user::{ProfileUpdate, UserProfile};

/// Endpoint paths of the backend, relative to the configured API URL.
pub struct Endpoints;

impl Endpoints {
    pub const LOGIN: &'static str = "/api/auth/login";
    pub const REGISTER: &'static str = "/api/auth/register";
    pub const CHANGE_PASSWORD: &'static str = "/api/auth/change-password";
    pub const PROFILE: &'static str = "/api/profile";
    pub const SETTINGS: &'static str = "/api/settings";
}

/// Failure of a single remote call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    ///
    /// `message` is the `message` field of the response body, when present.
    #[error("request rejected ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Rejected { status: u16, message: Option<String> },

    /// Network failure, timeout, or a body that could not be decoded.
    #[error("transport failure: {0}")]
    Transport(String),
}

impl ApiError {
    pub fn rejected(status: u16, message: Option<String>) -> Self {
        Self::Rejected { status, message }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Picks the message shown to the user.
    ///
    /// Rejections surface the server message verbatim, falling back to
    /// `rejected_fallback`; transport failures always use `transport_message`.
    pub fn user_message(&self, rejected_fallback: &str, transport_message: &str) -> String {
        match self {
            Self::Rejected {
                message: Some(message),
                ..
            } if !message.is_empty() => message.clone(),
            Self::Rejected { .. } => rejected_fallback.to_string(),
            Self::Transport(_) => transport_message.to_string(),
        }
    }
}

/// Remote backend consumed by the session and settings managers.
///
/// Authenticated calls receive the bearer token at call time; implementations
/// hold no session state of their own.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// `POST /api/auth/login`
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError>;

    /// `POST /api/auth/register`
    async fn register(&self, registration: &Registration) -> Result<AuthResponse, ApiError>;

    /// `GET /api/profile`, used to confirm a stored token is still valid.
    async fn fetch_profile(&self, token: &str) -> Result<(), ApiError>;

    /// `PUT /api/profile`, returns the server's copy of the profile.
    async fn update_profile(
        &self,
        token: &str,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, ApiError>;

    /// `PUT /api/auth/change-password`
    async fn change_password(&self, token: &str, change: &PasswordChange) -> Result<(), ApiError>;

    /// `PUT /api/settings`
    async fn update_settings(
        &self,
        token: &str,
        payload: &RemoteSettingsPayload,
    ) -> Result<(), ApiError>;
}

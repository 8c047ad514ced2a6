//! HTTP implementation of [`RemoteApi`].

use async_trait::async_trait;
use portal_core::api::{ApiError, Endpoints, RemoteApi};
use portal_core::auth::{AuthResponse, Credentials, PasswordChange, Registration};
use portal_core::settings::RemoteSettingsPayload;
use portal_core::user::{ProfileUpdate, UserProfile};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::ClientConfig;

/// Error body of non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// `{ "user": ... }` envelope returned by the profile endpoints.
#[derive(Debug, Deserialize)]
struct UserEnvelope {
    user: UserProfile,
}

/// JSON-over-HTTP client for the portal backend.
#[derive(Clone)]
pub struct HttpApiClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.api_url.clone(), config.request_timeout())
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::transport(format!("request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // A rejection without a readable body still counts as a rejection.
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message);
        tracing::warn!(status = status.as_u16(), ?message, "backend rejected request");
        Err(ApiError::rejected(status.as_u16(), message))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        self.send(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ApiError::transport(format!("malformed response: {}", e)))
    }
}

#[async_trait]
impl RemoteApi for HttpApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        let request = self.client.post(self.url(Endpoints::LOGIN)).json(credentials);
        self.send_json(request).await
    }

    async fn register(&self, registration: &Registration) -> Result<AuthResponse, ApiError> {
        let request = self
            .client
            .post(self.url(Endpoints::REGISTER))
            .json(registration);
        self.send_json(request).await
    }

    async fn fetch_profile(&self, token: &str) -> Result<(), ApiError> {
        let request = self.client.get(self.url(Endpoints::PROFILE)).bearer_auth(token);
        self.send(request).await.map(|_| ())
    }

    async fn update_profile(
        &self,
        token: &str,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, ApiError> {
        let request = self
            .client
            .put(self.url(Endpoints::PROFILE))
            .bearer_auth(token)
            .json(update);
        let envelope: UserEnvelope = self.send_json(request).await?;
        Ok(envelope.user)
    }

    async fn change_password(&self, token: &str, change: &PasswordChange) -> Result<(), ApiError> {
        let request = self
            .client
            .put(self.url(Endpoints::CHANGE_PASSWORD))
            .bearer_auth(token)
            .json(change);
        self.send(request).await.map(|_| ())
    }

    async fn update_settings(
        &self,
        token: &str,
        payload: &RemoteSettingsPayload,
    ) -> Result<(), ApiError> {
        let request = self
            .client
            .put(self.url(Endpoints::SETTINGS))
            .bearer_auth(token)
            .json(payload);
        self.send(request).await.map(|_| ())
    }
}

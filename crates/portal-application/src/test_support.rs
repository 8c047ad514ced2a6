//! Mock implementations of the core seams for unit tests.

use async_trait::async_trait;
use portal_core::api::{ApiError, RemoteApi};
use portal_core::auth::{AuthResponse, Credentials, PasswordChange, Registration};
use portal_core::error::{PortalError, Result as PortalResult};
use portal_core::lifecycle::SessionObserver;
use portal_core::navigation::{Destination, Navigator};
use portal_core::settings::RemoteSettingsPayload;
use portal_core::storage::KeyValueStore;
use portal_core::user::{ProfileUpdate, UserProfile};
use portal_infrastructure::MemoryStore;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub(crate) fn profile(id: &str) -> UserProfile {
    UserProfile {
        id: id.to_string(),
        username: "ada".to_string(),
        email: "ada@example.com".to_string(),
        ..Default::default()
    }
}

fn unconfigured<T>() -> Result<T, ApiError> {
    Err(ApiError::transport("no response configured"))
}

/// Canned responses per endpoint plus a log of what was called.
///
/// When gated, auth calls wait for [`gate`](Self::gate) to be notified before
/// answering; `fetch_profile` waits on its own [`check_gate`](Self::check_gate).
#[derive(Default)]
pub(crate) struct MockApi {
    auth: Option<Result<AuthResponse, ApiError>>,
    profile_check: Option<Result<(), ApiError>>,
    profile_update: Option<Result<UserProfile, ApiError>>,
    password: Option<Result<(), ApiError>>,
    settings: Option<Result<(), ApiError>>,
    gate: Option<Arc<Notify>>,
    check_gate: Option<Arc<Notify>>,
    calls: Mutex<Vec<&'static str>>,
    tokens: Mutex<Vec<String>>,
    settings_payloads: Mutex<Vec<RemoteSettingsPayload>>,
}

impl MockApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_auth(mut self, response: Result<AuthResponse, ApiError>) -> Self {
        self.auth = Some(response);
        self
    }

    pub(crate) fn with_profile_check(mut self, response: Result<(), ApiError>) -> Self {
        self.profile_check = Some(response);
        self
    }

    pub(crate) fn with_profile_update(mut self, response: Result<UserProfile, ApiError>) -> Self {
        self.profile_update = Some(response);
        self
    }

    pub(crate) fn with_password(mut self, response: Result<(), ApiError>) -> Self {
        self.password = Some(response);
        self
    }

    pub(crate) fn with_settings(mut self, response: Result<(), ApiError>) -> Self {
        self.settings = Some(response);
        self
    }

    pub(crate) fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Notify::new()));
        self
    }

    pub(crate) fn gate(&self) -> Arc<Notify> {
        self.gate.clone().expect("MockApi is not gated")
    }

    pub(crate) fn gated_profile_check(mut self) -> Self {
        self.check_gate = Some(Arc::new(Notify::new()));
        self
    }

    pub(crate) fn check_gate(&self) -> Arc<Notify> {
        self.check_gate
            .clone()
            .expect("MockApi profile check is not gated")
    }

    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn tokens(&self) -> Vec<String> {
        self.tokens.lock().unwrap().clone()
    }

    pub(crate) fn settings_payloads(&self) -> Vec<RemoteSettingsPayload> {
        self.settings_payloads.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str, token: Option<&str>) {
        self.calls.lock().unwrap().push(call);
        if let Some(token) = token {
            self.tokens.lock().unwrap().push(token.to_string());
        }
    }

    async fn wait_for_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl RemoteApi for MockApi {
    async fn login(&self, _credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        self.record("login", None);
        self.wait_for_gate().await;
        self.auth.clone().unwrap_or_else(unconfigured)
    }

    async fn register(&self, _registration: &Registration) -> Result<AuthResponse, ApiError> {
        self.record("register", None);
        self.wait_for_gate().await;
        self.auth.clone().unwrap_or_else(unconfigured)
    }

    async fn fetch_profile(&self, token: &str) -> Result<(), ApiError> {
        self.record("fetch_profile", Some(token));
        if let Some(gate) = &self.check_gate {
            gate.notified().await;
        }
        self.profile_check.clone().unwrap_or_else(unconfigured)
    }

    async fn update_profile(
        &self,
        token: &str,
        _update: &ProfileUpdate,
    ) -> Result<UserProfile, ApiError> {
        self.record("update_profile", Some(token));
        self.profile_update.clone().unwrap_or_else(unconfigured)
    }

    async fn change_password(&self, token: &str, _change: &PasswordChange) -> Result<(), ApiError> {
        self.record("change_password", Some(token));
        self.password.clone().unwrap_or_else(unconfigured)
    }

    async fn update_settings(
        &self,
        token: &str,
        payload: &RemoteSettingsPayload,
    ) -> Result<(), ApiError> {
        self.record("update_settings", Some(token));
        self.settings_payloads.lock().unwrap().push(payload.clone());
        self.settings.clone().unwrap_or_else(unconfigured)
    }
}

#[derive(Default)]
pub(crate) struct RecordingNavigator {
    destinations: Mutex<Vec<Destination>>,
}

impl RecordingNavigator {
    pub(crate) fn destinations(&self) -> Vec<Destination> {
        self.destinations.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, destination: Destination) {
        self.destinations.lock().unwrap().push(destination);
    }
}

#[derive(Default)]
pub(crate) struct RecordingObserver {
    started: AtomicUsize,
    ended: AtomicUsize,
    calls: AtomicUsize,
}

impl RecordingObserver {
    pub(crate) fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub(crate) fn ended(&self) -> usize {
        self.ended.load(Ordering::SeqCst)
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SessionObserver for RecordingObserver {
    fn session_started(&self) {
        self.started.fetch_add(1, Ordering::SeqCst);
    }

    fn session_ended(&self) {
        self.ended.fetch_add(1, Ordering::SeqCst);
    }

    fn remote_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// A [`MemoryStore`] whose writes can be made to fail. Removals always succeed.
pub(crate) struct FlakyStore {
    inner: MemoryStore,
    fail_writes: AtomicBool,
}

impl FlakyStore {
    pub(crate) fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            fail_writes: AtomicBool::new(false),
        }
    }

    pub(crate) fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> PortalResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> PortalResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PortalError::storage("disk full"));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> PortalResult<()> {
        self.inner.remove(key)
    }
}

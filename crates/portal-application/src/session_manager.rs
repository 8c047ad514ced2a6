//! Authentication state and token lifecycle.

use portal_core::api::{ApiError, RemoteApi};
use portal_core::auth::{AuthResponse, Credentials, PasswordChange, Registration, SessionSnapshot};
use portal_core::error::Result as PortalResult;
use portal_core::lifecycle::SessionObserver;
use portal_core::navigation::{Destination, Navigator};
use portal_core::storage::{KeyValueStore, TOKEN_KEY, USER_KEY};
use portal_core::user::{ProfileUpdate, UserProfile};
use std::sync::atomic::AtomicUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::in_flight::{self, InFlight};
use crate::messages;

#[derive(Default)]
struct SessionState {
    token: Option<String>,
    user: Option<UserProfile>,
    last_error: String,
    /// Bumped whenever the identity changes: on every clear and on every
    /// newly established session. A remote call captures it on entry and
    /// only writes state if it is unchanged on completion.
    generation: u64,
}

/// Owns the authenticated identity: token, profile and the sticky error.
///
/// `SessionManager` is responsible for:
/// - Exchanging credentials for a token (login/register)
/// - Persisting the token and profile under `token` / `user`
/// - Confirming a stored token on start-up (`check_auth`)
/// - Clearing everything on logout or invalidation
///
/// Every operation reports failure as a returned message that is also kept
/// in [`auth_error`](Self::auth_error) until the next operation or
/// [`clear_error`](Self::clear_error). Nothing is retried.
pub struct SessionManager {
    api: Arc<dyn RemoteApi>,
    storage: Arc<dyn KeyValueStore>,
    navigator: Arc<dyn Navigator>,
    observers: Vec<Arc<dyn SessionObserver>>,
    state: Mutex<SessionState>,
    loading: AtomicUsize,
}

impl SessionManager {
    /// Creates a manager, picking up a token left in storage by a previous run.
    ///
    /// The profile is not restored here; [`check_auth`](Self::check_auth) does
    /// that together with the validity check.
    pub fn new(
        api: Arc<dyn RemoteApi>,
        storage: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let token = storage.get(TOKEN_KEY).unwrap_or_else(|e| {
            tracing::warn!("Failed to read stored token: {}", e);
            None
        });

        Self {
            api,
            storage,
            navigator,
            observers: Vec::new(),
            state: Mutex::new(SessionState {
                token,
                ..Default::default()
            }),
            loading: AtomicUsize::new(0),
        }
    }

    /// Registers an observer for session start/end and outbound calls.
    pub fn with_observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    // ------------------------------------------------------------------
    // Getters
    // ------------------------------------------------------------------

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.lock();
        SessionSnapshot {
            token: state.token.clone(),
            user: state.user.clone(),
            loading: self.is_loading(),
            last_error: state.last_error.clone(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().token.is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.lock().token.clone()
    }

    pub fn user_profile(&self) -> Option<UserProfile> {
        self.lock().user.clone()
    }

    pub fn auth_error(&self) -> String {
        self.lock().last_error.clone()
    }

    pub fn is_loading(&self) -> bool {
        in_flight::is_active(&self.loading)
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    pub async fn login(&self, credentials: &Credentials) -> Result<(), String> {
        let _loading = InFlight::enter(&self.loading);
        let generation = self.begin();
        tracing::info!(email = %credentials.email, "Logging in");

        self.notify_remote_call();
        match self.api.login(credentials).await {
            Ok(response) => self.establish(generation, response),
            Err(err) => Err(self.fail(
                generation,
                &err,
                err.user_message(messages::LOGIN_FAILED, messages::AUTH_NETWORK_ERROR),
            )),
        }
    }

    pub async fn register(&self, registration: &Registration) -> Result<(), String> {
        let _loading = InFlight::enter(&self.loading);
        let generation = self.begin();
        tracing::info!(username = %registration.username, "Registering");

        self.notify_remote_call();
        match self.api.register(registration).await {
            Ok(response) => self.establish(generation, response),
            Err(err) => Err(self.fail(
                generation,
                &err,
                err.user_message(messages::REGISTRATION_FAILED, messages::AUTH_NETWORK_ERROR),
            )),
        }
    }

    /// Clears token, profile, error and both storage keys, then asks for the
    /// login page. Safe to call at any time, any number of times.
    pub fn logout(&self) {
        {
            let mut state = self.lock();
            state.token = None;
            state.user = None;
            state.last_error.clear();
            state.generation += 1;
        }

        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!("Failed to remove '{}' from storage: {}", key, e);
            }
        }

        for observer in &self.observers {
            observer.session_ended();
        }
        self.navigator.navigate(Destination::Login);
        tracing::info!("Session cleared");
    }

    /// Restores a stored session and confirms it with the backend.
    ///
    /// Returns `false` without a remote call when nothing usable is stored.
    /// A rejected or unreachable check clears the session exactly like
    /// [`logout`](Self::logout).
    pub async fn check_auth(&self) -> bool {
        let Some((token, user)) = self.read_stored_session() else {
            return false;
        };

        let generation = {
            let mut state = self.lock();
            state.token = Some(token.clone());
            state.user = Some(user);
            state.generation
        };

        self.notify_remote_call();
        let result = self.api.fetch_profile(&token).await;

        if self.lock().generation != generation {
            tracing::info!("Session was cleared while its token was being checked");
            return false;
        }

        match result {
            Ok(()) => {
                tracing::info!("Stored session confirmed");
                true
            }
            Err(err) => {
                tracing::warn!("Stored session rejected: {}", err);
                self.logout();
                false
            }
        }
    }

    /// Sends a profile update; on success the server's profile replaces the
    /// current one in memory and in storage.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, String> {
        let _loading = InFlight::enter(&self.loading);
        let generation = self.begin();
        let token = self.require_token()?;

        self.notify_remote_call();
        let profile = match self.api.update_profile(&token, update).await {
            Ok(profile) => profile,
            Err(err) => {
                return Err(self.fail(
                    generation,
                    &err,
                    err.user_message(
                        messages::PROFILE_UPDATE_FAILED,
                        messages::PROFILE_NETWORK_ERROR,
                    ),
                ));
            }
        };

        let mut state = self.lock();
        if state.generation != generation {
            return Err(messages::SESSION_ENDED.to_string());
        }
        if let Err(e) = self.store_user(&profile) {
            tracing::warn!("Failed to persist updated profile: {}", e);
            state.last_error = messages::SESSION_NOT_SAVED.to_string();
            return Err(state.last_error.clone());
        }
        state.user = Some(profile.clone());
        tracing::info!("Profile updated");
        Ok(profile)
    }

    /// Changes the password. Token and profile are left as they are.
    pub async fn change_password(&self, change: &PasswordChange) -> Result<(), String> {
        let _loading = InFlight::enter(&self.loading);
        let generation = self.begin();
        let token = self.require_token()?;

        self.notify_remote_call();
        match self.api.change_password(&token, change).await {
            Ok(()) => {
                tracing::info!("Password changed");
                Ok(())
            }
            Err(err) => Err(self.fail(
                generation,
                &err,
                err.user_message(
                    messages::PASSWORD_CHANGE_FAILED,
                    messages::PASSWORD_NETWORK_ERROR,
                ),
            )),
        }
    }

    pub fn clear_error(&self) {
        self.lock().last_error.clear();
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Clears the error and captures the current generation.
    fn begin(&self) -> u64 {
        let mut state = self.lock();
        state.last_error.clear();
        state.generation
    }

    fn require_token(&self) -> Result<String, String> {
        let mut state = self.lock();
        match &state.token {
            Some(token) => Ok(token.clone()),
            None => {
                state.last_error = messages::NOT_AUTHENTICATED.to_string();
                Err(state.last_error.clone())
            }
        }
    }

    /// Stores a failure message unless the session was cleared meanwhile.
    fn fail(&self, generation: u64, err: &ApiError, message: String) -> String {
        tracing::warn!("Remote call failed: {}", err);
        let mut state = self.lock();
        if state.generation == generation {
            state.last_error = message.clone();
        }
        message
    }

    /// Writes a fresh token and profile, unless the identity changed while
    /// the request was in flight.
    ///
    /// Any other call still pending from before this point belongs to the
    /// previous identity and will discard its result.
    fn establish(&self, generation: u64, response: AuthResponse) -> Result<(), String> {
        {
            let mut state = self.lock();
            if state.generation != generation {
                tracing::warn!("Discarding authentication response for a superseded session");
                return Err(messages::SESSION_ENDED.to_string());
            }
            state.generation += 1;

            if let Err(e) = self.store_session(&response) {
                tracing::warn!("Failed to persist session: {}", e);
                // neither a partial session on disk nor a previous one in memory
                let _ = self.storage.remove(TOKEN_KEY);
                let _ = self.storage.remove(USER_KEY);
                let was_authenticated = state.token.take().is_some();
                state.user = None;
                state.last_error = messages::SESSION_NOT_SAVED.to_string();
                let message = state.last_error.clone();
                drop(state);

                if was_authenticated {
                    for observer in &self.observers {
                        observer.session_ended();
                    }
                }
                return Err(message);
            }

            state.token = Some(response.token);
            state.user = Some(response.user);
            state.last_error.clear();
        }

        tracing::info!("Authenticated");
        for observer in &self.observers {
            observer.session_started();
        }
        self.navigator.navigate(Destination::PostLogin);
        Ok(())
    }

    fn store_session(&self, response: &AuthResponse) -> PortalResult<()> {
        self.storage.set(TOKEN_KEY, &response.token)?;
        self.store_user(&response.user)
    }

    fn store_user(&self, user: &UserProfile) -> PortalResult<()> {
        let json = serde_json::to_string(user)?;
        self.storage.set(USER_KEY, &json)
    }

    /// Both keys must be present and the profile must parse.
    fn read_stored_session(&self) -> Option<(String, UserProfile)> {
        let token = self.storage.get(TOKEN_KEY).ok().flatten()?;
        let user_json = self.storage.get(USER_KEY).ok().flatten()?;

        match serde_json::from_str::<UserProfile>(&user_json) {
            Ok(user) => Some((token, user)),
            Err(e) => {
                tracing::warn!("Stored profile is unreadable, clearing session: {}", e);
                self.logout();
                None
            }
        }
    }

    fn notify_remote_call(&self) {
        for observer in &self.observers {
            observer.remote_call();
        }
    }
}

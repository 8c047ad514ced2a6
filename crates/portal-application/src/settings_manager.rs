//! User preferences: load, save, reset and remote sync.

use portal_core::api::RemoteApi;
use portal_core::lifecycle::SessionObserver;
use portal_core::settings::{RemoteSettingsPayload, Settings, Theme};
use portal_core::storage::{KeyValueStore, SETTINGS_KEY};
use serde_json::{Map, Value};
use std::sync::atomic::AtomicUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::in_flight::{self, InFlight};
use crate::messages;

#[derive(Default)]
struct SettingsState {
    settings: Settings,
    error: String,
}

/// Owns the user's settings.
///
/// In memory the settings are always a full object: defaults overlaid with
/// whatever was last persisted under `appSettings`. Changes stay in memory
/// until [`save`](Self::save).
///
/// Operations that (re)apply the dark-mode flag return the resulting
/// [`Theme`]; applying it to the UI is the caller's job.
pub struct SettingsManager {
    api: Arc<dyn RemoteApi>,
    storage: Arc<dyn KeyValueStore>,
    observers: Vec<Arc<dyn SessionObserver>>,
    state: Mutex<SettingsState>,
    loading: AtomicUsize,
}

impl SettingsManager {
    /// Creates a manager holding the compiled-in defaults. Call
    /// [`load`](Self::load) to pick up persisted values.
    pub fn new(api: Arc<dyn RemoteApi>, storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            api,
            storage,
            observers: Vec::new(),
            state: Mutex::new(SettingsState::default()),
            loading: AtomicUsize::new(0),
        }
    }

    /// Registers an observer notified of outbound calls.
    pub fn with_observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn current_settings(&self) -> Settings {
        self.lock().settings.clone()
    }

    pub fn is_dark_mode(&self) -> bool {
        self.lock().settings.dark_mode
    }

    pub fn theme(&self) -> Theme {
        self.lock().settings.theme()
    }

    pub fn is_loading(&self) -> bool {
        in_flight::is_active(&self.loading)
    }

    pub fn settings_error(&self) -> String {
        self.lock().error.clone()
    }

    /// Reads the persisted object and merges it over the defaults.
    ///
    /// An unreadable or non-object value is ignored and the defaults are
    /// used. Returns the theme to apply.
    pub fn load(&self) -> Theme {
        let persisted = self.read_persisted();
        let (settings, rejected) = Settings::merge_over_defaults(&persisted);
        if !rejected.is_empty() {
            tracing::warn!(?rejected, "Ignoring persisted settings with unexpected types");
        }

        let theme = settings.theme();
        self.lock().settings = settings;
        tracing::debug!(theme = theme.as_str(), "Settings loaded");
        theme
    }

    /// Persists the settings, syncing a subset to the backend when signed in.
    ///
    /// Without a token the full object is written locally and no request is
    /// made. With a token, `{theme, notifications, autoRefresh}` is sent first
    /// and the full object is written locally only if the backend accepts it.
    pub async fn save(&self, token: Option<&str>) -> Result<(), String> {
        let _loading = InFlight::enter(&self.loading);
        let settings = {
            let mut state = self.lock();
            state.error.clear();
            state.settings.clone()
        };

        let Some(token) = token else {
            return self.persist(&settings);
        };

        for observer in &self.observers {
            observer.remote_call();
        }
        let payload = RemoteSettingsPayload::from(&settings);
        match self.api.update_settings(token, &payload).await {
            Ok(()) => self.persist(&settings),
            Err(err) => {
                tracing::warn!("Settings sync failed: {}", err);
                let message = err.user_message(
                    messages::SETTINGS_SAVE_FAILED,
                    messages::SETTINGS_NETWORK_ERROR,
                );
                self.lock().error = message.clone();
                Err(message)
            }
        }
    }

    /// Restores the defaults and deletes the persisted object.
    pub fn reset(&self) -> Theme {
        let settings = Settings::default();
        let theme = settings.theme();
        self.lock().settings = settings;

        if let Err(e) = self.storage.remove(SETTINGS_KEY) {
            tracing::warn!("Failed to remove persisted settings: {}", e);
        }
        tracing::info!("Settings reset to defaults");
        theme
    }

    /// Flips dark mode in memory. Not persisted until [`save`](Self::save).
    pub fn toggle_theme(&self) -> Theme {
        let mut state = self.lock();
        state.settings.dark_mode = !state.settings.dark_mode;
        state.settings.theme()
    }

    /// Sets one key in memory without persisting it.
    ///
    /// This is not an untyped map write. Unknown keys are stored as given,
    /// but a value whose JSON type does not fit a known key (for example a
    /// string for `autoRefresh`) is dropped with a warning and the key keeps
    /// its previous value, so the in-memory settings always deserialize.
    pub fn update_setting(&self, key: &str, value: Value) {
        let mut state = self.lock();
        match state.settings.with_value(key, value) {
            Some(next) => state.settings = next,
            None => tracing::warn!(key, "Ignoring setting value of the wrong type"),
        }
    }

    pub fn clear_error(&self) {
        self.lock().error.clear();
    }

    fn lock(&self) -> MutexGuard<'_, SettingsState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_persisted(&self) -> Map<String, Value> {
        let raw = match self.storage.get(SETTINGS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Map::new(),
            Err(e) => {
                tracing::warn!("Failed to read persisted settings: {}", e);
                return Map::new();
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                tracing::warn!("Persisted settings are not an object, using defaults");
                Map::new()
            }
            Err(e) => {
                tracing::warn!("Persisted settings are unreadable, using defaults: {}", e);
                Map::new()
            }
        }
    }

    fn persist(&self, settings: &Settings) -> Result<(), String> {
        let stored = serde_json::to_string(settings)
            .map_err(|e| e.to_string())
            .and_then(|json| {
                self.storage
                    .set(SETTINGS_KEY, &json)
                    .map_err(|e| e.to_string())
            });

        match stored {
            Ok(()) => {
                tracing::debug!("Settings saved");
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to persist settings: {}", e);
                let mut state = self.lock();
                state.error = messages::SETTINGS_NOT_STORED.to_string();
                Err(state.error.clone())
            }
        }
    }
}

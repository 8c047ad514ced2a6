//! Start-up wiring of the three state containers.

use portal_core::api::RemoteApi;
use portal_core::navigation::Navigator;
use portal_core::settings::Theme;
use portal_core::storage::KeyValueStore;
use std::sync::Arc;

use crate::session_manager::SessionManager;
use crate::settings_manager::SettingsManager;
use crate::telemetry::SessionTelemetry;

/// Outcome of [`PortalContext::bootstrap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bootstrap {
    pub theme: Theme,
    pub authenticated: bool,
}

/// Application context, built once at start-up and passed by reference to
/// whatever needs it.
///
/// The containers share only the storage handle; the session token reaches
/// the settings manager as a call argument.
pub struct PortalContext {
    pub session: SessionManager,
    pub settings: SettingsManager,
    pub telemetry: Arc<SessionTelemetry>,
}

impl PortalContext {
    pub fn new(
        api: Arc<dyn RemoteApi>,
        storage: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let telemetry = Arc::new(SessionTelemetry::new());
        let session = SessionManager::new(api.clone(), storage.clone(), navigator)
            .with_observer(telemetry.clone());
        let settings = SettingsManager::new(api, storage).with_observer(telemetry.clone());

        Self {
            session,
            settings,
            telemetry,
        }
    }

    /// Loads settings, then validates any stored session.
    pub async fn bootstrap(&self) -> Bootstrap {
        let theme = self.settings.load();
        let authenticated = self.session.check_auth().await;
        tracing::info!(theme = theme.as_str(), authenticated, "Portal context ready");
        Bootstrap {
            theme,
            authenticated,
        }
    }

    /// Saves settings using the session's current token, if any.
    pub async fn save_settings(&self) -> Result<(), String> {
        let token = self.session.token();
        self.settings.save(token.as_deref()).await
    }
}

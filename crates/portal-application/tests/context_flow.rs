use portal_application::PortalContext;
use portal_core::auth::Credentials;
use portal_core::navigation::Destination;
use portal_core::storage::{KeyValueStore, SETTINGS_KEY, TOKEN_KEY, USER_KEY};
use portal_infrastructure::{HttpApiClient, JsonFileStore, LoggingNavigator};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Harness {
    _temp_dir: TempDir,
    storage_path: std::path::PathBuf,
    storage: Arc<JsonFileStore>,
    navigator: Arc<LoggingNavigator>,
    context: PortalContext,
}

fn harness(server: &MockServer) -> Harness {
    let temp_dir = TempDir::new().unwrap();
    let storage_path = temp_dir.path().join("storage.json");
    let storage = Arc::new(JsonFileStore::open(&storage_path).unwrap());
    let navigator = Arc::new(LoggingNavigator::default());
    let api = Arc::new(HttpApiClient::new(server.uri(), Duration::from_secs(5)));
    let context = PortalContext::new(api, storage.clone(), navigator.clone());
    Harness {
        _temp_dir: temp_dir,
        storage_path,
        storage,
        navigator,
        context,
    }
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "tok-1",
            "user": {"_id": "u1", "username": "ada", "email": "ada@example.com"}
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn login_save_settings_and_logout_against_http_backend() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("PUT"))
        .and(path("/api/settings"))
        .and(header("authorization", "Bearer tok-1"))
        .and(body_json(json!({
            "settings": {"theme": "dark", "notifications": true, "autoRefresh": false}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server);
    h.context.bootstrap().await;

    h.context
        .session
        .login(&Credentials::new("ada@example.com", "pw"))
        .await
        .unwrap();

    assert!(h.context.session.is_authenticated());
    assert_eq!(h.navigator.last_destination(), Some(Destination::PostLogin));
    assert!(h.context.telemetry.is_running());

    // a second handle on the same file sees the session
    let reopened = JsonFileStore::open(&h.storage_path).unwrap();
    assert_eq!(reopened.get(TOKEN_KEY).unwrap().as_deref(), Some("tok-1"));
    assert!(reopened.get(USER_KEY).unwrap().unwrap().contains("\"u1\""));

    h.context.settings.toggle_theme();
    h.context.save_settings().await.unwrap();
    assert_eq!(h.context.telemetry.call_count(), 1);

    let stored: Value =
        serde_json::from_str(&h.storage.get(SETTINGS_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored["darkMode"], true);
    assert_eq!(stored["sessionTimeout"], 30);

    h.context.session.logout();

    assert!(!h.context.session.is_authenticated());
    assert_eq!(h.navigator.last_destination(), Some(Destination::Login));
    assert!(!h.context.telemetry.is_running());
    assert!(h.storage.get(TOKEN_KEY).unwrap().is_none());
    assert!(h.storage.get(USER_KEY).unwrap().is_none());
    assert!(h.storage.get(SETTINGS_KEY).unwrap().is_some());
}

#[tokio::test]
async fn bootstrap_restores_stored_session_when_backend_accepts_token() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/profile"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": {"id": "u1"}})))
        .expect(1)
        .mount(&server)
        .await;

    let first = harness(&server);
    first
        .context
        .session
        .login(&Credentials::new("ada@example.com", "pw"))
        .await
        .unwrap();

    // a fresh process over the same storage file
    let storage = Arc::new(JsonFileStore::open(&first.storage_path).unwrap());
    let api = Arc::new(HttpApiClient::new(server.uri(), Duration::from_secs(5)));
    let context = PortalContext::new(api, storage, Arc::new(LoggingNavigator::default()));

    let bootstrap = context.bootstrap().await;

    assert!(bootstrap.authenticated);
    assert_eq!(
        context.session.user_profile().map(|user| user.id),
        Some("u1".to_string())
    );
}

#[tokio::test]
async fn bootstrap_clears_session_when_backend_rejects_token() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/profile"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Token expired"})))
        .mount(&server)
        .await;

    let h = harness(&server);
    h.context
        .session
        .login(&Credentials::new("ada@example.com", "pw"))
        .await
        .unwrap();

    let bootstrap = h.context.bootstrap().await;

    assert!(!bootstrap.authenticated);
    assert!(h.storage.get(TOKEN_KEY).unwrap().is_none());
    assert_eq!(h.navigator.last_destination(), Some(Destination::Login));
}

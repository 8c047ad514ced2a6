//! User settings model and merge-over-defaults rules.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

/// Presentation theme derived from the `darkMode` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn from_dark_mode(dark_mode: bool) -> Self {
        if dark_mode { Theme::Dark } else { Theme::Light }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// User-configurable preferences.
///
/// Persisted under `appSettings` as a camelCase JSON object. Keys the client
/// does not know about are preserved in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub dark_mode: bool,
    pub notifications: bool,
    pub auto_refresh: bool,
    /// Minutes
    pub session_timeout: u32,
    /// Hours
    pub cache_duration: u32,
    pub api_base_url: String,
    /// Seconds
    pub request_timeout: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dark_mode: false,
            notifications: true,
            auto_refresh: false,
            session_timeout: 30,
            cache_duration: 2,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: 10,
            extra: Map::new(),
        }
    }
}

impl Settings {
    /// Merges a persisted partial object over the compiled-in defaults.
    ///
    /// Persisted values win per key. A value whose type does not fit its field
    /// is dropped and the default kept; the rejected keys are returned so the
    /// caller can report them.
    pub fn merge_over_defaults(persisted: &Map<String, Value>) -> (Settings, Vec<String>) {
        Settings::default().merged(persisted)
    }

    /// Applies `patch` over `self`, key by key.
    pub fn merged(&self, patch: &Map<String, Value>) -> (Settings, Vec<String>) {
        let mut current = self.clone();
        let mut rejected = Vec::new();
        for (key, value) in patch {
            match current.with_value(key, value.clone()) {
                Some(next) => current = next,
                None => rejected.push(key.clone()),
            }
        }
        (current, rejected)
    }

    /// Returns a copy with a single key replaced, or `None` when the value does
    /// not fit the key's type.
    pub fn with_value(&self, key: &str, value: Value) -> Option<Settings> {
        let mut map = self.to_map();
        map.insert(key.to_string(), value);
        serde_json::from_value(Value::Object(map)).ok()
    }

    /// Reads a single key as JSON, including keys held in `extra`.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.to_map().remove(key)
    }

    pub fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    pub fn theme(&self) -> Theme {
        Theme::from_dark_mode(self.dark_mode)
    }
}

/// The subset of settings synchronized to the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteSettings {
    pub theme: Theme,
    pub notifications: bool,
    pub auto_refresh: bool,
}

/// Request body for `PUT /api/settings`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoteSettingsPayload {
    pub settings: RemoteSettings,
}

impl From<&Settings> for RemoteSettingsPayload {
    fn from(settings: &Settings) -> Self {
        Self {
            settings: RemoteSettings {
                theme: settings.theme(),
                notifications: settings.notifications,
                auto_refresh: settings.auto_refresh,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_partial_object_keeps_other_defaults() {
        let (settings, rejected) =
            Settings::merge_over_defaults(&object(json!({"darkMode": true})));
        assert!(rejected.is_empty());
        assert_eq!(
            settings,
            Settings {
                dark_mode: true,
                ..Settings::default()
            }
        );
    }

    #[test]
    fn test_mistyped_value_falls_back_to_default() {
        let (settings, rejected) = Settings::merge_over_defaults(&object(json!({
            "sessionTimeout": "forever",
            "notifications": false
        })));
        assert_eq!(rejected, vec!["sessionTimeout".to_string()]);
        assert_eq!(settings.session_timeout, 30);
        assert!(!settings.notifications);
    }

    #[test]
    fn test_unknown_keys_are_preserved() {
        let (settings, rejected) =
            Settings::merge_over_defaults(&object(json!({"language": "fr"})));
        assert!(rejected.is_empty());
        assert_eq!(settings.get("language"), Some(json!("fr")));
        assert_eq!(settings.to_map()["language"], "fr");
    }

    #[test]
    fn test_empty_object_is_defaults() {
        let settings: Settings = serde_json::from_value(json!({})).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_remote_payload_is_reduced_subset() {
        let settings = Settings {
            dark_mode: true,
            auto_refresh: true,
            ..Settings::default()
        };
        let payload = RemoteSettingsPayload::from(&settings);
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"settings": {"theme": "dark", "notifications": true, "autoRefresh": true}})
        );
    }
}

//! UserProfile domain model.
//!
//! Represents the signed-in user as the backend describes it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// User profile domain model.
///
/// The known fields are typed; anything else the backend sends is kept in
/// `extra` so that a profile written to storage and read back is identical to
/// what the server returned. Profiles are never edited in place: a confirmed
/// server response replaces the whole value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Backend identifier (`_id` on Mongo-backed servers)
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Fields this client does not model
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    /// Returns "First Last" when both names are known, else the username.
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            _ => self.username.clone(),
        }
    }
}

/// Partial profile body for `PUT /api/profile`.
///
/// Only the fields that are set are sent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accepts_mongo_id_and_keeps_unknown_fields() {
        let profile: UserProfile = serde_json::from_value(json!({
            "_id": "65a1",
            "username": "ada",
            "email": "ada@example.com",
            "createdAt": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(profile.id, "65a1");
        assert_eq!(profile.extra["createdAt"], "2024-01-01T00:00:00Z");

        let written = serde_json::to_value(&profile).unwrap();
        assert_eq!(written["createdAt"], "2024-01-01T00:00:00Z");
        assert_eq!(written["id"], "65a1");
    }

    #[test]
    fn test_display_name() {
        let mut profile = UserProfile {
            username: "ada".to_string(),
            ..Default::default()
        };
        assert_eq!(profile.display_name(), "ada");

        profile.first_name = Some("Ada".to_string());
        profile.last_name = Some("Lovelace".to_string());
        assert_eq!(profile.display_name(), "Ada Lovelace");
    }

    #[test]
    fn test_profile_update_skips_unset_fields() {
        let update = ProfileUpdate {
            first_name: Some("Ada".to_string()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({"firstName": "Ada"}));
        assert!(!update.is_empty());
        assert!(ProfileUpdate::default().is_empty());
    }
}

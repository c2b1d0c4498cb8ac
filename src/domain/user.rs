use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Preferences blob stored alongside a user by the persistence service.
///
/// Only `dark_mode` is understood by the dashboard. Every other key is kept in
/// `extra` so that a load/save cycle never drops settings written by other
/// clients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(rename = "darkMode", default, skip_serializing_if = "Option::is_none")]
    pub dark_mode: Option<bool>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserPreferences {
    pub fn with_dark_mode(dark_mode: bool) -> Self {
        Self {
            dark_mode: Some(dark_mode),
            extra: Map::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dark_mode.is_none() && self.extra.is_empty()
    }

    /// Present fields of `other` overwrite ours, absent ones are kept.
    pub fn merge(&mut self, other: &UserPreferences) {
        if let Some(dark_mode) = other.dark_mode {
            self.dark_mode = Some(dark_mode);
        }
        for (key, value) in &other.extra {
            self.extra.insert(key.clone(), value.clone());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<UserPreferences>,
}

impl UserRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            email: String::new(),
            preferences: None,
        }
    }

    /// Preferences to merge into local state: empty when none are stored.
    pub fn preferences_or_default(&self) -> UserPreferences {
        self.preferences.clone().unwrap_or_default()
    }

    /// Apply a partial update. Fields left as `None` in `update` are untouched.
    pub fn apply(&mut self, update: &UserUpdate) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(email) = &update.email {
            self.email = email.clone();
        }
        if let Some(preferences) = &update.preferences {
            self.preferences = Some(preferences.clone());
        }
    }
}

/// Partial field set sent to `update_user`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<UserPreferences>,
}

impl UserUpdate {
    pub fn preferences(preferences: UserPreferences) -> Self {
        Self {
            preferences: Some(preferences),
            ..Default::default()
        }
    }
}

use super::Slice;
use crate::application::store::{Action, AsyncEvent, AsyncOperation, AsyncStatus};
use crate::domain::user::UserPreferences;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeState {
    pub dark_mode: bool,
    #[serde(flatten)]
    pub status: AsyncStatus,
}

impl Default for ThemeState {
    fn default() -> Self {
        Self {
            dark_mode: true,
            status: AsyncStatus::default(),
        }
    }
}

impl ThemeState {
    pub fn is_loading(&self) -> bool {
        self.status.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.status.error.as_deref()
    }

    /// Only `dark_mode` is read; an absent key keeps the current value.
    fn merge_preferences(&mut self, preferences: &UserPreferences) {
        if let Some(dark_mode) = preferences.dark_mode {
            self.dark_mode = dark_mode;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ThemeAction {
    ToggleDarkMode,
    SetDarkMode(bool),
    ClearError,
    LoadUserPreferences(AsyncEvent<UserPreferences>),
    SaveUserPreferences(AsyncEvent<UserPreferences>),
}

impl ThemeAction {
    pub fn kind(&self) -> &'static str {
        match self {
            ThemeAction::ToggleDarkMode => "theme/toggle_dark_mode",
            ThemeAction::SetDarkMode(_) => "theme/set_dark_mode",
            ThemeAction::ClearError => "theme/clear_error",
            ThemeAction::LoadUserPreferences(_) => LoadUserPreferences::NAME,
            ThemeAction::SaveUserPreferences(_) => SaveUserPreferences::NAME,
        }
    }
}

impl Slice for ThemeState {
    const NAME: &'static str = "theme";
    type Action = ThemeAction;

    fn reduce(&mut self, action: &ThemeAction) {
        match action {
            ThemeAction::ToggleDarkMode => self.dark_mode = !self.dark_mode,
            ThemeAction::SetDarkMode(dark_mode) => self.dark_mode = *dark_mode,
            ThemeAction::ClearError => self.status.clear_error(),
            ThemeAction::LoadUserPreferences(event) | ThemeAction::SaveUserPreferences(event) => {
                if let Some(preferences) = self.status.apply(&event.phase) {
                    self.merge_preferences(preferences);
                }
            }
        }
    }
}

/// Fetches the user's stored preferences and merges `dark_mode`.
pub struct LoadUserPreferences;

impl AsyncOperation for LoadUserPreferences {
    type Payload = UserPreferences;
    const NAME: &'static str = "theme/load_user_preferences";
    const FALLBACK_REASON: &'static str = "Failed to load user preferences";

    fn into_action(event: AsyncEvent<UserPreferences>) -> Action {
        Action::Theme(ThemeAction::LoadUserPreferences(event))
    }
}

/// Writes preferences; the payload echoes what was sent.
pub struct SaveUserPreferences;

impl AsyncOperation for SaveUserPreferences {
    type Payload = UserPreferences;
    const NAME: &'static str = "theme/save_user_preferences";
    const FALLBACK_REASON: &'static str = "Failed to save user preferences";

    fn into_action(event: AsyncEvent<UserPreferences>) -> Action {
        Action::Theme(ThemeAction::SaveUserPreferences(event))
    }
}

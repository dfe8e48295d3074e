//! User preference types.

use serde::{Deserialize, Serialize};

/// User preferences. Singleton record, created with defaults on first
/// access, mutated by partial merge, never deleted (only reset).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Display name.
    pub user_name: String,
    /// Currency symbol or code. Free-form; the UI offers a fixed palette
    /// but nothing is enforced here.
    pub currency: String,
    /// Avatar gradient style token.
    pub avatar_gradient: String,
    /// Master toggle consumed by the notification scheduler.
    pub notifications_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            user_name: "Usuario".to_string(),
            currency: "$".to_string(),
            avatar_gradient: "from-accent-purple to-accent-pink".to_string(),
            notifications_enabled: true,
        }
    }
}

/// Partial-field update for settings. `None` = leave unchanged.
#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    /// New display name.
    pub user_name: Option<String>,
    /// New currency symbol.
    pub currency: Option<String>,
    /// New avatar gradient token.
    pub avatar_gradient: Option<String>,
    /// New notification toggle.
    pub notifications_enabled: Option<bool>,
}

impl SettingsPatch {
    /// Applies the present fields onto `settings`.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(user_name) = &self.user_name {
            settings.user_name = user_name.clone();
        }
        if let Some(currency) = &self.currency {
            settings.currency = currency.clone();
        }
        if let Some(avatar_gradient) = &self.avatar_gradient {
            settings.avatar_gradient = avatar_gradient.clone();
        }
        if let Some(notifications_enabled) = self.notifications_enabled {
            settings.notifications_enabled = notifications_enabled;
        }
    }
}

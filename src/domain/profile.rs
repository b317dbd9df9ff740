//! User profile and settings
//!
//! The profile is persisted next to the habit collection under its own key.
//! Missing fields in a stored profile fall back to the defaults below.

use serde::{Deserialize, Serialize};
use crate::domain::DomainError;

const MAX_PROFILE_NAME_LEN: usize = 100;

/// Toggles shown on the settings page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Mirror the ledger to storage after every change
    pub persistence: bool,
    /// Keep an audit trail of changes in the log output
    pub audit: bool,
    /// Append a diagnostics footer to every tool result
    pub dev_console: bool,
    /// Emit the daily reminder for unlogged constructive habits
    pub notifications_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            persistence: true,
            audit: true,
            dev_console: false,
            notifications_enabled: true,
        }
    }
}

/// The user's profile record
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub name: String,
    /// Email synced from the identity provider; read-only for the user
    pub email: String,
    /// Avatar image as a data URL, already downscaled by the client
    pub avatar: Option<String>,
    pub settings: Settings,
}

/// Partial update of the profile; `None` leaves a field as it is
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub avatar: Option<Option<String>>,
    pub persistence: Option<bool>,
    pub audit: Option<bool>,
    pub dev_console: Option<bool>,
    pub notifications_enabled: Option<bool>,
}

impl UserConfig {
    /// Apply a partial update with validation
    ///
    /// Nothing is changed if any field fails validation.
    pub fn update(&mut self, update: ProfileUpdate) -> Result<(), DomainError> {
        let name = match update.name {
            Some(name) => Some(Self::validate_name(&name)?),
            None => None,
        };

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(avatar) = update.avatar {
            self.avatar = avatar;
        }
        if let Some(value) = update.persistence {
            self.settings.persistence = value;
        }
        if let Some(value) = update.audit {
            self.settings.audit = value;
        }
        if let Some(value) = update.dev_console {
            self.settings.dev_console = value;
        }
        if let Some(value) = update.notifications_enabled {
            self.settings.notifications_enabled = value;
        }
        Ok(())
    }

    fn validate_name(name: &str) -> Result<String, DomainError> {
        let trimmed = name.trim();
        if trimmed.chars().count() > MAX_PROFILE_NAME_LEN {
            return Err(DomainError::Validation {
                message: format!("Profile name cannot be longer than {} characters", MAX_PROFILE_NAME_LEN),
            });
        }
        Ok(trimmed.to_string())
    }
}

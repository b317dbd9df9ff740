//! Tools for the user profile and settings
//!
//! This module implements the profile_get and profile_update MCP tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use crate::domain::{ProfileUpdate, UserConfig};
use crate::tools::ToolError;

/// Parameters for reading the profile (none required)
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ProfileGetParams {}

/// Parameters for updating the profile; omitted fields stay unchanged
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ProfileUpdateParams {
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Avatar as an image data URL; an empty string removes it
    #[serde(default)]
    pub avatar: Option<String>,
    /// Persist the habit ledger after each change
    #[serde(default)]
    pub persistence: Option<bool>,
    /// Record an audit line for each change in the server log
    #[serde(default)]
    pub audit: Option<bool>,
    /// Append a diagnostics footer to tool results
    #[serde(default)]
    pub dev_console: Option<bool>,
    /// Daily reminders for unlogged constructive habits
    #[serde(default)]
    pub notifications_enabled: Option<bool>,
}

/// Response carrying the current profile
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub profile: UserConfig,
    pub changed: bool,
    pub message: String,
}

/// Read the profile
pub fn get_profile(profile: &UserConfig, _params: ProfileGetParams) -> Result<ProfileResponse, ToolError> {
    Ok(ProfileResponse {
        profile: profile.clone(),
        changed: false,
        message: describe(profile),
    })
}

/// Apply a partial profile update
pub fn update_profile(profile: &mut UserConfig, params: ProfileUpdateParams) -> Result<ProfileResponse, ToolError> {
    let before = profile.clone();
    profile.update(ProfileUpdate {
        name: params.name,
        avatar: params.avatar.map(|a| Some(a).filter(|a| !a.trim().is_empty())),
        persistence: params.persistence,
        audit: params.audit,
        dev_console: params.dev_console,
        notifications_enabled: params.notifications_enabled,
    })?;

    let changed = *profile != before;
    Ok(ProfileResponse {
        profile: profile.clone(),
        changed,
        message: if changed {
            format!("✅ Profile updated\n{}", describe(profile))
        } else {
            describe(profile)
        },
    })
}

fn describe(profile: &UserConfig) -> String {
    let on_off = |flag: bool| if flag { "on" } else { "off" };
    let name = if profile.name.is_empty() { "(not set)" } else { profile.name.as_str() };
    let email = if profile.email.is_empty() { "(not set)" } else { profile.email.as_str() };
    format!(
        "👤 **{}** <{}>\n- Avatar: {}\n- Persistence: {}\n- Audit: {}\n- Dev console: {}\n- Notifications: {}",
        name,
        email,
        if profile.avatar.is_some() { "set" } else { "none" },
        on_off(profile.settings.persistence),
        on_off(profile.settings.audit),
        on_off(profile.settings.dev_console),
        on_off(profile.settings.notifications_enabled)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_profile() {
        let mut profile = UserConfig::default();
        let response = update_profile(
            &mut profile,
            ProfileUpdateParams {
                name: Some("Robin".to_string()),
                avatar: Some("data:image/png;base64,AAAA".to_string()),
                notifications_enabled: Some(false),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(response.changed);
        assert_eq!(profile.name, "Robin");
        assert!(profile.avatar.is_some());
        assert!(response.message.contains("Notifications: off"));

        update_profile(&mut profile, ProfileUpdateParams { avatar: Some(String::new()), ..Default::default() }).unwrap();
        assert_eq!(profile.avatar, None);
    }

    #[test]
    fn test_unchanged_profile() {
        let mut profile = UserConfig::default();
        let response = update_profile(&mut profile, ProfileUpdateParams::default()).unwrap();
        assert!(!response.changed);
        assert!(get_profile(&profile, ProfileGetParams::default()).unwrap().message.contains("(not set)"));
    }
}

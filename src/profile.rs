//! Chat profile payloads and name resolution.
//!
//! The host page hands the engine a JSON array of profiles scraped from the
//! surrounding chat application. Profiles come in with wildly varying
//! completeness, so display names resolve through a fixed precedence chain
//! and only profiles with enough data to render become game actors.

use serde::Deserialize;

use crate::error::EngineError;

/// Contact card nested inside a profile. Field names follow the host
/// payload's camelCase.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactRecord {
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub pushname: Option<String>,
    pub phone_number: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileRecord {
    pub id: String,
    pub name: Option<String>,
    pub contact: Option<ContactRecord>,
    pub avatar_url: Option<String>,
}

impl ProfileRecord {
    /// Best available human-readable name: profile name, then the contact's
    /// full name, short name, self-set pushname, phone number, and finally a
    /// placeholder.
    pub fn display_name(&self) -> String {
        if let Some(name) = non_empty(self.name.as_deref()) {
            return name.to_string();
        }
        if let Some(contact) = &self.contact {
            if let Some(name) = non_empty(contact.name.as_deref()) {
                return name.to_string();
            }
            if let Some(name) = non_empty(contact.short_name.as_deref()) {
                return name.to_string();
            }
            if let Some(name) = non_empty(contact.pushname.as_deref()) {
                return name.to_string();
            }
            if let Some(phone) = contact.phone_number {
                return phone.to_string();
            }
        }
        "Unknown".to_string()
    }

    /// A profile can be rendered when it carries an avatar and some actual
    /// name. A bare phone number keeps a profile out of the game even though
    /// [`Self::display_name`] would fall back to it.
    pub fn is_displayable(&self) -> bool {
        let has_name = non_empty(self.name.as_deref()).is_some()
            || self.contact.as_ref().is_some_and(|c| {
                non_empty(c.name.as_deref()).is_some()
                    || non_empty(c.short_name.as_deref()).is_some()
                    || non_empty(c.pushname.as_deref()).is_some()
            });
        has_name && non_empty(self.avatar_url.as_deref()).is_some()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Resolved profile ready to drive an actor.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayableProfile {
    pub id: String,
    pub display_name: String,
    pub avatar_url: String,
}

/// Payload shape handed over by the host: every chat's profile plus the
/// local user's own.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ProfilePayload {
    profiles: Vec<ProfileRecord>,
    me: Option<ProfileRecord>,
}

/// All profiles of the current chat, split into the local player and the
/// enemy candidate pool.
#[derive(Debug, Default)]
pub struct ProfileDirectory {
    profiles: Vec<ProfileRecord>,
    me: Option<ProfileRecord>,
}

impl ProfileDirectory {
    pub fn from_json(payload: &str) -> Result<Self, EngineError> {
        let payload: ProfilePayload = serde_json::from_str(payload)?;
        log::info!("loaded {} chat profiles", payload.profiles.len());
        Ok(Self {
            profiles: payload.profiles,
            me: payload.me,
        })
    }

    /// The local user's profile, if present and displayable.
    pub fn player(&self) -> Option<DisplayableProfile> {
        self.me.as_ref().and_then(resolve_displayable)
    }

    /// Displayable enemy profiles, in payload order.
    pub fn enemy_candidates(&self) -> Vec<DisplayableProfile> {
        self.profiles.iter().filter_map(resolve_displayable).collect()
    }
}

fn resolve_displayable(record: &ProfileRecord) -> Option<DisplayableProfile> {
    if !record.is_displayable() {
        return None;
    }
    Some(DisplayableProfile {
        id: record.id.clone(),
        display_name: record.display_name(),
        avatar_url: record.avatar_url.clone()?,
    })
}

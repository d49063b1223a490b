//! Stored record shapes and their keys

use serde::{Deserialize, Serialize};

use crate::protocol::{PlayerId, SessionPayload};

const SESSION_PREFIX: &str = "roast_session";
const PASSWORD_PREFIX: &str = "roast_password";

/// Storage keys for one room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub session: String,
    pub password: String,
}

impl StorageKeys {
    /// `roast_session:<room>` / `roast_password:<room>`, or the bare
    /// prefixes when the page has no room id
    pub fn for_room(room_id: Option<&str>) -> Self {
        match room_id.filter(|r| !r.is_empty()) {
            Some(room) => Self {
                session: format!("{SESSION_PREFIX}:{room}"),
                password: format!("{PASSWORD_PREFIX}:{room}"),
            },
            None => Self {
                session: SESSION_PREFIX.to_string(),
                password: PASSWORD_PREFIX.to_string(),
            },
        }
    }
}

/// Who this browser played as in the room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(default)]
    pub player_id: Option<PlayerId>,
    #[serde(default)]
    pub username: Option<String>,
}

impl SessionRecord {
    /// The record as a restore payload, if every field is present and non-empty
    pub fn validated(&self) -> Option<SessionPayload> {
        let player_id = self.player_id.clone().filter(PlayerId::is_present)?;
        let username = self.username.clone().filter(|u| !u.is_empty())?;
        Some(SessionPayload {
            player_id,
            username,
        })
    }
}

impl From<&SessionPayload> for SessionRecord {
    fn from(payload: &SessionPayload) -> Self {
        Self {
            player_id: Some(payload.player_id.clone()),
            username: Some(payload.username.clone()),
        }
    }
}

/// Room password already accepted in this browser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordRecord {
    #[serde(default)]
    pub password_verified: bool,
}

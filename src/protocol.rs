//! Events exchanged with the server-side game collaborator
//!
//! Inbound events arrive as `(name, JSON payload)` from the push channel and
//! are validated here; anything that fails validation is dropped by the
//! caller. Outbound events are serialized the same way.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PayloadError;

/// Player identity as the server sends it: numeric or textual
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlayerId {
    Number(i64),
    Text(String),
}

impl PlayerId {
    /// Zero and empty strings count as missing
    pub fn is_present(&self) -> bool {
        match self {
            PlayerId::Number(n) => *n != 0,
            PlayerId::Text(s) => !s.is_empty(),
        }
    }
}

/// Identity pushed by the server after a successful join
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPayload {
    pub player_id: PlayerId,
    pub username: String,
}

/// Server → client
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    PersistSession(SessionPayload),
    PersistPassword,
    /// Confirmed damage
    Hit,
    /// Confirmed miss
    Miss,
}

#[derive(Deserialize)]
struct RawSession {
    player_id: Option<PlayerId>,
    username: Option<String>,
}

#[derive(Deserialize)]
struct RawPassword {
    password_verified: Option<Value>,
}

impl Inbound {
    /// Validate a pushed event
    pub fn parse(name: &str, payload: &str) -> Result<Self, PayloadError> {
        match name {
            "persist_session" => {
                let event = "persist_session";
                let raw: RawSession = decode(event, payload)?;
                let player_id = raw
                    .player_id
                    .filter(PlayerId::is_present)
                    .ok_or(PayloadError::MissingField {
                        event,
                        field: "player_id",
                    })?;
                let username = raw
                    .username
                    .filter(|u| !u.is_empty())
                    .ok_or(PayloadError::MissingField {
                        event,
                        field: "username",
                    })?;
                Ok(Inbound::PersistSession(SessionPayload {
                    player_id,
                    username,
                }))
            }
            "persist_password" => {
                let event = "persist_password";
                let raw: RawPassword = decode(event, payload)?;
                match raw.password_verified {
                    Some(Value::Bool(true)) => Ok(Inbound::PersistPassword),
                    _ => Err(PayloadError::MissingField {
                        event,
                        field: "password_verified",
                    }),
                }
            }
            "hit" => {
                decode::<Value>("hit", payload)?;
                Ok(Inbound::Hit)
            }
            "miss" => {
                decode::<Value>("miss", payload)?;
                Ok(Inbound::Miss)
            }
            other => Err(PayloadError::UnknownEvent(other.to_string())),
        }
    }
}

fn decode<T: for<'de> Deserialize<'de>>(
    event: &'static str,
    payload: &str,
) -> Result<T, PayloadError> {
    serde_json::from_str(payload).map_err(|source| PayloadError::Malformed { event, source })
}

/// Reported when a projectile reaches the core
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitAttempt {
    /// Fraction of surface width
    pub x: f32,
    /// Fraction of surface height
    pub y: f32,
    pub forced_hit: bool,
}

/// Client → server
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    RestorePassword,
    RestoreSession(SessionPayload),
    HitAttempt(HitAttempt),
}

impl Outbound {
    pub fn name(&self) -> &'static str {
        match self {
            Outbound::RestorePassword => "restore_password",
            Outbound::RestoreSession(_) => "restore_session",
            Outbound::HitAttempt(_) => "hit_attempt",
        }
    }

    pub fn payload(&self) -> Value {
        match self {
            Outbound::RestorePassword => serde_json::json!({ "password_verified": true }),
            Outbound::RestoreSession(session) => serde_json::json!({
                "player_id": session.player_id,
                "username": session.username,
            }),
            Outbound::HitAttempt(hit) => serde_json::json!({
                "x": hit.x,
                "y": hit.y,
                "forced_hit": hit.forced_hit,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persist_session_requires_both_fields() {
        let ok = Inbound::parse("persist_session", r#"{"player_id": "p-1", "username": "ann"}"#);
        assert!(matches!(ok, Ok(Inbound::PersistSession(_))));

        let numeric = Inbound::parse("persist_session", r#"{"player_id": 7, "username": "ann"}"#);
        assert_eq!(
            numeric.unwrap(),
            Inbound::PersistSession(SessionPayload {
                player_id: PlayerId::Number(7),
                username: "ann".into(),
            })
        );

        for bad in [
            r#"{"username": "ann"}"#,
            r#"{"player_id": "", "username": "ann"}"#,
            r#"{"player_id": 0, "username": "ann"}"#,
            r#"{"player_id": "p-1"}"#,
            r#"{"player_id": "p-1", "username": ""}"#,
            r#"null"#,
        ] {
            assert!(Inbound::parse("persist_session", bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_persist_password_requires_true() {
        assert_eq!(
            Inbound::parse("persist_password", r#"{"password_verified": true}"#).unwrap(),
            Inbound::PersistPassword
        );
        assert!(Inbound::parse("persist_password", r#"{"password_verified": false}"#).is_err());
        assert!(Inbound::parse("persist_password", r#"{}"#).is_err());
    }

    #[test]
    fn test_hit_and_miss_ignore_contents() {
        assert_eq!(Inbound::parse("hit", r#"{"health": 3}"#).unwrap(), Inbound::Hit);
        assert_eq!(Inbound::parse("miss", "{}").unwrap(), Inbound::Miss);
        assert!(Inbound::parse("hit", "not json").is_err());
    }

    #[test]
    fn test_unknown_event() {
        assert!(matches!(
            Inbound::parse("explode", "{}"),
            Err(PayloadError::UnknownEvent(_))
        ));
    }

    #[test]
    fn test_outbound_wire_shape() {
        let hit = Outbound::HitAttempt(HitAttempt {
            x: 0.5,
            y: 0.25,
            forced_hit: true,
        });
        assert_eq!(hit.name(), "hit_attempt");
        assert_eq!(
            hit.payload(),
            serde_json::json!({"x": 0.5, "y": 0.25, "forced_hit": true})
        );

        let session = Outbound::RestoreSession(SessionPayload {
            player_id: PlayerId::Text("p-1".into()),
            username: "ann".into(),
        });
        assert_eq!(
            session.payload(),
            serde_json::json!({"player_id": "p-1", "username": "ann"})
        );
        assert_eq!(
            Outbound::RestorePassword.payload(),
            serde_json::json!({"password_verified": true})
        );
    }
}

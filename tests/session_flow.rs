//! Session restore and persistence through the page hook lifecycle

use roast_arena::platform::headless::{MemoryStore, RecordingChannel};
use roast_arena::protocol::{PlayerId, SessionPayload};
use roast_arena::{Hook, Inbound, Outbound, SessionKeeper};

fn keeper<'a>(
    store: &'a mut MemoryStore,
    room: Option<&str>,
) -> SessionKeeper<&'a mut MemoryStore, RecordingChannel> {
    SessionKeeper::new(store, RecordingChannel::default(), room)
}

/// Parse the way the page forwards events, then hand them to the keeper
fn push(k: &mut SessionKeeper<&mut MemoryStore, RecordingChannel>, name: &str, payload: &str) {
    if let Ok(event) = Inbound::parse(name, payload) {
        k.on_event(event);
    }
}

#[test]
fn record_without_username_is_not_restored() {
    let mut store = MemoryStore::new()
        .with_entry("roast_session:r9", r#"{"player_id": "p-1"}"#)
        .with_entry("roast_password:r9", r#"{"password_verified": true}"#);
    let mut k = keeper(&mut store, Some("r9"));
    k.attach(0.0);
    assert_eq!(k.channel().sent, vec![Outbound::RestorePassword]);
}

#[test]
fn empty_fields_are_not_restored() {
    let mut store = MemoryStore::new()
        .with_entry("roast_session", r#"{"player_id": "", "username": "ann"}"#);
    let mut k = keeper(&mut store, None);
    k.attach(0.0);
    assert!(k.channel().sent.is_empty());

    let mut store = MemoryStore::new()
        .with_entry("roast_session", r#"{"player_id": 0, "username": "ann"}"#);
    let mut k = keeper(&mut store, None);
    k.attach(0.0);
    assert!(k.channel().sent.is_empty());
}

#[test]
fn persisted_records_round_trip_through_a_remount() {
    let mut store = MemoryStore::new();
    {
        let mut k = keeper(&mut store, Some("lobby"));
        k.attach(0.0);
        push(&mut k, "persist_password", r#"{"password_verified": true}"#);
        push(&mut k, "persist_session", r#"{"player_id": 12, "username": "bo"}"#);
        k.detach();
    }

    let mut k = keeper(&mut store, Some("lobby"));
    k.attach(0.0);
    assert_eq!(
        k.channel().sent,
        vec![
            Outbound::RestorePassword,
            Outbound::RestoreSession(SessionPayload {
                player_id: PlayerId::Number(12),
                username: "bo".into(),
            }),
        ]
    );
    assert_eq!(k.channel().sent[1].payload()["player_id"], 12);
}

#[test]
fn malformed_persist_events_change_nothing() {
    let mut store = MemoryStore::new();
    {
        let mut k = keeper(&mut store, None);
        k.attach(0.0);
        push(&mut k, "persist_session", r#"{"player_id": "p-1"}"#);
        push(&mut k, "persist_session", r#"{"player_id": "p-1", "username": ""}"#);
        push(&mut k, "persist_password", r#"{"password_verified": false}"#);
        push(&mut k, "persist_password", "not json");
    }
    assert!(store.entries.is_empty());
}

#[test]
fn storage_failures_never_surface() {
    let mut store = MemoryStore::new()
        .with_entry("roast_password", r#"{"password_verified": true}"#);
    store.fail_reads = true;
    store.fail_writes = true;

    let mut k = keeper(&mut store, None);
    k.attach(0.0);
    assert!(k.channel().sent.is_empty());
    push(&mut k, "persist_password", r#"{"password_verified": true}"#);
    k.detach();
}

#[test]
fn room_scoping_uses_default_keys_without_a_room() {
    let mut store = MemoryStore::new();
    {
        let mut k = keeper(&mut store, Some(""));
        k.attach(0.0);
        push(&mut k, "persist_password", r#"{"password_verified": true}"#);
    }
    assert!(store.entries.contains_key("roast_password"));
}

#[test]
fn events_after_detach_are_ignored() {
    let mut store = MemoryStore::new();
    {
        let mut k = keeper(&mut store, None);
        k.attach(0.0);
        k.detach();
        push(&mut k, "persist_password", r#"{"password_verified": true}"#);
    }
    assert!(store.entries.is_empty());
}

//! Session restore/persist hook
//!
//! On attach, asks the server to restore whatever this browser stored for
//! the room. Afterwards, stores what the server tells it to persist.

use crate::hook::Hook;
use crate::persistence::SessionVault;
use crate::platform::{Channel, KeyValueStore};
use crate::protocol::Inbound;

pub struct SessionKeeper<K: KeyValueStore, C: Channel> {
    vault: SessionVault<K>,
    channel: C,
    attached: bool,
}

impl<K: KeyValueStore, C: Channel> SessionKeeper<K, C> {
    pub fn new(store: K, channel: C, room_id: Option<&str>) -> Self {
        Self {
            vault: SessionVault::new(store, room_id),
            channel,
            attached: false,
        }
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn vault(&self) -> &SessionVault<K> {
        &self.vault
    }

    /// Handle a validated server event; gameplay events are not ours
    pub fn on_event(&mut self, event: Inbound) {
        if !self.attached {
            return;
        }
        match event {
            Inbound::PersistSession(payload) => self.vault.persist_session(&payload),
            Inbound::PersistPassword => self.vault.persist_password(),
            Inbound::Hit | Inbound::Miss => {}
        }
    }
}

impl<K: KeyValueStore, C: Channel> Hook for SessionKeeper<K, C> {
    fn attach(&mut self, _now_ms: f64) {
        self.attached = true;
        for request in self.vault.restore_requests() {
            log::info!("Requesting {}", request.name());
            self.channel.push(request);
        }
    }

    fn detach(&mut self) {
        self.attached = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::{MemoryStore, RecordingChannel};
    use crate::protocol::{Outbound, PlayerId, SessionPayload};

    #[test]
    fn test_events_before_attach_are_ignored() {
        let mut keeper = SessionKeeper::new(MemoryStore::new(), RecordingChannel::default(), None);
        keeper.on_event(Inbound::PersistPassword);
        assert!(keeper.vault().store().entries.is_empty());
    }

    #[test]
    fn test_persist_then_reattach_restores() {
        let mut store = MemoryStore::new();
        {
            let mut keeper =
                SessionKeeper::new(&mut store, RecordingChannel::default(), Some("r"));
            keeper.attach(0.0);
            assert!(keeper.channel().sent.is_empty());
            keeper.on_event(Inbound::PersistSession(SessionPayload {
                player_id: PlayerId::Number(3),
                username: "di".into(),
            }));
            keeper.detach();
        }

        let mut keeper = SessionKeeper::new(&mut store, RecordingChannel::default(), Some("r"));
        keeper.attach(0.0);
        assert_eq!(
            keeper.channel().sent,
            vec![Outbound::RestoreSession(SessionPayload {
                player_id: PlayerId::Number(3),
                username: "di".into(),
            })]
        );
    }
}

//! Session/password storage with failure suppression

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::records::{PasswordRecord, SessionRecord, StorageKeys};
use crate::error::StorageError;
use crate::platform::KeyValueStore;
use crate::protocol::{Outbound, SessionPayload};

/// Reads and writes the records of one room
pub struct SessionVault<K: KeyValueStore> {
    store: K,
    keys: StorageKeys,
}

impl<K: KeyValueStore> SessionVault<K> {
    pub fn new(store: K, room_id: Option<&str>) -> Self {
        Self {
            store,
            keys: StorageKeys::for_room(room_id),
        }
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    /// Restore requests for whatever is stored, password first
    ///
    /// Missing, corrupt, incomplete or unreadable records produce nothing.
    pub fn restore_requests(&self) -> Vec<Outbound> {
        let mut requests = Vec::new();

        let password: Option<PasswordRecord> = self.read(&self.keys.password);
        if password.is_some_and(|p| p.password_verified) {
            requests.push(Outbound::RestorePassword);
        }

        let session: Option<SessionRecord> = self.read(&self.keys.session);
        if let Some(payload) = session.as_ref().and_then(SessionRecord::validated) {
            requests.push(Outbound::RestoreSession(payload));
        }

        requests
    }

    pub fn persist_session(&mut self, payload: &SessionPayload) {
        let key = self.keys.session.clone();
        self.write(&key, &SessionRecord::from(payload));
    }

    pub fn persist_password(&mut self) {
        let key = self.keys.password.clone();
        self.write(
            &key,
            &PasswordRecord {
                password_verified: true,
            },
        );
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let result = self.store.get(key).and_then(|raw| match raw {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|source| StorageError::Corrupt {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        });
        match result {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Treating stored value as absent: {e}");
                None
            }
        }
    }

    fn write<T: Serialize>(&mut self, key: &str, record: &T) {
        let result = serde_json::to_string(record)
            .map_err(StorageError::from)
            .and_then(|json| self.store.set(key, &json));
        match result {
            Ok(()) => log::info!("Persisted `{key}`"),
            Err(e) => log::warn!("Could not persist `{key}`: {e}"),
        }
    }
}

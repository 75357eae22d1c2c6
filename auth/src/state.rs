//! Challenge and session state, and the keyed stores that hold them.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single-use login challenge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    /// Unguessable identifier the client echoes back.
    pub id: String,
    /// The user the challenge was issued to.
    pub username: String,
    /// Random nonce the client must sign, as text.
    pub message: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Challenge {
    /// Bytes covered by the client's signature.
    pub fn message_bytes(&self) -> &[u8] {
        self.message.as_bytes()
    }

    /// A challenge is dead from `expires_at` onwards, so a zero TTL never
    /// yields an answerable challenge.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// An authenticated login. Sessions do not expire on their own; they live
/// until revoked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub issued_at: DateTime<Utc>,
}

/// Map from opaque id to protocol state.
///
/// Every method is one critical section, so lookup-and-delete sequences
/// such as [`KeyedStore::take`] cannot interleave with other callers.
pub trait KeyedStore<V>: Send + Sync {
    /// Inserts unless `key` is present; `false` means it was.
    fn insert_if_absent(&self, key: String, value: V) -> bool;

    fn get(&self, key: &str) -> Option<V>;

    /// Removes and returns the entry, if any.
    fn take(&self, key: &str) -> Option<V>;

    /// Drops every entry for which `keep` returns false, returning how many
    /// were dropped.
    fn retain(&self, keep: &dyn Fn(&V) -> bool) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An in-process [`KeyedStore`] guarded by one mutex.
#[derive(Debug)]
pub struct MemoryStore<V> {
    entries: Mutex<HashMap<String, V>>,
}

impl<V> MemoryStore<V> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<V> Default for MemoryStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send> KeyedStore<V> for MemoryStore<V> {
    fn insert_if_absent(&self, key: String, value: V) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.contains_key(&key) {
            return false;
        }
        entries.insert(key, value);
        true
    }

    fn get(&self, key: &str) -> Option<V> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn take(&self, key: &str) -> Option<V> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
    }

    fn retain(&self, keep: &dyn Fn(&V) -> bool) -> usize {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|_, value| keep(value));
        before - entries.len()
    }

    fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

//! User records and the pluggable store that owns them.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use elgamal::PublicKey;
use serde::{Deserialize, Serialize};

/// A registered user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    /// Opaque output of a [`crate::CredentialHasher`].
    pub credential: String,
    pub public_key: PublicKey,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl UserRecord {
    pub fn new(
        username: impl Into<String>,
        credential: String,
        public_key: PublicKey,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            username: username.into(),
            credential,
            public_key,
            created_at,
            last_login_at: None,
        }
    }
}

/// Persistent user storage keyed by username.
///
/// Implementations must make [`UserStore::insert`] atomic: two concurrent
/// inserts for the same username can never both return `true`.
pub trait UserStore: Send + Sync {
    fn exists(&self, username: &str) -> bool;

    /// Inserts `record` unless its username is taken; `false` means it was.
    fn insert(&self, record: UserRecord) -> bool;

    fn get(&self, username: &str) -> Option<UserRecord>;

    /// Records a successful login. Unknown usernames are ignored.
    fn touch_last_login(&self, username: &str, at: DateTime<Utc>);

    fn list_users(&self) -> Vec<UserRecord>;
}

/// A [`UserStore`] backed by a `HashMap` behind a single `RwLock`.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserStore for InMemoryUserStore {
    fn exists(&self, username: &str) -> bool {
        self.users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(username)
    }

    fn insert(&self, record: UserRecord) -> bool {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        match users.entry(record.username.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(record);
                true
            }
        }
    }

    fn get(&self, username: &str) -> Option<UserRecord> {
        self.users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(username)
            .cloned()
    }

    fn touch_last_login(&self, username: &str, at: DateTime<Utc>) {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(user) = users.get_mut(username) {
            user.last_login_at = Some(at);
        }
    }

    fn list_users(&self) -> Vec<UserRecord> {
        let mut users: Vec<UserRecord> = self
            .users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        users
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use elgamal::BigUint;

    fn record(name: &str) -> UserRecord {
        let p = BigUint::from(2579u32);
        let g = BigUint::from(2u32);
        let y = BigUint::from(949u32);
        let key = PublicKey::from_parts(p, g, y).unwrap();
        UserRecord::new(name, "credential".to_string(), key, Utc::now())
    }

    #[test]
    fn test_insert_is_conditional() {
        let store = InMemoryUserStore::new();
        assert!(store.insert(record("alice")));
        assert!(!store.insert(record("alice")));
        assert!(store.exists("alice"));
        assert!(!store.exists("bob"));
        assert_eq!(store.list_users().len(), 1);
    }

    #[test]
    fn test_touch_last_login() {
        let store = InMemoryUserStore::new();
        store.insert(record("alice"));
        assert_eq!(store.get("alice").unwrap().last_login_at, None);

        let at = Utc::now();
        store.touch_last_login("alice", at);
        store.touch_last_login("nobody", at);
        assert_eq!(store.get("alice").unwrap().last_login_at, Some(at));
        assert!(store.get("nobody").is_none());
    }

    #[test]
    fn test_list_users_sorted() {
        let store = InMemoryUserStore::new();
        for name in ["carol", "alice", "bob"] {
            store.insert(record(name));
        }
        let names: Vec<String> = store.list_users().into_iter().map(|u| u.username).collect();
        assert_eq!(names, ["alice", "bob", "carol"]);
    }

    #[test]
    fn test_concurrent_inserts_admit_one() {
        let store = InMemoryUserStore::new();
        let wins = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| store.insert(record("race"))))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or(false))
                .filter(|&won| won)
                .count()
        });
        assert_eq!(wins, 1);
    }
}

//! In-process account store.

use crate::{
    error::StoreError,
    models::{NewUser, User},
};
use chrono::Utc;
use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, Mutex, MutexGuard},
};

#[derive(Default)]
struct UserTable {
    last_id: i64,
    rows: BTreeMap<i64, User>,
    by_username: HashMap<String, i64>,
}

/// Thread-safe user table with a unique index on `username`
///
/// Clones share the same underlying table.
#[derive(Clone, Default)]
pub struct UserStore {
    table: Arc<Mutex<UserTable>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, UserTable>, StoreError> {
        self.table.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Insert a user, enforcing username uniqueness under the same lock
    pub fn insert(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut table = self.lock()?;
        if table.by_username.contains_key(&new_user.username) {
            return Err(StoreError::DuplicateUsername);
        }

        table.last_id += 1;
        let user = User {
            id: table.last_id,
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            role: new_user.role,
            date_joined: Utc::now(),
        };
        table.by_username.insert(user.username.clone(), user.id);
        table.rows.insert(user.id, user.clone());
        Ok(user)
    }

    pub fn get(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.lock()?.rows.get(&id).cloned())
    }

    pub fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let table = self.lock()?;
        Ok(table
            .by_username
            .get(username)
            .and_then(|id| table.rows.get(id))
            .cloned())
    }

    pub fn username_exists(&self, username: &str) -> Result<bool, StoreError> {
        Ok(self.lock()?.by_username.contains_key(username))
    }

    pub fn count(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "hash".to_string(),
            role: Role::Regular,
        }
    }

    #[test]
    fn test_insert_assigns_sequential_ids() {
        let store = UserStore::new();
        let first = store.insert(new_user("alice")).unwrap();
        let second = store.insert(new_user("bob")).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.count().unwrap(), 2);
        assert_eq!(store.get(2).unwrap().unwrap().username, "bob");
    }

    #[test]
    fn test_duplicate_username_is_rejected() {
        let store = UserStore::new();
        store.insert(new_user("alice")).unwrap();

        let err = store.insert(new_user("alice")).unwrap_err();
        assert_eq!(err, StoreError::DuplicateUsername);
        assert_eq!(store.count().unwrap(), 1, "Rejected insert must not add a row");
    }

    #[test]
    fn test_username_lookup_is_exact() {
        let store = UserStore::new();
        store.insert(new_user("alice")).unwrap();

        assert!(store.find_by_username("alice").unwrap().is_some());
        assert!(store.find_by_username("Alice").unwrap().is_none());
        assert!(store.username_exists("alice").unwrap());
        assert!(!store.username_exists("carol").unwrap());
    }

    #[test]
    fn test_clones_share_rows() {
        let store = UserStore::new();
        let handle = store.clone();
        handle.insert(new_user("alice")).unwrap();
        assert_eq!(store.count().unwrap(), 1);
    }
}

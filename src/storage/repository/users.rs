// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Alumnet

//! User account repository.
//!
//! Accounts are created by seeding or by an admin; self-registration is
//! disabled. An account is deleted only through the cascading admin delete
//! of its linked alumni profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use super::super::{DocumentStore, StorageError, StorageResult};

/// User account document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredUser {
    /// Unique user identifier (UUID)
    pub id: String,
    /// Unique login name, stored normalized
    pub username: String,
    /// Argon2-encoded password hash
    pub password_hash: String,
    /// Administrative privileges flag
    pub is_admin: bool,
    /// Alumni profile this account owns, if any
    pub linked_profile_id: Option<String>,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Normalize a username for storage and lookup.
///
/// NFKC folding plus lowercasing, so visually identical names collide
/// instead of coexisting.
pub fn normalize_username(username: &str) -> String {
    username.trim().nfkc().collect::<String>().to_lowercase()
}

/// Repository for user account documents.
pub struct UserRepository<'a> {
    store: &'a DocumentStore,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository.
    pub fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Check if a user exists.
    pub fn exists(&self, user_id: &str) -> bool {
        self.store.exists(self.store.paths().user(user_id))
    }

    /// Get a user by ID.
    pub fn get(&self, user_id: &str) -> StorageResult<StoredUser> {
        let path = self.store.paths().user(user_id);
        if !self.store.exists(&path) {
            return Err(StorageError::NotFound(format!("User {user_id}")));
        }
        self.store.read_json(path)
    }

    /// Create a new user.
    ///
    /// The username must not already be taken (after normalization).
    pub fn create(&self, user: &StoredUser) -> StorageResult<()> {
        if self.exists(&user.id) {
            return Err(StorageError::AlreadyExists(format!("User {}", user.id)));
        }
        if self.find_by_username(&user.username)?.is_some() {
            return Err(StorageError::AlreadyExists(format!(
                "Username {}",
                user.username
            )));
        }

        self.store
            .write_json(self.store.paths().user(&user.id), user)
    }

    /// Update an existing user.
    pub fn update(&self, user: &StoredUser) -> StorageResult<()> {
        if !self.exists(&user.id) {
            return Err(StorageError::NotFound(format!("User {}", user.id)));
        }
        self.store
            .write_json(self.store.paths().user(&user.id), user)
    }

    /// Delete a user.
    pub fn delete(&self, user_id: &str) -> StorageResult<()> {
        if !self.exists(user_id) {
            return Err(StorageError::NotFound(format!("User {user_id}")));
        }
        self.store.delete(self.store.paths().user(user_id))
    }

    /// Find a user by username (normalized comparison).
    pub fn find_by_username(&self, username: &str) -> StorageResult<Option<StoredUser>> {
        let wanted = normalize_username(username);
        for user in self.list_all()? {
            if normalize_username(&user.username) == wanted {
                return Ok(Some(user));
            }
        }
        Ok(None)
    }

    /// Find the user owning a given alumni profile.
    pub fn find_by_profile(&self, profile_id: &str) -> StorageResult<Option<StoredUser>> {
        for user in self.list_all()? {
            if user.linked_profile_id.as_deref() == Some(profile_id) {
                return Ok(Some(user));
            }
        }
        Ok(None)
    }

    /// List all users (admin view).
    pub fn list_all(&self) -> StorageResult<Vec<StoredUser>> {
        let ids = self.store.list_documents(self.store.paths().users_dir())?;

        let mut users = Vec::new();
        for id in ids {
            if let Ok(user) = self.get(&id) {
                users.push(user);
            }
        }

        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoragePaths;
    use tempfile::TempDir;

    fn setup() -> (TempDir, DocumentStore) {
        let temp = TempDir::new().unwrap();
        let mut store = DocumentStore::new(StoragePaths::new(temp.path()));
        store.initialize().unwrap();
        (temp, store)
    }

    fn test_user(id: &str, username: &str) -> StoredUser {
        StoredUser {
            id: id.to_string(),
            username: username.to_string(),
            password_hash: "$argon2i$fake".to_string(),
            is_admin: false,
            linked_profile_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn create_and_get_user() {
        let (_temp, store) = setup();
        let repo = UserRepository::new(&store);

        let user = test_user("u1", "ada");
        repo.create(&user).unwrap();

        let loaded = repo.get("u1").unwrap();
        assert_eq!(loaded, user);
    }

    #[test]
    fn duplicate_username_is_rejected() {
        let (_temp, store) = setup();
        let repo = UserRepository::new(&store);

        repo.create(&test_user("u1", "ada")).unwrap();

        // Same name with different case and surrounding whitespace.
        let result = repo.create(&test_user("u2", "  Ada "));
        assert!(matches!(result, Err(StorageError::AlreadyExists(_))));
    }

    #[test]
    fn find_by_username_normalizes() {
        let (_temp, store) = setup();
        let repo = UserRepository::new(&store);

        repo.create(&test_user("u1", "ada")).unwrap();

        let found = repo.find_by_username("ADA").unwrap();
        assert_eq!(found.map(|u| u.id), Some("u1".to_string()));

        assert!(repo.find_by_username("grace").unwrap().is_none());
    }

    #[test]
    fn find_by_profile_matches_linkage() {
        let (_temp, store) = setup();
        let repo = UserRepository::new(&store);

        let mut user = test_user("u1", "ada");
        user.linked_profile_id = Some("p1".to_string());
        repo.create(&user).unwrap();
        repo.create(&test_user("u2", "grace")).unwrap();

        let found = repo.find_by_profile("p1").unwrap();
        assert_eq!(found.map(|u| u.id), Some("u1".to_string()));
        assert!(repo.find_by_profile("p2").unwrap().is_none());
    }

    #[test]
    fn delete_missing_user_errors() {
        let (_temp, store) = setup();
        let repo = UserRepository::new(&store);

        let result = repo.delete("missing");
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }
}

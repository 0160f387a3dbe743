// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Alumnet

//! Alumni profile repository.
//!
//! A profile is the public alumni record. Beyond the fixed columns it
//! carries a free-form `fields` object (degree, company, location, ...);
//! string leaves of that object are sanitized before persistence at the
//! handler layer. The per-profile bookmark count is not stored here: it is
//! computed from the ledger at response time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::{DocumentStore, StorageError, StorageResult};

/// Alumni profile document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredProfile {
    /// Unique profile identifier (UUID)
    pub id: String,
    /// Display name
    pub name: String,
    /// Free-form alumni attributes (JSON object)
    pub fields: serde_json::Value,
    /// Hidden profiles are visible to admins and their owner only
    pub hidden: bool,
    /// When the profile was created
    pub created_at: DateTime<Utc>,
    /// When the profile was last updated
    pub updated_at: DateTime<Utc>,
}

/// Repository for alumni profile documents.
pub struct ProfileRepository<'a> {
    store: &'a DocumentStore,
}

impl<'a> ProfileRepository<'a> {
    /// Create a new ProfileRepository.
    pub fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Check if a profile exists.
    pub fn exists(&self, profile_id: &str) -> bool {
        self.store.exists(self.store.paths().profile(profile_id))
    }

    /// Get a profile by ID.
    pub fn get(&self, profile_id: &str) -> StorageResult<StoredProfile> {
        let path = self.store.paths().profile(profile_id);
        if !self.store.exists(&path) {
            return Err(StorageError::NotFound(format!("Profile {profile_id}")));
        }
        self.store.read_json(path)
    }

    /// Create a new profile.
    pub fn create(&self, profile: &StoredProfile) -> StorageResult<()> {
        if self.exists(&profile.id) {
            return Err(StorageError::AlreadyExists(format!(
                "Profile {}",
                profile.id
            )));
        }
        self.store
            .write_json(self.store.paths().profile(&profile.id), profile)
    }

    /// Update an existing profile.
    pub fn update(&self, profile: &StoredProfile) -> StorageResult<()> {
        if !self.exists(&profile.id) {
            return Err(StorageError::NotFound(format!("Profile {}", profile.id)));
        }
        self.store
            .write_json(self.store.paths().profile(&profile.id), profile)
    }

    /// Delete a profile.
    pub fn delete(&self, profile_id: &str) -> StorageResult<()> {
        if !self.exists(profile_id) {
            return Err(StorageError::NotFound(format!("Profile {profile_id}")));
        }
        self.store.delete(self.store.paths().profile(profile_id))
    }

    /// List all profiles, hidden ones included.
    ///
    /// Visibility filtering happens at the handler layer where the viewer
    /// is known.
    pub fn list_all(&self) -> StorageResult<Vec<StoredProfile>> {
        let ids = self
            .store
            .list_documents(self.store.paths().profiles_dir())?;

        let mut profiles = Vec::new();
        for id in ids {
            if let Ok(profile) = self.get(&id) {
                profiles.push(profile);
            }
        }
        profiles.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(profiles)
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

    fn test_profile(id: &str, name: &str) -> StoredProfile {
        StoredProfile {
            id: id.to_string(),
            name: name.to_string(),
            fields: serde_json::json!({ "degree": "CS", "company": "Acme" }),
            hidden: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn create_and_get_profile() {
        let (_temp, store) = setup();
        let repo = ProfileRepository::new(&store);

        let profile = test_profile("p1", "Ada Lovelace");
        repo.create(&profile).unwrap();

        let loaded = repo.get("p1").unwrap();
        assert_eq!(loaded, profile);
        assert_eq!(loaded.fields["degree"], "CS");
    }

    #[test]
    fn duplicate_create_errors() {
        let (_temp, store) = setup();
        let repo = ProfileRepository::new(&store);

        repo.create(&test_profile("p1", "Ada")).unwrap();
        let result = repo.create(&test_profile("p1", "Ada again"));
        assert!(matches!(result, Err(StorageError::AlreadyExists(_))));
    }

    #[test]
    fn list_all_is_sorted_by_name() {
        let (_temp, store) = setup();
        let repo = ProfileRepository::new(&store);

        repo.create(&test_profile("p1", "Charlie")).unwrap();
        repo.create(&test_profile("p2", "Ada")).unwrap();
        repo.create(&test_profile("p3", "Bea")).unwrap();

        let names: Vec<String> = repo
            .list_all()
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Ada", "Bea", "Charlie"]);
    }

    #[test]
    fn update_missing_profile_errors() {
        let (_temp, store) = setup();
        let repo = ProfileRepository::new(&store);

        let result = repo.update(&test_profile("ghost", "Ghost"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Alumnet

//! Shared link repository.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::{DocumentStore, OwnedResource, StorageError, StorageResult};

/// Shared link document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredLink {
    /// Unique link identifier (UUID)
    pub id: String,
    /// Title, plain-sanitized
    pub title: String,
    /// Target URL
    pub url: String,
    /// Optional description, plain-sanitized
    pub description: Option<String>,
    /// Creating user id; `None` for imported legacy rows
    pub created_by: Option<String>,
    /// When the link was created
    pub created_at: DateTime<Utc>,
}

impl OwnedResource for StoredLink {
    fn owner_user_id(&self) -> Option<&str> {
        self.created_by.as_deref()
    }
}

/// Repository for shared link documents.
pub struct LinkRepository<'a> {
    store: &'a DocumentStore,
}

impl<'a> LinkRepository<'a> {
    /// Create a new LinkRepository.
    pub fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Check if a link exists.
    pub fn exists(&self, link_id: &str) -> bool {
        self.store.exists(self.store.paths().link(link_id))
    }

    /// Get a link by ID.
    pub fn get(&self, link_id: &str) -> StorageResult<StoredLink> {
        let path = self.store.paths().link(link_id);
        if !self.store.exists(&path) {
            return Err(StorageError::NotFound(format!("Link {link_id}")));
        }
        self.store.read_json(path)
    }

    /// Create a new link.
    pub fn create(&self, link: &StoredLink) -> StorageResult<()> {
        if self.exists(&link.id) {
            return Err(StorageError::AlreadyExists(format!("Link {}", link.id)));
        }
        self.store
            .write_json(self.store.paths().link(&link.id), link)
    }

    /// Update an existing link.
    pub fn update(&self, link: &StoredLink) -> StorageResult<()> {
        if !self.exists(&link.id) {
            return Err(StorageError::NotFound(format!("Link {}", link.id)));
        }
        self.store
            .write_json(self.store.paths().link(&link.id), link)
    }

    /// Delete a link.
    pub fn delete(&self, link_id: &str) -> StorageResult<()> {
        if !self.exists(link_id) {
            return Err(StorageError::NotFound(format!("Link {link_id}")));
        }
        self.store.delete(self.store.paths().link(link_id))
    }

    /// List all links, newest first.
    pub fn list_all(&self) -> StorageResult<Vec<StoredLink>> {
        let ids = self.store.list_documents(self.store.paths().links_dir())?;

        let mut links = Vec::new();
        for id in ids {
            if let Ok(link) = self.get(&id) {
                links.push(link);
            }
        }
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(links)
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

    fn test_link(id: &str, created_by: Option<&str>) -> StoredLink {
        StoredLink {
            id: id.to_string(),
            title: "Alumni newsletter".to_string(),
            url: "https://example.com/news".to_string(),
            description: None,
            created_by: created_by.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn create_and_get_link() {
        let (_temp, store) = setup();
        let repo = LinkRepository::new(&store);

        let link = test_link("l1", Some("u9"));
        repo.create(&link).unwrap();
        assert_eq!(repo.get("l1").unwrap(), link);
    }

    #[test]
    fn duplicate_create_errors() {
        let (_temp, store) = setup();
        let repo = LinkRepository::new(&store);

        repo.create(&test_link("l1", None)).unwrap();
        let result = repo.create(&test_link("l1", None));
        assert!(matches!(result, Err(StorageError::AlreadyExists(_))));
    }

    #[test]
    fn delete_missing_link_errors() {
        let (_temp, store) = setup();
        let repo = LinkRepository::new(&store);

        let result = repo.delete("missing");
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }
}

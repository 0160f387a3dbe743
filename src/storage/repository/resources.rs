// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Alumnet

//! Shared resource repository.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::{DocumentStore, OwnedResource, StorageError, StorageResult};

/// Shared resource document (articles, documents, media pointers).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredResource {
    /// Unique resource identifier (UUID)
    pub id: String,
    /// Title, plain-sanitized
    pub title: String,
    /// Description, rich-sanitized HTML
    pub description: String,
    /// Optional external or media URL
    pub url: Option<String>,
    /// Optional category label
    pub category: Option<String>,
    /// Creating user id; `None` for imported legacy rows
    pub created_by: Option<String>,
    /// When the resource was created
    pub created_at: DateTime<Utc>,
    /// When the resource was last updated
    pub updated_at: DateTime<Utc>,
}

impl OwnedResource for StoredResource {
    fn owner_user_id(&self) -> Option<&str> {
        self.created_by.as_deref()
    }
}

/// Repository for shared resource documents.
pub struct ResourceRepository<'a> {
    store: &'a DocumentStore,
}

impl<'a> ResourceRepository<'a> {
    /// Create a new ResourceRepository.
    pub fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Check if a resource exists.
    pub fn exists(&self, resource_id: &str) -> bool {
        self.store.exists(self.store.paths().resource(resource_id))
    }

    /// Get a resource by ID.
    pub fn get(&self, resource_id: &str) -> StorageResult<StoredResource> {
        let path = self.store.paths().resource(resource_id);
        if !self.store.exists(&path) {
            return Err(StorageError::NotFound(format!("Resource {resource_id}")));
        }
        self.store.read_json(path)
    }

    /// Create a new resource.
    pub fn create(&self, resource: &StoredResource) -> StorageResult<()> {
        if self.exists(&resource.id) {
            return Err(StorageError::AlreadyExists(format!(
                "Resource {}",
                resource.id
            )));
        }
        self.store
            .write_json(self.store.paths().resource(&resource.id), resource)
    }

    /// Update an existing resource.
    pub fn update(&self, resource: &StoredResource) -> StorageResult<()> {
        if !self.exists(&resource.id) {
            return Err(StorageError::NotFound(format!("Resource {}", resource.id)));
        }
        self.store
            .write_json(self.store.paths().resource(&resource.id), resource)
    }

    /// Delete a resource.
    pub fn delete(&self, resource_id: &str) -> StorageResult<()> {
        if !self.exists(resource_id) {
            return Err(StorageError::NotFound(format!("Resource {resource_id}")));
        }
        self.store.delete(self.store.paths().resource(resource_id))
    }

    /// List all resources, newest first.
    pub fn list_all(&self) -> StorageResult<Vec<StoredResource>> {
        let ids = self
            .store
            .list_documents(self.store.paths().resources_dir())?;

        let mut resources = Vec::new();
        for id in ids {
            if let Ok(resource) = self.get(&id) {
                resources.push(resource);
            }
        }
        resources.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(resources)
    }
}

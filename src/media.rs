// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Alumnet

//! Media object storage.
//!
//! Uploads go through an opaque object-store contract so the handler never
//! cares where bytes land. The bundled implementation writes under the
//! document store's `media/` directory and exposes URLs beneath a
//! configurable public base (a fronting proxy serves that path).

use uuid::Uuid;

use crate::storage::{DocumentStore, StorageError, StorageResult};

/// A stored media object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Store-internal key, usable with [`ObjectStore::delete`].
    pub key: String,
    /// Public URL for clients.
    pub url: String,
}

/// Opaque file-storage contract: put bytes, get a URL back.
pub trait ObjectStore: Send + Sync {
    fn put(&self, bytes: &[u8], content_type: &str) -> StorageResult<StoredObject>;
    fn delete(&self, key: &str) -> StorageResult<()>;
}

/// Object store backed by the local document store.
pub struct LocalMediaStore {
    store: DocumentStore,
    public_base: String,
}

impl LocalMediaStore {
    pub fn new(store: DocumentStore, public_base: impl Into<String>) -> Self {
        Self {
            store,
            public_base: public_base.into(),
        }
    }
}

impl ObjectStore for LocalMediaStore {
    fn put(&self, bytes: &[u8], content_type: &str) -> StorageResult<StoredObject> {
        let key = format!("{}{}", Uuid::new_v4(), extension_for(content_type));
        self.store
            .write_raw(self.store.paths().media_object(&key), bytes)?;

        let url = format!("{}/{key}", self.public_base.trim_end_matches('/'));
        Ok(StoredObject { key, url })
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        // Keys are server-generated; anything path-like is not ours.
        if key.contains('/') || key.contains('\\') || key.contains("..") {
            return Err(StorageError::NotFound("Media object".to_string()));
        }
        self.store.delete(self.store.paths().media_object(key))
    }
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => ".png",
        "image/jpeg" => ".jpg",
        "image/gif" => ".gif",
        "image/webp" => ".webp",
        "application/pdf" => ".pdf",
        _ => ".bin",
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Alumnet

//! Announcements feed repository.
//!
//! Announcements are admin-authored and publicly listed, pinned ones first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::{DocumentStore, StorageError, StorageResult};

/// Announcement document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredAnnouncement {
    /// Unique announcement identifier (UUID)
    pub id: String,
    /// Title, plain-sanitized
    pub title: String,
    /// Body, rich-sanitized HTML
    pub body: String,
    /// Pinned announcements sort before the rest
    pub pinned: bool,
    /// Authoring admin user id
    pub created_by: String,
    /// When the announcement was created
    pub created_at: DateTime<Utc>,
    /// When the announcement was last updated
    pub updated_at: DateTime<Utc>,
}

/// Repository for announcement documents.
pub struct AnnouncementRepository<'a> {
    store: &'a DocumentStore,
}

impl<'a> AnnouncementRepository<'a> {
    /// Create a new AnnouncementRepository.
    pub fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Check if an announcement exists.
    pub fn exists(&self, announcement_id: &str) -> bool {
        self.store
            .exists(self.store.paths().announcement(announcement_id))
    }

    /// Get an announcement by ID.
    pub fn get(&self, announcement_id: &str) -> StorageResult<StoredAnnouncement> {
        let path = self.store.paths().announcement(announcement_id);
        if !self.store.exists(&path) {
            return Err(StorageError::NotFound(format!(
                "Announcement {announcement_id}"
            )));
        }
        self.store.read_json(path)
    }

    /// Create a new announcement.
    pub fn create(&self, announcement: &StoredAnnouncement) -> StorageResult<()> {
        if self.exists(&announcement.id) {
            return Err(StorageError::AlreadyExists(format!(
                "Announcement {}",
                announcement.id
            )));
        }
        self.store.write_json(
            self.store.paths().announcement(&announcement.id),
            announcement,
        )
    }

    /// Update an existing announcement.
    pub fn update(&self, announcement: &StoredAnnouncement) -> StorageResult<()> {
        if !self.exists(&announcement.id) {
            return Err(StorageError::NotFound(format!(
                "Announcement {}",
                announcement.id
            )));
        }
        self.store.write_json(
            self.store.paths().announcement(&announcement.id),
            announcement,
        )
    }

    /// Delete an announcement.
    pub fn delete(&self, announcement_id: &str) -> StorageResult<()> {
        if !self.exists(announcement_id) {
            return Err(StorageError::NotFound(format!(
                "Announcement {announcement_id}"
            )));
        }
        self.store
            .delete(self.store.paths().announcement(announcement_id))
    }

    /// List the feed: pinned first, then newest first.
    pub fn list_all(&self) -> StorageResult<Vec<StoredAnnouncement>> {
        let ids = self
            .store
            .list_documents(self.store.paths().announcements_dir())?;

        let mut announcements = Vec::new();
        for id in ids {
            if let Ok(announcement) = self.get(&id) {
                announcements.push(announcement);
            }
        }
        announcements.sort_by(|a, b| {
            b.pinned
                .cmp(&a.pinned)
                .then(b.created_at.cmp(&a.created_at))
        });

        Ok(announcements)
    }
}

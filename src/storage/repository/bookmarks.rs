// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Alumnet

//! Bookmark ledger repository.
//!
//! The ledger is the set of `(user, item, kind)` relations; each relation is
//! one document keyed by the triple, so composite uniqueness falls out of
//! the filesystem. Per-item counts are computed by scanning the ledger
//! rather than kept as a denormalized counter, so the count can never
//! diverge from the relations themselves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::{DocumentStore, StorageError, StorageResult};

/// The kinds of items that can be bookmarked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// An alumni profile
    Alumni,
    /// A shared resource
    Resource,
    /// A shared link
    Link,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Alumni => "alumni",
            ItemKind::Resource => "resource",
            ItemKind::Link => "link",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a ledger relation is present after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkState {
    Present,
    Absent,
}

/// A single ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredBookmark {
    /// The bookmarking user
    pub user_id: String,
    /// The bookmarked item
    pub item_id: String,
    /// What kind of item is bookmarked
    pub item_kind: ItemKind,
    /// When the bookmark was created
    pub created_at: DateTime<Utc>,
}

impl StoredBookmark {
    fn entry_key(&self) -> String {
        entry_key(&self.user_id, &self.item_id, self.item_kind)
    }
}

fn entry_key(user_id: &str, item_id: &str, kind: ItemKind) -> String {
    format!("{user_id}_{kind}_{item_id}")
}

/// Repository for the bookmark ledger.
pub struct BookmarkRepository<'a> {
    store: &'a DocumentStore,
}

impl<'a> BookmarkRepository<'a> {
    /// Create a new BookmarkRepository.
    pub fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Check whether a user has bookmarked an item.
    pub fn is_bookmarked(&self, user_id: &str, item_id: &str, kind: ItemKind) -> bool {
        let key = entry_key(user_id, item_id, kind);
        self.store.exists(self.store.paths().bookmark(&key))
    }

    /// Insert a ledger entry.
    ///
    /// A duplicate insert leaves the ledger unchanged and reports
    /// `AlreadyExists` so callers can surface it as a non-fatal conflict.
    pub fn add(&self, bookmark: &StoredBookmark) -> StorageResult<()> {
        let key = bookmark.entry_key();
        let path = self.store.paths().bookmark(&key);
        if self.store.exists(&path) {
            return Err(StorageError::AlreadyExists("Bookmark".to_string()));
        }
        self.store.write_json(path, bookmark)
    }

    /// Remove a ledger entry.
    pub fn remove(&self, user_id: &str, item_id: &str, kind: ItemKind) -> StorageResult<()> {
        let key = entry_key(user_id, item_id, kind);
        let path = self.store.paths().bookmark(&key);
        if !self.store.exists(&path) {
            return Err(StorageError::NotFound("Bookmark".to_string()));
        }
        self.store.delete(path)
    }

    /// Flip the relation for `(user, item, kind)` and return the new state.
    ///
    /// absent -> present -> absent; toggling twice restores both the
    /// relation and the computed count.
    pub fn toggle(&self, bookmark: &StoredBookmark) -> StorageResult<BookmarkState> {
        if self.is_bookmarked(&bookmark.user_id, &bookmark.item_id, bookmark.item_kind) {
            self.remove(&bookmark.user_id, &bookmark.item_id, bookmark.item_kind)?;
            Ok(BookmarkState::Absent)
        } else {
            self.add(bookmark)?;
            Ok(BookmarkState::Present)
        }
    }

    /// All bookmarks of one user, optionally restricted to one kind.
    pub fn list_for_user(
        &self,
        user_id: &str,
        kind: Option<ItemKind>,
    ) -> StorageResult<Vec<StoredBookmark>> {
        let mut entries: Vec<StoredBookmark> = self
            .list_all()?
            .into_iter()
            .filter(|b| b.user_id == user_id)
            .filter(|b| kind.is_none_or(|k| b.item_kind == k))
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }

    /// Number of users who bookmarked an item, computed from the ledger.
    pub fn count_for_item(&self, item_id: &str, kind: ItemKind) -> StorageResult<usize> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|b| b.item_id == item_id && b.item_kind == kind)
            .count())
    }

    /// Drop every ledger entry referencing an item (item deletion cascade).
    pub fn remove_for_item(&self, item_id: &str, kind: ItemKind) -> StorageResult<()> {
        for entry in self.list_all()? {
            if entry.item_id == item_id && entry.item_kind == kind {
                self.store
                    .delete(self.store.paths().bookmark(&entry.entry_key()))?;
            }
        }
        Ok(())
    }

    /// Drop every ledger entry of a user (account deletion cascade).
    pub fn remove_for_user(&self, user_id: &str) -> StorageResult<()> {
        for entry in self.list_all()? {
            if entry.user_id == user_id {
                self.store
                    .delete(self.store.paths().bookmark(&entry.entry_key()))?;
            }
        }
        Ok(())
    }

    /// Every ledger entry (admin stats).
    pub fn list_all(&self) -> StorageResult<Vec<StoredBookmark>> {
        let keys = self
            .store
            .list_documents(self.store.paths().bookmarks_dir())?;

        let mut entries = Vec::new();
        for key in keys {
            if let Ok(entry) = self
                .store
                .read_json::<StoredBookmark>(self.store.paths().bookmark(&key))
            {
                entries.push(entry);
            }
        }
        Ok(entries)
    }
}

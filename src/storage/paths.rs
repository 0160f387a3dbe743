// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Alumnet

//! Path constants and utilities for the document store layout.

use std::path::{Path, PathBuf};

/// Default root directory for all persisted documents.
pub const DATA_ROOT: &str = "/data";

/// Storage path utilities for the document store.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self::new(DATA_ROOT)
    }
}

impl StoragePaths {
    /// Layout rooted at an arbitrary directory; tests point this at a
    /// temp dir.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory for all persisted data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    // ========== User Paths ==========

    /// Directory containing all user accounts.
    pub fn users_dir(&self) -> PathBuf {
        self.root.join("users")
    }

    /// Path to a specific user document.
    pub fn user(&self, user_id: &str) -> PathBuf {
        self.users_dir().join(format!("{user_id}.json"))
    }

    // ========== Profile Paths ==========

    /// Directory containing all alumni profiles.
    pub fn profiles_dir(&self) -> PathBuf {
        self.root.join("profiles")
    }

    /// Path to a specific alumni profile document.
    pub fn profile(&self, profile_id: &str) -> PathBuf {
        self.profiles_dir().join(format!("{profile_id}.json"))
    }

    // ========== Resource Paths ==========

    /// Directory containing all shared resources.
    pub fn resources_dir(&self) -> PathBuf {
        self.root.join("resources")
    }

    /// Path to a specific resource document.
    pub fn resource(&self, resource_id: &str) -> PathBuf {
        self.resources_dir().join(format!("{resource_id}.json"))
    }

    // ========== Link Paths ==========

    /// Directory containing all shared links.
    pub fn links_dir(&self) -> PathBuf {
        self.root.join("links")
    }

    /// Path to a specific link document.
    pub fn link(&self, link_id: &str) -> PathBuf {
        self.links_dir().join(format!("{link_id}.json"))
    }

    // ========== Bookmark Paths ==========

    /// Directory containing the bookmark ledger.
    pub fn bookmarks_dir(&self) -> PathBuf {
        self.root.join("bookmarks")
    }

    /// Path to a specific ledger entry, keyed by `(user, kind, item)`.
    pub fn bookmark(&self, entry_key: &str) -> PathBuf {
        self.bookmarks_dir().join(format!("{entry_key}.json"))
    }

    // ========== Announcement Paths ==========

    /// Directory containing all announcements.
    pub fn announcements_dir(&self) -> PathBuf {
        self.root.join("announcements")
    }

    /// Path to a specific announcement document.
    pub fn announcement(&self, announcement_id: &str) -> PathBuf {
        self.announcements_dir().join(format!("{announcement_id}.json"))
    }

    // ========== Media Paths ==========

    /// Directory containing uploaded media objects.
    pub fn media_dir(&self) -> PathBuf {
        self.root.join("media")
    }

    /// Path to a specific media object.
    pub fn media_object(&self, key: &str) -> PathBuf {
        self.media_dir().join(key)
    }

    // ========== Audit Log Paths ==========

    /// Root of the audit trail.
    pub fn audit_dir(&self) -> PathBuf {
        self.root.join("audit")
    }

    /// One day's slice of the audit trail.
    pub fn audit_date_dir(&self, date: &str) -> PathBuf {
        self.audit_dir().join(date)
    }

    /// The JSONL events file inside a day's slice.
    pub fn audit_events_file(&self, date: &str) -> PathBuf {
        self.audit_date_dir(date).join("events.jsonl")
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Alumnet

//! # Persistence Module
//!
//! Entities are persisted as JSON documents on the filesystem, one document
//! per entity, grouped by collection directory. The store itself is
//! schemaless; the typed contracts live in the repositories.
//!
//! ## Storage Layout
//!
//! ```text
//! /data/
//!   users/{user_id}.json
//!   profiles/{profile_id}.json
//!   resources/{resource_id}.json
//!   links/{link_id}.json
//!   bookmarks/{user_id}_{kind}_{item_id}.json   # ledger, one entry per relation
//!   announcements/{announcement_id}.json
//!   media/{key}                                 # uploaded objects
//!   audit/{date}/events.jsonl                   # daily audit logs
//! ```

pub mod audit;
pub mod documents;
pub mod ownership;
pub mod paths;
pub mod repository;

pub use audit::{AuditEvent, AuditEventType, AuditRepository};
pub use documents::{DocumentStore, StorageError, StorageResult};
pub use ownership::{can_modify, OwnedResource, OwnershipEnforcer};
pub use paths::StoragePaths;
pub use repository::{
    normalize_username, AnnouncementRepository, BookmarkRepository, BookmarkState, ItemKind,
    LinkRepository, ProfileRepository, ResourceRepository, StoredAnnouncement, StoredBookmark,
    StoredLink, StoredProfile, StoredResource, StoredUser, UserRepository,
};

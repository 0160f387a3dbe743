// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Alumnet

//! Append-only trail of security-relevant activity.
//!
//! Authentication attempts, entity mutations, and administrative access land
//! in daily JSONL files. Appends are best-effort; a write failure never
//! fails the request that triggered the event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{DocumentStore, StorageResult};

/// Types of auditable events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    // Auth events
    LoginSuccess,
    LoginFailure,
    PermissionDenied,

    // User events
    UserCreated,

    // Profile events
    ProfileCreated,
    ProfileUpdated,
    ProfileDeleted,

    // Resource events
    ResourceCreated,
    ResourceUpdated,
    ResourceDeleted,

    // Link events
    LinkCreated,
    LinkUpdated,
    LinkDeleted,

    // Announcement events
    AnnouncementCreated,
    AnnouncementUpdated,
    AnnouncementDeleted,

    // Bookmark events
    BookmarkAdded,
    BookmarkRemoved,

    // Media events
    MediaUploaded,

    // Admin events
    AdminAccess,
}

/// One line of the trail.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuditEvent {
    pub event_id: String,
    pub timestamp: DateTime<Utc>,
    pub event_type: AuditEventType,
    /// Acting user, when one was resolved.
    pub user_id: Option<String>,
    /// Kind of the affected entity (alumni, link, ...).
    pub resource_type: Option<String>,
    pub resource_id: Option<String>,
    pub success: bool,
    /// Failure detail for unsuccessful operations.
    pub error: Option<String>,
}

impl AuditEvent {
    /// Start an event of the given type, stamped now and assumed successful.
    pub fn new(event_type: AuditEventType) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event_type,
            user_id: None,
            resource_type: None,
            resource_id: None,
            success: true,
            error: None,
        }
    }

    /// Attach the acting user.
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Attach the affected entity.
    pub fn with_resource(
        mut self,
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
    ) -> Self {
        self.resource_type = Some(resource_type.into());
        self.resource_id = Some(resource_id.into());
        self
    }

    /// Mark as failed with an error message.
    pub fn failed(mut self, error: impl Into<String>) -> Self {
        self.success = false;
        self.error = Some(error.into());
        self
    }
}

/// Reads and appends the daily trail files.
pub struct AuditRepository<'a> {
    store: &'a DocumentStore,
}

impl<'a> AuditRepository<'a> {
    pub fn new(store: &'a DocumentStore) -> Self {
        Self { store }
    }

    /// Append one event to the file for its date.
    pub fn log(&self, event: &AuditEvent) -> StorageResult<()> {
        let date = event.timestamp.format("%Y-%m-%d").to_string();
        let path = self.store.paths().audit_events_file(&date);

        let mut content = self.store.read_raw(&path).unwrap_or_default();

        let event_json = serde_json::to_string(event)?;

        if !content.is_empty() && !content.ends_with(b"\n") {
            content.push(b'\n');
        }
        content.extend_from_slice(event_json.as_bytes());
        content.push(b'\n');

        self.store.write_raw(&path, &content)
    }

    /// Load every event recorded on a date (`YYYY-MM-DD`).
    pub fn read_events(&self, date: &str) -> StorageResult<Vec<AuditEvent>> {
        let path = self.store.paths().audit_events_file(date);
        let content = self.store.read_raw(&path)?;

        let content_str = String::from_utf8_lossy(&content);

        let mut events = Vec::new();
        for line in content_str.lines() {
            if line.trim().is_empty() {
                continue;
            }
            events.push(serde_json::from_str(line)?);
        }

        Ok(events)
    }
}

/// Record an audit event without letting a logging failure escape.
#[macro_export]
macro_rules! audit_log {
    ($store:expr, $event_type:expr, $user:expr) => {{
        let repo = $crate::storage::AuditRepository::new($store);
        let event = $crate::storage::AuditEvent::new($event_type).with_user(&$user.id);
        let _ = repo.log(&event);
    }};
    ($store:expr, $event_type:expr, $user:expr, $resource_type:expr, $resource_id:expr) => {{
        let repo = $crate::storage::AuditRepository::new($store);
        let event = $crate::storage::AuditEvent::new($event_type)
            .with_user(&$user.id)
            .with_resource($resource_type, $resource_id);
        let _ = repo.log(&event);
    }};
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Alumnet

//! # API Data Models
//!
//! Request and response structures for the REST API. All types derive
//! `Serialize`, `Deserialize`, and `ToSchema` for JSON handling and OpenAPI
//! documentation.
//!
//! Wire JSON is camelCase (the contract the SPA consumes); stored documents
//! in [`crate::storage`] keep Rust-native snake_case.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{CurrentUser, Role};
use crate::storage::{
    ItemKind, StoredAnnouncement, StoredBookmark, StoredLink, StoredProfile, StoredResource,
    StoredUser,
};

// =============================================================================
// Auth Models
// =============================================================================

/// Login credentials.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login: the session token plus the resolved user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer token, valid for seven days.
    pub token: String,
    pub user: UserResponse,
}

/// Public view of a user account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub role: Role,
    /// Linked alumni profile, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
}

impl From<StoredUser> for UserResponse {
    fn from(user: StoredUser) -> Self {
        let role = if user.is_admin { Role::Admin } else { Role::Member };
        Self {
            id: user.id,
            username: user.username,
            role,
            profile_id: user.linked_profile_id,
        }
    }
}

impl From<CurrentUser> for UserResponse {
    fn from(user: CurrentUser) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
            profile_id: user.profile_id,
        }
    }
}

// =============================================================================
// Alumni Profile Models
// =============================================================================

/// Public view of an alumni profile.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: String,
    pub name: String,
    /// Free-form alumni attributes.
    #[schema(value_type = Object)]
    pub fields: serde_json::Value,
    pub hidden: bool,
    /// How many users bookmarked this profile (computed from the ledger).
    pub bookmark_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileResponse {
    pub fn from_parts(profile: StoredProfile, bookmark_count: usize) -> Self {
        Self {
            id: profile.id,
            name: profile.name,
            fields: profile.fields,
            hidden: profile.hidden,
            bookmark_count,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

/// Request to create an alumni profile (admin only).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileRequest {
    pub name: String,
    /// Free-form alumni attributes; string leaves are sanitized.
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub fields: Option<serde_json::Value>,
    #[serde(default)]
    pub hidden: bool,
}

/// Partial profile update (self or admin).
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub fields: Option<serde_json::Value>,
    pub hidden: Option<bool>,
}

// =============================================================================
// Resource Models
// =============================================================================

/// Public view of a shared resource.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    pub bookmark_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResourceResponse {
    pub fn from_parts(resource: StoredResource, bookmark_count: usize) -> Self {
        Self {
            id: resource.id,
            title: resource.title,
            description: resource.description,
            url: resource.url,
            category: resource.category,
            created_by: resource.created_by,
            bookmark_count,
            created_at: resource.created_at,
            updated_at: resource.updated_at,
        }
    }
}

/// Request to create a shared resource.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateResourceRequest {
    pub title: String,
    pub description: String,
    pub url: Option<String>,
    pub category: Option<String>,
}

/// Partial resource update (owner or admin).
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResourceRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub category: Option<String>,
}

// =============================================================================
// Link Models
// =============================================================================

/// Public view of a shared link.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    pub bookmark_count: usize,
    pub created_at: DateTime<Utc>,
}

impl LinkResponse {
    pub fn from_parts(link: StoredLink, bookmark_count: usize) -> Self {
        Self {
            id: link.id,
            title: link.title,
            url: link.url,
            description: link.description,
            created_by: link.created_by,
            bookmark_count,
            created_at: link.created_at,
        }
    }
}

/// Request to create a shared link.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    pub title: String,
    pub url: String,
    pub description: Option<String>,
}

/// Partial link update (owner or admin).
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLinkRequest {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
}

// =============================================================================
// Bookmark Models
// =============================================================================

/// Request to bookmark an item.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookmarkRequest {
    pub item_id: String,
    pub item_type: ItemKind,
}

/// One ledger entry, as seen by clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkResponse {
    pub item_id: String,
    pub item_type: ItemKind,
    pub created_at: DateTime<Utc>,
}

impl From<StoredBookmark> for BookmarkResponse {
    fn from(bookmark: StoredBookmark) -> Self {
        Self {
            item_id: bookmark.item_id,
            item_type: bookmark.item_kind,
            created_at: bookmark.created_at,
        }
    }
}

/// Whether the requesting user has bookmarked an item.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkCheckResponse {
    pub is_bookmarked: bool,
}

/// How many users bookmarked an item.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkCountResponse {
    pub item_id: String,
    pub item_type: ItemKind,
    pub count: usize,
}

// =============================================================================
// Announcement Models
// =============================================================================

/// Public view of an announcement.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementResponse {
    pub id: String,
    pub title: String,
    pub body: String,
    pub pinned: bool,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<StoredAnnouncement> for AnnouncementResponse {
    fn from(announcement: StoredAnnouncement) -> Self {
        Self {
            id: announcement.id,
            title: announcement.title,
            body: announcement.body,
            pinned: announcement.pinned,
            created_by: announcement.created_by,
            created_at: announcement.created_at,
            updated_at: announcement.updated_at,
        }
    }
}

/// Request to create an announcement (admin only).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnnouncementRequest {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub pinned: bool,
}

/// Partial announcement update (admin only).
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAnnouncementRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub pinned: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_json_is_camel_case() {
        let check = BookmarkCheckResponse {
            is_bookmarked: true,
        };
        assert_eq!(
            serde_json::to_string(&check).unwrap(),
            r#"{"isBookmarked":true}"#
        );

        let request: CreateBookmarkRequest =
            serde_json::from_str(r#"{"itemId":"p5","itemType":"alumni"}"#).unwrap();
        assert_eq!(request.item_id, "p5");
        assert_eq!(request.item_type, ItemKind::Alumni);
    }

    #[test]
    fn user_response_derives_role_from_admin_flag() {
        let user = StoredUser {
            id: "u1".to_string(),
            username: "ada".to_string(),
            password_hash: "hash".to_string(),
            is_admin: true,
            linked_profile_id: None,
            created_at: Utc::now(),
        };

        let response: UserResponse = user.into();
        assert_eq!(response.role, Role::Admin);

        let json = serde_json::to_value(&response).unwrap();
        // The password hash never leaves the storage layer.
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn profile_response_carries_computed_count() {
        let profile = StoredProfile {
            id: "p1".to_string(),
            name: "Ada".to_string(),
            fields: serde_json::json!({}),
            hidden: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let response = ProfileResponse::from_parts(profile, 3);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["bookmarkCount"], 3);
    }
}

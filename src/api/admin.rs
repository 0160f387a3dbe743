// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Alumnet

//! Admin-only endpoints: account management and system statistics.
//!
//! Self-registration is disabled, so accounts enter the system here (or via
//! startup seeding). There is deliberately no user-delete endpoint:
//! accounts go away only through the cascading delete of their linked
//! profile.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    audit_log,
    auth::{password, AdminOnly},
    error::ApiError,
    models::UserResponse,
    sanitize::sanitize_plain_text,
    state::AppState,
    storage::{
        normalize_username, AnnouncementRepository, AuditEventType, BookmarkRepository,
        LinkRepository, ProfileRepository, ResourceRepository, StoredUser, UserRepository,
    },
};

/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 8;

/// Request to create a user account. Admin only.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
    /// Alumni profile to link the account to.
    pub profile_id: Option<String>,
}

/// System statistics response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatsResponse {
    pub total_users: usize,
    pub admin_users: usize,
    pub total_profiles: usize,
    pub hidden_profiles: usize,
    pub total_resources: usize,
    pub total_links: usize,
    pub total_announcements: usize,
    pub total_bookmarks: usize,
    pub timestamp: String,
}

/// Create a user account, optionally linked to an alumni profile.
#[utoipa::path(
    post,
    path = "/api/admin/users",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized (admin required)"),
        (status = 404, description = "Linked profile not found"),
        (status = 409, description = "Username already taken")
    )
)]
pub async fn create_user(
    AdminOnly(admin): AdminOnly,
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let username = normalize_username(&sanitize_plain_text(&request.username));
    if username.is_empty() {
        return Err(ApiError::bad_request("username must not be empty"));
    }
    if request.password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let store = state.store();

    if let Some(ref profile_id) = request.profile_id {
        if !ProfileRepository::new(&store).exists(profile_id) {
            return Err(ApiError::not_found(format!("Profile {profile_id} not found")));
        }
        if UserRepository::new(&store)
            .find_by_profile(profile_id)?
            .is_some()
        {
            return Err(ApiError::conflict("Profile is already linked to a user"));
        }
    }

    let user = StoredUser {
        id: uuid::Uuid::new_v4().to_string(),
        username,
        password_hash: password::hash_password(&request.password)?,
        is_admin: request.is_admin,
        linked_profile_id: request.profile_id,
        created_at: Utc::now(),
    };

    UserRepository::new(&store).create(&user)?;

    audit_log!(&store, AuditEventType::UserCreated, &admin, "user", &user.id);

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// List all user accounts.
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All users", body = [UserResponse]),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized (admin required)")
    )
)]
pub async fn list_users(
    AdminOnly(admin): AdminOnly,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let store = state.store();
    let users = UserRepository::new(&store).list_all()?;

    audit_log!(&store, AuditEventType::AdminAccess, &admin);

    Ok(Json(users.into_iter().map(Into::into).collect()))
}

/// Aggregate system statistics.
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "System statistics", body = SystemStatsResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized (admin required)")
    )
)]
pub async fn system_stats(
    AdminOnly(admin): AdminOnly,
    State(state): State<AppState>,
) -> Result<Json<SystemStatsResponse>, ApiError> {
    let store = state.store();

    let users = UserRepository::new(&store).list_all()?;
    let admin_users = users.iter().filter(|u| u.is_admin).count();

    let profiles = ProfileRepository::new(&store).list_all()?;
    let hidden_profiles = profiles.iter().filter(|p| p.hidden).count();

    let total_resources = ResourceRepository::new(&store).list_all()?.len();
    let total_links = LinkRepository::new(&store).list_all()?.len();
    let total_announcements = AnnouncementRepository::new(&store).list_all()?.len();
    let total_bookmarks = BookmarkRepository::new(&store).list_all()?.len();

    audit_log!(&store, AuditEventType::AdminAccess, &admin);

    Ok(Json(SystemStatsResponse {
        total_users: users.len(),
        admin_users,
        total_profiles: profiles.len(),
        hidden_profiles,
        total_resources,
        total_links,
        total_announcements,
        total_bookmarks,
        timestamp: Utc::now().to_rfc3339(),
    }))
}

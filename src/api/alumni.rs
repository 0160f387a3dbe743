// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Alumnet

//! Alumni profile endpoints.
//!
//! Listing and reads are public (hidden profiles excluded unless the viewer
//! is an admin or the owner). Creation and deletion are admin-only; updates
//! are self-or-admin. Deleting a profile cascades to the owning account and
//! the profile's ledger entries.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::{
    audit_log,
    auth::{AdminOnly, Auth, CurrentUser, OptionalAuth},
    error::ApiError,
    models::{CreateProfileRequest, ProfileResponse, UpdateProfileRequest},
    sanitize::{sanitize_json_strings, sanitize_plain_text},
    state::AppState,
    storage::{
        AuditEventType, BookmarkRepository, ItemKind, ProfileRepository, StoredProfile,
        UserRepository,
    },
};

fn profile_visible(profile: &StoredProfile, viewer: Option<&CurrentUser>) -> bool {
    if !profile.hidden {
        return true;
    }
    viewer.is_some_and(|user| user.is_admin() || user.owns_profile(&profile.id))
}

fn sanitized_fields(fields: serde_json::Value) -> Result<serde_json::Value, ApiError> {
    if !fields.is_object() {
        return Err(ApiError::bad_request("fields must be a JSON object"));
    }
    Ok(sanitize_json_strings(fields, &|s| sanitize_plain_text(s)))
}

/// List alumni profiles.
///
/// Hidden profiles appear only for admins and their owner.
#[utoipa::path(
    get,
    path = "/api/alumni",
    tag = "Alumni",
    responses((status = 200, description = "Alumni profiles", body = [ProfileResponse]))
)]
pub async fn list_profiles(
    OptionalAuth(viewer): OptionalAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<ProfileResponse>>, ApiError> {
    let store = state.store();
    let profiles = ProfileRepository::new(&store).list_all()?;
    let bookmarks = BookmarkRepository::new(&store);

    let mut responses = Vec::new();
    for profile in profiles {
        if !profile_visible(&profile, viewer.as_ref()) {
            continue;
        }
        let count = bookmarks.count_for_item(&profile.id, ItemKind::Alumni)?;
        responses.push(ProfileResponse::from_parts(profile, count));
    }

    Ok(Json(responses))
}

/// Get a single alumni profile.
#[utoipa::path(
    get,
    path = "/api/alumni/{profile_id}",
    tag = "Alumni",
    params(("profile_id" = String, Path, description = "Profile ID")),
    responses(
        (status = 200, description = "Profile details", body = ProfileResponse),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn get_profile(
    OptionalAuth(viewer): OptionalAuth,
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let store = state.store();
    let profile = ProfileRepository::new(&store).get(&profile_id)?;

    // Hidden profiles 404 for outsiders rather than confirming existence.
    if !profile_visible(&profile, viewer.as_ref()) {
        return Err(ApiError::not_found(format!("Profile {profile_id} not found")));
    }

    let count = BookmarkRepository::new(&store).count_for_item(&profile.id, ItemKind::Alumni)?;
    Ok(Json(ProfileResponse::from_parts(profile, count)))
}

/// Create an alumni profile. Admin only.
#[utoipa::path(
    post,
    path = "/api/alumni",
    tag = "Alumni",
    security(("bearer_auth" = [])),
    request_body = CreateProfileRequest,
    responses(
        (status = 201, description = "Profile created", body = ProfileResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized (admin required)")
    )
)]
pub async fn create_profile(
    AdminOnly(admin): AdminOnly,
    State(state): State<AppState>,
    Json(request): Json<CreateProfileRequest>,
) -> Result<(StatusCode, Json<ProfileResponse>), ApiError> {
    let name = sanitize_plain_text(&request.name);
    if name.trim().is_empty() {
        return Err(ApiError::bad_request("name must not be empty"));
    }

    let fields = sanitized_fields(
        request
            .fields
            .unwrap_or_else(|| serde_json::Value::Object(Default::default())),
    )?;

    let now = Utc::now();
    let profile = StoredProfile {
        id: uuid::Uuid::new_v4().to_string(),
        name,
        fields,
        hidden: request.hidden,
        created_at: now,
        updated_at: now,
    };

    let store = state.store();
    ProfileRepository::new(&store).create(&profile)?;

    audit_log!(
        &store,
        AuditEventType::ProfileCreated,
        &admin,
        "alumni",
        &profile.id
    );

    Ok((
        StatusCode::CREATED,
        Json(ProfileResponse::from_parts(profile, 0)),
    ))
}

/// Update an alumni profile. Allowed for the owning user and admins.
#[utoipa::path(
    put,
    path = "/api/alumni/{profile_id}",
    tag = "Alumni",
    security(("bearer_auth" = [])),
    params(("profile_id" = String, Path, description = "Profile ID")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the owner and not an admin"),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn update_profile(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let store = state.store();
    let repo = ProfileRepository::new(&store);
    let mut profile = repo.get(&profile_id)?;

    if !(user.is_admin() || user.owns_profile(&profile_id)) {
        audit_log!(
            &store,
            AuditEventType::PermissionDenied,
            &user,
            "alumni",
            &profile_id
        );
        return Err(ApiError::forbidden(
            "You don't have permission to modify this profile",
        ));
    }

    if let Some(name) = request.name {
        let name = sanitize_plain_text(&name);
        if name.trim().is_empty() {
            return Err(ApiError::bad_request("name must not be empty"));
        }
        profile.name = name;
    }
    if let Some(fields) = request.fields {
        profile.fields = sanitized_fields(fields)?;
    }
    if let Some(hidden) = request.hidden {
        profile.hidden = hidden;
    }
    profile.updated_at = Utc::now();

    repo.update(&profile)?;

    audit_log!(
        &store,
        AuditEventType::ProfileUpdated,
        &user,
        "alumni",
        &profile_id
    );

    let count = BookmarkRepository::new(&store).count_for_item(&profile.id, ItemKind::Alumni)?;
    Ok(Json(ProfileResponse::from_parts(profile, count)))
}

/// Delete an alumni profile. Admin only.
///
/// Cascades: the owning user account (if any) and every ledger entry
/// pointing at the profile are deleted with it.
#[utoipa::path(
    delete,
    path = "/api/alumni/{profile_id}",
    tag = "Alumni",
    security(("bearer_auth" = [])),
    params(("profile_id" = String, Path, description = "Profile ID")),
    responses(
        (status = 204, description = "Profile deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized (admin required)"),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn delete_profile(
    AdminOnly(admin): AdminOnly,
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let store = state.store();
    let profiles = ProfileRepository::new(&store);
    profiles.delete(&profile_id)?;

    let users = UserRepository::new(&store);
    let bookmarks = BookmarkRepository::new(&store);

    if let Some(owner) = users.find_by_profile(&profile_id)? {
        bookmarks.remove_for_user(&owner.id)?;
        users.delete(&owner.id)?;
    }
    bookmarks.remove_for_item(&profile_id, ItemKind::Alumni)?;

    audit_log!(
        &store,
        AuditEventType::ProfileDeleted,
        &admin,
        "alumni",
        &profile_id
    );

    Ok(StatusCode::NO_CONTENT)
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Alumnet

//! Announcements feed endpoints.
//!
//! The feed is public; authoring is admin-only.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::{
    audit_log,
    auth::AdminOnly,
    error::ApiError,
    models::{AnnouncementResponse, CreateAnnouncementRequest, UpdateAnnouncementRequest},
    sanitize::{sanitize_plain_text, sanitize_rich_text},
    state::AppState,
    storage::{AnnouncementRepository, AuditEventType, StoredAnnouncement},
};

/// List the announcements feed: pinned first, then newest first.
#[utoipa::path(
    get,
    path = "/api/announcements",
    tag = "Announcements",
    responses((status = 200, description = "Announcements", body = [AnnouncementResponse]))
)]
pub async fn list_announcements(
    State(state): State<AppState>,
) -> Result<Json<Vec<AnnouncementResponse>>, ApiError> {
    let store = state.store();
    let announcements = AnnouncementRepository::new(&store).list_all()?;
    Ok(Json(announcements.into_iter().map(Into::into).collect()))
}

/// Publish an announcement. Admin only.
#[utoipa::path(
    post,
    path = "/api/announcements",
    tag = "Announcements",
    security(("bearer_auth" = [])),
    request_body = CreateAnnouncementRequest,
    responses(
        (status = 201, description = "Announcement published", body = AnnouncementResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized (admin required)")
    )
)]
pub async fn create_announcement(
    AdminOnly(admin): AdminOnly,
    State(state): State<AppState>,
    Json(request): Json<CreateAnnouncementRequest>,
) -> Result<(StatusCode, Json<AnnouncementResponse>), ApiError> {
    let title = sanitize_plain_text(&request.title);
    if title.trim().is_empty() {
        return Err(ApiError::bad_request("title must not be empty"));
    }

    let now = Utc::now();
    let announcement = StoredAnnouncement {
        id: uuid::Uuid::new_v4().to_string(),
        title,
        body: sanitize_rich_text(&request.body),
        pinned: request.pinned,
        created_by: admin.id.clone(),
        created_at: now,
        updated_at: now,
    };

    let store = state.store();
    AnnouncementRepository::new(&store).create(&announcement)?;

    audit_log!(
        &store,
        AuditEventType::AnnouncementCreated,
        &admin,
        "announcement",
        &announcement.id
    );

    Ok((StatusCode::CREATED, Json(announcement.into())))
}

/// Update an announcement. Admin only.
#[utoipa::path(
    put,
    path = "/api/announcements/{announcement_id}",
    tag = "Announcements",
    security(("bearer_auth" = [])),
    params(("announcement_id" = String, Path, description = "Announcement ID")),
    request_body = UpdateAnnouncementRequest,
    responses(
        (status = 200, description = "Announcement updated", body = AnnouncementResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized (admin required)"),
        (status = 404, description = "Announcement not found")
    )
)]
pub async fn update_announcement(
    AdminOnly(admin): AdminOnly,
    State(state): State<AppState>,
    Path(announcement_id): Path<String>,
    Json(request): Json<UpdateAnnouncementRequest>,
) -> Result<Json<AnnouncementResponse>, ApiError> {
    let store = state.store();
    let repo = AnnouncementRepository::new(&store);
    let mut announcement = repo.get(&announcement_id)?;

    if let Some(title) = request.title {
        let title = sanitize_plain_text(&title);
        if title.trim().is_empty() {
            return Err(ApiError::bad_request("title must not be empty"));
        }
        announcement.title = title;
    }
    if let Some(body) = request.body {
        announcement.body = sanitize_rich_text(&body);
    }
    if let Some(pinned) = request.pinned {
        announcement.pinned = pinned;
    }
    announcement.updated_at = Utc::now();

    repo.update(&announcement)?;

    audit_log!(
        &store,
        AuditEventType::AnnouncementUpdated,
        &admin,
        "announcement",
        &announcement_id
    );

    Ok(Json(announcement.into()))
}

/// Delete an announcement. Admin only.
#[utoipa::path(
    delete,
    path = "/api/announcements/{announcement_id}",
    tag = "Announcements",
    security(("bearer_auth" = [])),
    params(("announcement_id" = String, Path, description = "Announcement ID")),
    responses(
        (status = 204, description = "Announcement deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not authorized (admin required)"),
        (status = 404, description = "Announcement not found")
    )
)]
pub async fn delete_announcement(
    AdminOnly(admin): AdminOnly,
    State(state): State<AppState>,
    Path(announcement_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let store = state.store();
    AnnouncementRepository::new(&store).delete(&announcement_id)?;

    audit_log!(
        &store,
        AuditEventType::AnnouncementDeleted,
        &admin,
        "announcement",
        &announcement_id
    );

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{CurrentUser, Role, TokenCodec};
    use crate::media::LocalMediaStore;
    use crate::storage::{DocumentStore, StoragePaths};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn test_state() -> (AppState, TempDir) {
        let temp = TempDir::new().unwrap();
        let mut store = DocumentStore::new(StoragePaths::new(temp.path()));
        store.initialize().unwrap();

        let media = Arc::new(LocalMediaStore::new(store.clone(), "/media"));
        let state = AppState::new(store, TokenCodec::new(b"announcements-test-secret"), media);
        (state, temp)
    }

    fn admin() -> CurrentUser {
        CurrentUser {
            id: "admin-1".to_string(),
            username: "admin".to_string(),
            role: Role::Admin,
            profile_id: None,
        }
    }

    #[tokio::test]
    async fn publish_sanitizes_body_and_lists_publicly() {
        let (state, _temp) = test_state();

        let (status, Json(published)) = create_announcement(
            AdminOnly(admin()),
            State(state.clone()),
            Json(CreateAnnouncementRequest {
                title: "Reunion".to_string(),
                body: "<p>Save the date</p><script>x</script>".to_string(),
                pinned: true,
            }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(published.body, "<p>Save the date</p>");
        assert!(published.pinned);

        let Json(feed) = list_announcements(State(state)).await.unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].id, published.id);
    }

    #[tokio::test]
    async fn update_and_delete_roundtrip() {
        let (state, _temp) = test_state();

        let (_, Json(published)) = create_announcement(
            AdminOnly(admin()),
            State(state.clone()),
            Json(CreateAnnouncementRequest {
                title: "Reunion".to_string(),
                body: "<p>v1</p>".to_string(),
                pinned: false,
            }),
        )
        .await
        .unwrap();

        let Json(updated) = update_announcement(
            AdminOnly(admin()),
            State(state.clone()),
            Path(published.id.clone()),
            Json(UpdateAnnouncementRequest {
                body: Some("<p>v2</p>".to_string()),
                pinned: Some(true),
                ..Default::default()
            }),
        )
        .await
        .unwrap();
        assert_eq!(updated.body, "<p>v2</p>");
        assert!(updated.pinned);

        let status = delete_announcement(
            AdminOnly(admin()),
            State(state.clone()),
            Path(published.id),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let Json(feed) = list_announcements(State(state)).await.unwrap();
        assert!(feed.is_empty());
    }
}

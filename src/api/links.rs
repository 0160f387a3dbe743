// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Alumnet

//! Shared link endpoints.
//!
//! Reads are public; creation requires authentication; updates and deletes
//! follow the owner-or-admin policy.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use url::Url;

use crate::{
    audit_log,
    auth::Auth,
    error::ApiError,
    models::{CreateLinkRequest, LinkResponse, UpdateLinkRequest},
    sanitize::sanitize_plain_text,
    state::AppState,
    storage::{
        AuditEventType, BookmarkRepository, ItemKind, LinkRepository, OwnershipEnforcer,
        StoredLink,
    },
};

fn validate_url(raw: &str) -> Result<String, ApiError> {
    let parsed = Url::parse(raw).map_err(|_| ApiError::bad_request("url is not a valid URL"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ApiError::bad_request("url must be http or https"));
    }
    Ok(parsed.to_string())
}

/// List shared links, newest first.
#[utoipa::path(
    get,
    path = "/api/links",
    tag = "Links",
    responses((status = 200, description = "Shared links", body = [LinkResponse]))
)]
pub async fn list_links(
    State(state): State<AppState>,
) -> Result<Json<Vec<LinkResponse>>, ApiError> {
    let store = state.store();
    let links = LinkRepository::new(&store).list_all()?;
    let bookmarks = BookmarkRepository::new(&store);

    let mut responses = Vec::new();
    for link in links {
        let count = bookmarks.count_for_item(&link.id, ItemKind::Link)?;
        responses.push(LinkResponse::from_parts(link, count));
    }

    Ok(Json(responses))
}

/// Get a single shared link.
#[utoipa::path(
    get,
    path = "/api/links/{link_id}",
    tag = "Links",
    params(("link_id" = String, Path, description = "Link ID")),
    responses(
        (status = 200, description = "Link details", body = LinkResponse),
        (status = 404, description = "Link not found")
    )
)]
pub async fn get_link(
    State(state): State<AppState>,
    Path(link_id): Path<String>,
) -> Result<Json<LinkResponse>, ApiError> {
    let store = state.store();
    let link = LinkRepository::new(&store).get(&link_id)?;
    let count = BookmarkRepository::new(&store).count_for_item(&link.id, ItemKind::Link)?;
    Ok(Json(LinkResponse::from_parts(link, count)))
}

/// Create a shared link.
#[utoipa::path(
    post,
    path = "/api/links",
    tag = "Links",
    security(("bearer_auth" = [])),
    request_body = CreateLinkRequest,
    responses(
        (status = 201, description = "Link created", body = LinkResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_link(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(request): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), ApiError> {
    let title = sanitize_plain_text(&request.title);
    if title.trim().is_empty() {
        return Err(ApiError::bad_request("title must not be empty"));
    }
    let url = validate_url(&request.url)?;

    let link = StoredLink {
        id: uuid::Uuid::new_v4().to_string(),
        title,
        url,
        description: request
            .description
            .map(|text| sanitize_plain_text(&text)),
        created_by: Some(user.id.clone()),
        created_at: Utc::now(),
    };

    let store = state.store();
    LinkRepository::new(&store).create(&link)?;

    audit_log!(&store, AuditEventType::LinkCreated, &user, "link", &link.id);

    Ok((StatusCode::CREATED, Json(LinkResponse::from_parts(link, 0))))
}

/// Update a shared link. Owner or admin.
#[utoipa::path(
    put,
    path = "/api/links/{link_id}",
    tag = "Links",
    security(("bearer_auth" = [])),
    params(("link_id" = String, Path, description = "Link ID")),
    request_body = UpdateLinkRequest,
    responses(
        (status = 200, description = "Link updated", body = LinkResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the owner and not an admin"),
        (status = 404, description = "Link not found")
    )
)]
pub async fn update_link(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(link_id): Path<String>,
    Json(request): Json<UpdateLinkRequest>,
) -> Result<Json<LinkResponse>, ApiError> {
    let store = state.store();
    let repo = LinkRepository::new(&store);
    let mut link = repo.get(&link_id)?;

    if let Err(denied) = link.ensure_can_modify(&user) {
        audit_log!(
            &store,
            AuditEventType::PermissionDenied,
            &user,
            "link",
            &link_id
        );
        return Err(denied.into());
    }

    if let Some(title) = request.title {
        let title = sanitize_plain_text(&title);
        if title.trim().is_empty() {
            return Err(ApiError::bad_request("title must not be empty"));
        }
        link.title = title;
    }
    if let Some(url) = request.url {
        link.url = validate_url(&url)?;
    }
    if let Some(description) = request.description {
        link.description = Some(sanitize_plain_text(&description));
    }

    repo.update(&link)?;

    audit_log!(&store, AuditEventType::LinkUpdated, &user, "link", &link_id);

    let count = BookmarkRepository::new(&store).count_for_item(&link.id, ItemKind::Link)?;
    Ok(Json(LinkResponse::from_parts(link, count)))
}

/// Delete a shared link. Owner or admin. Cascades to the ledger.
#[utoipa::path(
    delete,
    path = "/api/links/{link_id}",
    tag = "Links",
    security(("bearer_auth" = [])),
    params(("link_id" = String, Path, description = "Link ID")),
    responses(
        (status = 204, description = "Link deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the owner and not an admin"),
        (status = 404, description = "Link not found")
    )
)]
pub async fn delete_link(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(link_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let store = state.store();
    let repo = LinkRepository::new(&store);
    let link = repo.get(&link_id)?;

    if let Err(denied) = link.ensure_can_modify(&user) {
        audit_log!(
            &store,
            AuditEventType::PermissionDenied,
            &user,
            "link",
            &link_id
        );
        return Err(denied.into());
    }

    repo.delete(&link_id)?;
    BookmarkRepository::new(&store).remove_for_item(&link_id, ItemKind::Link)?;

    audit_log!(&store, AuditEventType::LinkDeleted, &user, "link", &link_id);

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
        let state = AppState::new(store, TokenCodec::new(b"links-test-secret"), media);
        (state, temp)
    }

    fn user(id: &str, role: Role) -> CurrentUser {
        CurrentUser {
            id: id.to_string(),
            username: format!("{id}-name"),
            role,
            profile_id: None,
        }
    }

    async fn create_test_link(state: &AppState, creator: &str) -> LinkResponse {
        let (status, Json(link)) = create_link(
            Auth(user(creator, Role::Member)),
            State(state.clone()),
            Json(CreateLinkRequest {
                title: "Alumni newsletter".to_string(),
                url: "https://example.com/news".to_string(),
                description: Some("Monthly digest".to_string()),
            }),
        )
        .await
        .expect("link creation succeeds");
        assert_eq!(status, StatusCode::CREATED);
        link
    }

    #[tokio::test]
    async fn create_and_list_links() {
        let (state, _temp) = test_state();
        let created = create_test_link(&state, "user-7").await;
        assert_eq!(created.created_by.as_deref(), Some("user-7"));

        let Json(links) = list_links(State(state)).await.unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].id, created.id);
        assert_eq!(links[0].bookmark_count, 0);
    }

    #[tokio::test]
    async fn create_rejects_invalid_url() {
        let (state, _temp) = test_state();

        let err = create_link(
            Auth(user("user-7", Role::Member)),
            State(state.clone()),
            Json(CreateLinkRequest {
                title: "Bad".to_string(),
                url: "not a url".to_string(),
                description: None,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let err = create_link(
            Auth(user("user-7", Role::Member)),
            State(state),
            Json(CreateLinkRequest {
                title: "Sneaky".to_string(),
                url: "javascript:alert(1)".to_string(),
                description: None,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn non_owner_update_is_forbidden() {
        let (state, _temp) = test_state();
        // Link 3 is owned by user 9; user 7 is not an admin.
        let link = create_test_link(&state, "user-9").await;

        let err = update_link(
            Auth(user("user-7", Role::Member)),
            State(state.clone()),
            Path(link.id.clone()),
            Json(UpdateLinkRequest {
                title: Some("Hijacked".to_string()),
                ..Default::default()
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);

        // The owner succeeds.
        let Json(updated) = update_link(
            Auth(user("user-9", Role::Member)),
            State(state.clone()),
            Path(link.id.clone()),
            Json(UpdateLinkRequest {
                title: Some("Renamed".to_string()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();
        assert_eq!(updated.title, "Renamed");

        // So does an admin.
        let result = update_link(
            Auth(user("admin-1", Role::Admin)),
            State(state),
            Path(link.id),
            Json(UpdateLinkRequest {
                description: Some("moderated".to_string()),
                ..Default::default()
            }),
        )
        .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn ownerless_link_is_admin_only() {
        let (state, _temp) = test_state();
        let store = state.store();
        LinkRepository::new(&store)
            .create(&StoredLink {
                id: "legacy-1".to_string(),
                title: "Imported".to_string(),
                url: "https://example.com".to_string(),
                description: None,
                created_by: None,
                created_at: Utc::now(),
            })
            .unwrap();

        let err = delete_link(
            Auth(user("user-7", Role::Member)),
            State(state.clone()),
            Path("legacy-1".to_string()),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);

        let status = delete_link(
            Auth(user("admin-1", Role::Admin)),
            State(state),
            Path("legacy-1".to_string()),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn delete_cascades_ledger_entries() {
        let (state, _temp) = test_state();
        let link = create_test_link(&state, "user-9").await;

        let store = state.store();
        BookmarkRepository::new(&store)
            .add(&crate::storage::StoredBookmark {
                user_id: "user-7".to_string(),
                item_id: link.id.clone(),
                item_kind: ItemKind::Link,
                created_at: Utc::now(),
            })
            .unwrap();

        delete_link(
            Auth(user("user-9", Role::Member)),
            State(state.clone()),
            Path(link.id.clone()),
        )
        .await
        .unwrap();

        assert_eq!(
            BookmarkRepository::new(&store)
                .count_for_item(&link.id, ItemKind::Link)
                .unwrap(),
            0
        );
    }
}

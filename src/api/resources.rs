// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Alumnet

//! Shared resource endpoints.
//!
//! Same policy as links (public reads, authenticated creation,
//! owner-or-admin mutation); descriptions carry rich text and go through
//! the allow-list sanitizer. Served under `/api/ressources`, the path the
//! SPA has consumed since the first deployment.

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
    models::{CreateResourceRequest, ResourceResponse, UpdateResourceRequest},
    sanitize::{sanitize_plain_text, sanitize_rich_text},
    state::AppState,
    storage::{
        AuditEventType, BookmarkRepository, ItemKind, OwnershipEnforcer, ResourceRepository,
        StoredResource,
    },
};

fn validate_url(raw: &str) -> Result<String, ApiError> {
    let parsed = Url::parse(raw).map_err(|_| ApiError::bad_request("url is not a valid URL"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ApiError::bad_request("url must be http or https"));
    }
    Ok(parsed.to_string())
}

/// List shared resources, newest first.
#[utoipa::path(
    get,
    path = "/api/ressources",
    tag = "Resources",
    responses((status = 200, description = "Shared resources", body = [ResourceResponse]))
)]
pub async fn list_resources(
    State(state): State<AppState>,
) -> Result<Json<Vec<ResourceResponse>>, ApiError> {
    let store = state.store();
    let resources = ResourceRepository::new(&store).list_all()?;
    let bookmarks = BookmarkRepository::new(&store);

    let mut responses = Vec::new();
    for resource in resources {
        let count = bookmarks.count_for_item(&resource.id, ItemKind::Resource)?;
        responses.push(ResourceResponse::from_parts(resource, count));
    }

    Ok(Json(responses))
}

/// Get a single shared resource.
#[utoipa::path(
    get,
    path = "/api/ressources/{resource_id}",
    tag = "Resources",
    params(("resource_id" = String, Path, description = "Resource ID")),
    responses(
        (status = 200, description = "Resource details", body = ResourceResponse),
        (status = 404, description = "Resource not found")
    )
)]
pub async fn get_resource(
    State(state): State<AppState>,
    Path(resource_id): Path<String>,
) -> Result<Json<ResourceResponse>, ApiError> {
    let store = state.store();
    let resource = ResourceRepository::new(&store).get(&resource_id)?;
    let count =
        BookmarkRepository::new(&store).count_for_item(&resource.id, ItemKind::Resource)?;
    Ok(Json(ResourceResponse::from_parts(resource, count)))
}

/// Create a shared resource.
#[utoipa::path(
    post,
    path = "/api/ressources",
    tag = "Resources",
    security(("bearer_auth" = [])),
    request_body = CreateResourceRequest,
    responses(
        (status = 201, description = "Resource created", body = ResourceResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_resource(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(request): Json<CreateResourceRequest>,
) -> Result<(StatusCode, Json<ResourceResponse>), ApiError> {
    let title = sanitize_plain_text(&request.title);
    if title.trim().is_empty() {
        return Err(ApiError::bad_request("title must not be empty"));
    }

    let now = Utc::now();
    let resource = StoredResource {
        id: uuid::Uuid::new_v4().to_string(),
        title,
        description: sanitize_rich_text(&request.description),
        url: request.url.as_deref().map(validate_url).transpose()?,
        category: request
            .category
            .map(|category| sanitize_plain_text(&category)),
        created_by: Some(user.id.clone()),
        created_at: now,
        updated_at: now,
    };

    let store = state.store();
    ResourceRepository::new(&store).create(&resource)?;

    audit_log!(
        &store,
        AuditEventType::ResourceCreated,
        &user,
        "resource",
        &resource.id
    );

    Ok((
        StatusCode::CREATED,
        Json(ResourceResponse::from_parts(resource, 0)),
    ))
}

/// Update a shared resource. Owner or admin.
#[utoipa::path(
    put,
    path = "/api/ressources/{resource_id}",
    tag = "Resources",
    security(("bearer_auth" = [])),
    params(("resource_id" = String, Path, description = "Resource ID")),
    request_body = UpdateResourceRequest,
    responses(
        (status = 200, description = "Resource updated", body = ResourceResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the owner and not an admin"),
        (status = 404, description = "Resource not found")
    )
)]
pub async fn update_resource(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(resource_id): Path<String>,
    Json(request): Json<UpdateResourceRequest>,
) -> Result<Json<ResourceResponse>, ApiError> {
    let store = state.store();
    let repo = ResourceRepository::new(&store);
    let mut resource = repo.get(&resource_id)?;

    if let Err(denied) = resource.ensure_can_modify(&user) {
        audit_log!(
            &store,
            AuditEventType::PermissionDenied,
            &user,
            "resource",
            &resource_id
        );
        return Err(denied.into());
    }

    if let Some(title) = request.title {
        let title = sanitize_plain_text(&title);
        if title.trim().is_empty() {
            return Err(ApiError::bad_request("title must not be empty"));
        }
        resource.title = title;
    }
    if let Some(description) = request.description {
        resource.description = sanitize_rich_text(&description);
    }
    if let Some(url) = request.url {
        resource.url = Some(validate_url(&url)?);
    }
    if let Some(category) = request.category {
        resource.category = Some(sanitize_plain_text(&category));
    }
    resource.updated_at = Utc::now();

    repo.update(&resource)?;

    audit_log!(
        &store,
        AuditEventType::ResourceUpdated,
        &user,
        "resource",
        &resource_id
    );

    let count =
        BookmarkRepository::new(&store).count_for_item(&resource.id, ItemKind::Resource)?;
    Ok(Json(ResourceResponse::from_parts(resource, count)))
}

/// Delete a shared resource. Owner or admin. Cascades to the ledger.
#[utoipa::path(
    delete,
    path = "/api/ressources/{resource_id}",
    tag = "Resources",
    security(("bearer_auth" = [])),
    params(("resource_id" = String, Path, description = "Resource ID")),
    responses(
        (status = 204, description = "Resource deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the owner and not an admin"),
        (status = 404, description = "Resource not found")
    )
)]
pub async fn delete_resource(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(resource_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let store = state.store();
    let repo = ResourceRepository::new(&store);
    let resource = repo.get(&resource_id)?;

    if let Err(denied) = resource.ensure_can_modify(&user) {
        audit_log!(
            &store,
            AuditEventType::PermissionDenied,
            &user,
            "resource",
            &resource_id
        );
        return Err(denied.into());
    }

    repo.delete(&resource_id)?;
    BookmarkRepository::new(&store).remove_for_item(&resource_id, ItemKind::Resource)?;

    audit_log!(
        &store,
        AuditEventType::ResourceDeleted,
        &user,
        "resource",
        &resource_id
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
        let state = AppState::new(store, TokenCodec::new(b"resources-test-secret"), media);
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

    #[tokio::test]
    async fn create_sanitizes_rich_description() {
        let (state, _temp) = test_state();

        let (status, Json(resource)) = create_resource(
            Auth(user("user-7", Role::Member)),
            State(state),
            Json(CreateResourceRequest {
                title: "Guide".to_string(),
                description: "<p>Read <script>alert(1)</script><strong>this</strong></p>"
                    .to_string(),
                url: Some("https://example.com/guide.pdf".to_string()),
                category: Some("career".to_string()),
            }),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(resource.description, "<p>Read <strong>this</strong></p>");
    }

    #[tokio::test]
    async fn update_follows_owner_or_admin_policy() {
        let (state, _temp) = test_state();

        let (_, Json(resource)) = create_resource(
            Auth(user("user-9", Role::Member)),
            State(state.clone()),
            Json(CreateResourceRequest {
                title: "Guide".to_string(),
                description: "<p>v1</p>".to_string(),
                url: None,
                category: None,
            }),
        )
        .await
        .unwrap();

        let err = update_resource(
            Auth(user("user-7", Role::Member)),
            State(state.clone()),
            Path(resource.id.clone()),
            Json(UpdateResourceRequest {
                title: Some("Hijacked".to_string()),
                ..Default::default()
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);

        let Json(updated) = update_resource(
            Auth(user("user-9", Role::Member)),
            State(state),
            Path(resource.id),
            Json(UpdateResourceRequest {
                description: Some("<p>v2</p>".to_string()),
                ..Default::default()
            }),
        )
        .await
        .unwrap();
        assert_eq!(updated.description, "<p>v2</p>");
    }

    #[tokio::test]
    async fn missing_resource_is_404() {
        let (state, _temp) = test_state();

        let err = get_resource(State(state), Path("ghost".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}

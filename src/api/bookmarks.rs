// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Alumnet

//! Bookmark endpoints.
//!
//! The ledger holds one relation per `(user, item, kind)`; counts are
//! computed from it, so there is no counter to drift. Mutations take the
//! state-level toggle lock, making the existence-check-then-write pair
//! atomic under concurrent requests.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    audit_log,
    auth::Auth,
    error::ApiError,
    models::{
        BookmarkCheckResponse, BookmarkCountResponse, BookmarkResponse, CreateBookmarkRequest,
    },
    state::AppState,
    storage::{
        AuditEventType, BookmarkRepository, DocumentStore, ItemKind, LinkRepository,
        ProfileRepository, ResourceRepository, StorageError, StoredBookmark,
    },
};

/// Query string carrying the bookmarked item's kind.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ItemTypeQuery {
    pub item_type: ItemKind,
}

/// Optional kind filter for listings.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ItemTypeFilter {
    pub item_type: Option<ItemKind>,
}

fn item_exists(store: &DocumentStore, item_id: &str, kind: ItemKind) -> bool {
    match kind {
        ItemKind::Alumni => ProfileRepository::new(store).exists(item_id),
        ItemKind::Resource => ResourceRepository::new(store).exists(item_id),
        ItemKind::Link => LinkRepository::new(store).exists(item_id),
    }
}

/// Bookmark an item for the authenticated user.
///
/// The target must exist; bookmarking it twice is a conflict, not an error
/// that changes anything.
#[utoipa::path(
    post,
    path = "/api/bookmarks",
    tag = "Bookmarks",
    security(("bearer_auth" = [])),
    request_body = CreateBookmarkRequest,
    responses(
        (status = 201, description = "Bookmark created", body = BookmarkResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Item not found"),
        (status = 409, description = "Already bookmarked")
    )
)]
pub async fn create_bookmark(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(request): Json<CreateBookmarkRequest>,
) -> Result<(StatusCode, Json<BookmarkResponse>), ApiError> {
    let _guard = state.toggle_lock().lock().await;
    let store = state.store();

    if !item_exists(&store, &request.item_id, request.item_type) {
        return Err(ApiError::not_found("Item not found"));
    }

    let bookmark = StoredBookmark {
        user_id: user.id.clone(),
        item_id: request.item_id,
        item_kind: request.item_type,
        created_at: Utc::now(),
    };

    BookmarkRepository::new(&store)
        .add(&bookmark)
        .map_err(|err| match err {
            StorageError::AlreadyExists(_) => ApiError::conflict("Already bookmarked"),
            other => other.into(),
        })?;

    audit_log!(
        &store,
        AuditEventType::BookmarkAdded,
        &user,
        bookmark.item_kind.as_str(),
        &bookmark.item_id
    );

    Ok((StatusCode::CREATED, Json(bookmark.into())))
}

/// Remove a bookmark of the authenticated user.
#[utoipa::path(
    delete,
    path = "/api/bookmarks/{item_id}",
    tag = "Bookmarks",
    security(("bearer_auth" = [])),
    params(
        ("item_id" = String, Path, description = "Bookmarked item ID"),
        ItemTypeQuery
    ),
    responses(
        (status = 204, description = "Bookmark removed"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Bookmark not found")
    )
)]
pub async fn delete_bookmark(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    Query(query): Query<ItemTypeQuery>,
) -> Result<StatusCode, ApiError> {
    let _guard = state.toggle_lock().lock().await;
    let store = state.store();

    BookmarkRepository::new(&store)
        .remove(&user.id, &item_id, query.item_type)
        .map_err(|err| match err {
            StorageError::NotFound(_) => ApiError::not_found("Bookmark not found"),
            other => other.into(),
        })?;

    audit_log!(
        &store,
        AuditEventType::BookmarkRemoved,
        &user,
        query.item_type.as_str(),
        &item_id
    );

    Ok(StatusCode::NO_CONTENT)
}

/// List a user's bookmarks, for bulk client-side hydration.
///
/// Users see their own ledger; admins see anyone's.
#[utoipa::path(
    get,
    path = "/api/bookmarks/user/{user_id}",
    tag = "Bookmarks",
    security(("bearer_auth" = [])),
    params(
        ("user_id" = String, Path, description = "User whose bookmarks to list"),
        ItemTypeFilter
    ),
    responses(
        (status = 200, description = "Bookmarks", body = [BookmarkResponse]),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not your ledger")
    )
)]
pub async fn list_user_bookmarks(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(filter): Query<ItemTypeFilter>,
) -> Result<Json<Vec<BookmarkResponse>>, ApiError> {
    if !(user.is_admin() || user.id == user_id) {
        return Err(ApiError::forbidden(
            "You can only list your own bookmarks",
        ));
    }

    let store = state.store();
    let bookmarks =
        BookmarkRepository::new(&store).list_for_user(&user_id, filter.item_type)?;

    Ok(Json(bookmarks.into_iter().map(Into::into).collect()))
}

/// Number of users who bookmarked an item.
#[utoipa::path(
    get,
    path = "/api/bookmarks/count/{item_id}",
    tag = "Bookmarks",
    params(
        ("item_id" = String, Path, description = "Item ID"),
        ItemTypeQuery
    ),
    responses((status = 200, description = "Bookmark count", body = BookmarkCountResponse))
)]
pub async fn bookmark_count(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    Query(query): Query<ItemTypeQuery>,
) -> Result<Json<BookmarkCountResponse>, ApiError> {
    let store = state.store();
    let count = BookmarkRepository::new(&store).count_for_item(&item_id, query.item_type)?;

    Ok(Json(BookmarkCountResponse {
        item_id,
        item_type: query.item_type,
        count,
    }))
}

/// Whether the authenticated user has bookmarked an item.
#[utoipa::path(
    get,
    path = "/api/bookmarks/check/{item_id}",
    tag = "Bookmarks",
    security(("bearer_auth" = [])),
    params(
        ("item_id" = String, Path, description = "Item ID"),
        ItemTypeQuery
    ),
    responses(
        (status = 200, description = "Bookmark state", body = BookmarkCheckResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn check_bookmark(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    Query(query): Query<ItemTypeQuery>,
) -> Result<Json<BookmarkCheckResponse>, ApiError> {
    let store = state.store();
    let is_bookmarked =
        BookmarkRepository::new(&store).is_bookmarked(&user.id, &item_id, query.item_type);

    Ok(Json(BookmarkCheckResponse { is_bookmarked }))
}

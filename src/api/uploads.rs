// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Alumnet

//! Media upload endpoint.
//!
//! Accepts a multipart `file` field and hands the bytes to the configured
//! object store. The handler knows nothing about where objects land; it
//! returns the store's public URL.

use axum::{extract::Multipart, extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    audit_log,
    auth::Auth,
    error::ApiError,
    state::AppState,
    storage::AuditEventType,
};

/// Response after a successful upload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Public URL of the stored object.
    pub url: String,
    /// Store key, needed to delete the object later.
    pub key: String,
}

/// Upload a media file (multipart).
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "Uploads",
    security(("bearer_auth" = [])),
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "File stored", body = UploadResponse),
        (status = 400, description = "Missing or empty file field"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn upload_media(
    Auth(user): Auth,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::bad_request("Malformed multipart payload"))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|_| ApiError::bad_request("Failed to read uploaded file"))?;

        if data.is_empty() {
            return Err(ApiError::bad_request("Uploaded file is empty"));
        }

        let object = state.media().put(&data, &content_type)?;

        let store = state.store();
        audit_log!(
            &store,
            AuditEventType::MediaUploaded,
            &user,
            "media",
            &object.key
        );

        return Ok((
            StatusCode::CREATED,
            Json(UploadResponse {
                url: object.url,
                key: object.key,
            }),
        ));
    }

    Err(ApiError::bad_request(
        "Missing 'file' field in multipart payload",
    ))
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Alumnet

//! Credential verification errors.
//!
//! Everything that can go wrong between reading the `Authorization` header
//! and resolving a [`crate::auth::CurrentUser`]. Responses carry a stable
//! `error_code` alongside the human-readable message so the SPA can branch
//! without string-matching.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authorization header is required")]
    MissingAuthHeader,
    #[error("Authorization header must be 'Bearer <token>'")]
    InvalidAuthHeader,
    #[error("Credential is malformed")]
    MalformedToken,
    #[error("Credential has expired, log in again")]
    TokenExpired,
    #[error("Credential does not match a known account")]
    UnknownUser,
    #[error("Insufficient permissions for this operation")]
    InsufficientPermissions,
    #[error("Internal authentication error: {0}")]
    InternalError(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Stable machine-readable code for each variant.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::MalformedToken => "malformed_token",
            AuthError::TokenExpired => "token_expired",
            AuthError::UnknownUser => "unknown_user",
            AuthError::InsufficientPermissions => "insufficient_permissions",
            AuthError::InternalError(_) => "internal_error",
        }
    }

    /// Map to the HTTP status: 401 until identity is proven, 403 after.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InsufficientPermissions => StatusCode::FORBIDDEN,
            AuthError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

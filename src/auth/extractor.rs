// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Alumnet

//! Axum extractors for authenticated users.
//!
//! Three variants share one bearer-token contract:
//!
//! - [`Auth`] rejects with 401 when the credential is missing or invalid.
//! - [`AdminOnly`] additionally rejects non-admins with 403.
//! - [`OptionalAuth`] never rejects; handlers branch on `Option`.
//!
//! On success the subject is re-read from the user store, so role changes
//! and profile re-linking apply immediately even to tokens minted before
//! the change. That costs one store lookup per authenticated request.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::state::AppState;
use crate::storage::UserRepository;

use super::{AuthError, CurrentUser};

/// Extractor requiring a valid credential.
///
/// # Example
///
/// ```rust,ignore
/// async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
///     // user is CurrentUser
/// }
/// ```
pub struct Auth(pub CurrentUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // A previous extractor on the same request may already have resolved
        // the user.
        if let Some(user) = parts.extensions.get::<CurrentUser>().cloned() {
            return Ok(Auth(user));
        }

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidAuthHeader)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidAuthHeader)?
            .trim();

        let claims = state.tokens().verify(token)?;

        let store = state.store();
        let repo = UserRepository::new(&store);
        let user = repo.get(&claims.sub).map_err(|_| AuthError::UnknownUser)?;

        let user = CurrentUser::from(user);
        parts.extensions.insert(user.clone());
        Ok(Auth(user))
    }
}

/// Extractor requiring a valid credential belonging to an admin.
pub struct AdminOnly(pub CurrentUser);

impl FromRequestParts<AppState> for AdminOnly {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Auth(user) = Auth::from_request_parts(parts, state).await?;

        if !user.is_admin() {
            return Err(AuthError::InsufficientPermissions);
        }

        Ok(AdminOnly(user))
    }
}

/// Optional authentication extractor.
///
/// Yields `None` instead of rejecting, for public endpoints that show more
/// when an identity is present.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match Auth::from_request_parts(parts, state).await {
            Ok(Auth(user)) => Ok(OptionalAuth(Some(user))),
            Err(_) => Ok(OptionalAuth(None)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Role, TokenCodec};
    use crate::media::LocalMediaStore;
    use crate::storage::{DocumentStore, StoragePaths, StoredUser};
    use axum::http::Request;
    use chrono::Utc;
    use std::sync::Arc;
    use tempfile::TempDir;

    const SECRET: &[u8] = b"extractor-test-secret";

    fn test_state() -> (AppState, TempDir) {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let mut store = DocumentStore::new(StoragePaths::new(temp.path()));
        store.initialize().expect("Failed to initialize store");

        let media = Arc::new(LocalMediaStore::new(store.clone(), "/media"));
        let state = AppState::new(store, TokenCodec::new(SECRET), media);
        (state, temp)
    }

    fn seed_user(state: &AppState, id: &str, is_admin: bool) {
        let store = state.store();
        let repo = UserRepository::new(&store);
        repo.create(&StoredUser {
            id: id.to_string(),
            username: format!("{id}-name"),
            password_hash: "hash".to_string(),
            is_admin,
            linked_profile_id: None,
            created_at: Utc::now(),
        })
        .unwrap();
    }

    fn request_parts(token: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/test");
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn auth_requires_header() {
        let (state, _temp) = test_state();
        let mut parts = request_parts(None);

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));
    }

    #[tokio::test]
    async fn auth_rejects_non_bearer_header() {
        let (state, _temp) = test_state();
        let mut parts = Request::builder()
            .uri("/test")
            .header("Authorization", "Basic dXNlcjpwYXNz")
            .body(())
            .unwrap()
            .into_parts()
            .0;

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidAuthHeader)));
    }

    #[tokio::test]
    async fn auth_resolves_user_from_store() {
        let (state, _temp) = test_state();
        seed_user(&state, "user-1", false);

        let token = state
            .tokens()
            .issue("user-1", Role::Member, None)
            .unwrap();
        let mut parts = request_parts(Some(&token));

        let Auth(user) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(user.id, "user-1");
        assert_eq!(user.role, Role::Member);
    }

    #[tokio::test]
    async fn auth_rejects_token_for_deleted_user() {
        let (state, _temp) = test_state();
        // No user seeded: the token is valid but the subject is gone.
        let token = state.tokens().issue("ghost", Role::Member, None).unwrap();
        let mut parts = request_parts(Some(&token));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::UnknownUser)));
    }

    #[tokio::test]
    async fn store_role_wins_over_stale_token_claim() {
        let (state, _temp) = test_state();
        // Token says member; the store has since promoted the user.
        seed_user(&state, "user-1", true);
        let token = state
            .tokens()
            .issue("user-1", Role::Member, None)
            .unwrap();
        let mut parts = request_parts(Some(&token));

        let Auth(user) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(user.role, Role::Admin);

        // And AdminOnly accepts on the same request.
        let mut parts = request_parts(Some(&token));
        let result = AdminOnly::from_request_parts(&mut parts, &state).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn admin_only_rejects_member() {
        let (state, _temp) = test_state();
        seed_user(&state, "user-1", false);
        let token = state
            .tokens()
            .issue("user-1", Role::Member, None)
            .unwrap();
        let mut parts = request_parts(Some(&token));

        let result = AdminOnly::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InsufficientPermissions)));
    }

    #[tokio::test]
    async fn optional_auth_returns_none_on_any_failure() {
        let (state, _temp) = test_state();

        let mut parts = request_parts(None);
        let OptionalAuth(user) = OptionalAuth::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert!(user.is_none());

        let mut parts = request_parts(Some("garbage-token"));
        let OptionalAuth(user) = OptionalAuth::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert!(user.is_none());
    }
}

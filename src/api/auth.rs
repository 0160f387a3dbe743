// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Alumnet

//! Authentication endpoints: login and current-user lookup.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, State},
    Json,
};

use crate::{
    audit_log,
    auth::{password, Auth, Role},
    error::ApiError,
    models::{LoginRequest, LoginResponse, UserResponse},
    state::AppState,
    storage::{AuditEvent, AuditEventType, AuditRepository, UserRepository},
};

/// Log in with username and password.
///
/// Successful login returns a bearer token valid for seven days and the
/// resolved user. Throttled to 5 attempts per minute per client IP.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid username or password"),
        (status = 429, description = "Too many login attempts")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    // Throttle before touching the store.
    {
        let mut limiter = state
            .login_limiter()
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !limiter.check(addr.ip()) {
            return Err(ApiError::rate_limited("Too many login attempts"));
        }
    }

    let store = state.store();
    let repo = UserRepository::new(&store);

    let user = match repo.find_by_username(&request.username)? {
        Some(user) => user,
        None => {
            log_failed_login(&state, &request.username);
            return Err(ApiError::unauthorized("Invalid username or password"));
        }
    };

    if !password::verify_password(&user.password_hash, &request.password) {
        log_failed_login(&state, &request.username);
        return Err(ApiError::unauthorized("Invalid username or password"));
    }

    let role = if user.is_admin { Role::Admin } else { Role::Member };
    let token = state
        .tokens()
        .issue(&user.id, role, user.linked_profile_id.as_deref())?;

    let current = crate::auth::CurrentUser::from(user.clone());
    audit_log!(&store, AuditEventType::LoginSuccess, &current);

    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}

fn log_failed_login(state: &AppState, username: &str) {
    let store = state.store();
    let repo = AuditRepository::new(&store);
    let _ = repo.log(
        &AuditEvent::new(AuditEventType::LoginFailure)
            .with_resource("username", username)
            .failed("invalid credentials"),
    );
}

/// Get the current authenticated user's information.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User information", body = UserResponse),
        (status = 401, description = "Unauthorized - invalid or missing token")
    )
)]
pub async fn current_user(Auth(user): Auth) -> Json<UserResponse> {
    Json(user.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenCodec;
    use crate::media::LocalMediaStore;
    use crate::storage::{DocumentStore, StoragePaths, StoredUser};
    use chrono::Utc;
    use std::net::{IpAddr, SocketAddr};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn test_state() -> (AppState, TempDir) {
        let temp = TempDir::new().unwrap();
        let mut store = DocumentStore::new(StoragePaths::new(temp.path()));
        store.initialize().unwrap();

        let media = Arc::new(LocalMediaStore::new(store.clone(), "/media"));
        let state = AppState::new(store, TokenCodec::new(b"login-test-secret"), media);
        (state, temp)
    }

    fn seed_user(state: &AppState, username: &str, password: &str, is_admin: bool) -> StoredUser {
        let user = StoredUser {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.to_string(),
            password_hash: password::hash_password(password).unwrap(),
            is_admin,
            linked_profile_id: None,
            created_at: Utc::now(),
        };
        let store = state.store();
        UserRepository::new(&store).create(&user).unwrap();
        user
    }

    fn addr(last: u8) -> ConnectInfo<SocketAddr> {
        ConnectInfo(SocketAddr::new(IpAddr::from([10, 0, 0, last]), 4000))
    }

    fn login_request(username: &str, password: &str) -> Json<LoginRequest> {
        Json(LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    #[tokio::test]
    async fn login_returns_token_for_the_right_user() {
        let (state, _temp) = test_state();
        let seeded = seed_user(&state, "ada", "correct horse", false);

        let Json(response) = login(
            State(state.clone()),
            addr(1),
            login_request("ada", "correct horse"),
        )
        .await
        .expect("login succeeds");

        assert_eq!(response.user.id, seeded.id);
        assert_eq!(response.user.role, Role::Member);

        // The token's subject is the stored user's id.
        let claims = state.tokens().verify(&response.token).unwrap();
        assert_eq!(claims.sub, seeded.id);
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let (state, _temp) = test_state();
        seed_user(&state, "ada", "correct horse", false);

        let err = login(State(state), addr(2), login_request("ada", "wrong"))
            .await
            .unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn login_rejects_unknown_user() {
        let (state, _temp) = test_state();

        let err = login(State(state), addr(3), login_request("nobody", "pw"))
            .await
            .unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn sixth_attempt_in_a_window_is_throttled() {
        let (state, _temp) = test_state();
        seed_user(&state, "ada", "correct horse", false);

        for _ in 0..5 {
            let _ = login(
                State(state.clone()),
                addr(4),
                login_request("ada", "wrong"),
            )
            .await;
        }

        let err = login(
            State(state.clone()),
            addr(4),
            login_request("ada", "correct horse"),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::TOO_MANY_REQUESTS);

        // A different IP is unaffected.
        let result = login(State(state), addr(5), login_request("ada", "correct horse")).await;
        assert!(result.is_ok());
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Alumnet

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{
        AnnouncementResponse, BookmarkCheckResponse, BookmarkCountResponse, BookmarkResponse,
        CreateAnnouncementRequest, CreateBookmarkRequest, CreateLinkRequest,
        CreateProfileRequest, CreateResourceRequest, LinkResponse, LoginRequest, LoginResponse,
        ProfileResponse, ResourceResponse, UpdateAnnouncementRequest, UpdateLinkRequest,
        UpdateProfileRequest, UpdateResourceRequest, UserResponse,
    },
    state::AppState,
};

pub mod admin;
pub mod alumni;
pub mod announcements;
pub mod auth;
pub mod bookmarks;
pub mod health;
pub mod links;
pub mod resources;
pub mod uploads;

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::current_user))
        .route(
            "/alumni",
            get(alumni::list_profiles).post(alumni::create_profile),
        )
        .route(
            "/alumni/{profile_id}",
            get(alumni::get_profile)
                .put(alumni::update_profile)
                .patch(alumni::update_profile)
                .delete(alumni::delete_profile),
        )
        .route("/links", get(links::list_links).post(links::create_link))
        .route(
            "/links/{link_id}",
            get(links::get_link)
                .put(links::update_link)
                .delete(links::delete_link),
        )
        .route(
            "/ressources",
            get(resources::list_resources).post(resources::create_resource),
        )
        .route(
            "/ressources/{resource_id}",
            get(resources::get_resource)
                .put(resources::update_resource)
                .delete(resources::delete_resource),
        )
        .route("/bookmarks", post(bookmarks::create_bookmark))
        .route("/bookmarks/{item_id}", delete(bookmarks::delete_bookmark))
        .route(
            "/bookmarks/user/{user_id}",
            get(bookmarks::list_user_bookmarks),
        )
        .route("/bookmarks/count/{item_id}", get(bookmarks::bookmark_count))
        .route("/bookmarks/check/{item_id}", get(bookmarks::check_bookmark))
        .route(
            "/announcements",
            get(announcements::list_announcements).post(announcements::create_announcement),
        )
        .route(
            "/announcements/{announcement_id}",
            put(announcements::update_announcement).delete(announcements::delete_announcement),
        )
        .route("/upload", post(uploads::upload_media))
        .route("/health", get(health::health_check))
        .route(
            "/admin/users",
            get(admin::list_users).post(admin::create_user),
        )
        .route("/admin/stats", get(admin::system_stats))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::login,
        auth::current_user,
        alumni::list_profiles,
        alumni::get_profile,
        alumni::create_profile,
        alumni::update_profile,
        alumni::delete_profile,
        links::list_links,
        links::get_link,
        links::create_link,
        links::update_link,
        links::delete_link,
        resources::list_resources,
        resources::get_resource,
        resources::create_resource,
        resources::update_resource,
        resources::delete_resource,
        bookmarks::create_bookmark,
        bookmarks::delete_bookmark,
        bookmarks::list_user_bookmarks,
        bookmarks::bookmark_count,
        bookmarks::check_bookmark,
        announcements::list_announcements,
        announcements::create_announcement,
        announcements::update_announcement,
        announcements::delete_announcement,
        uploads::upload_media,
        health::health_check,
        admin::create_user,
        admin::list_users,
        admin::system_stats
    ),
    components(
        schemas(
            LoginRequest,
            LoginResponse,
            UserResponse,
            ProfileResponse,
            CreateProfileRequest,
            UpdateProfileRequest,
            ResourceResponse,
            CreateResourceRequest,
            UpdateResourceRequest,
            LinkResponse,
            CreateLinkRequest,
            UpdateLinkRequest,
            CreateBookmarkRequest,
            BookmarkResponse,
            BookmarkCheckResponse,
            BookmarkCountResponse,
            AnnouncementResponse,
            CreateAnnouncementRequest,
            UpdateAnnouncementRequest,
            uploads::UploadResponse,
            health::HealthResponse,
            admin::CreateUserRequest,
            admin::SystemStatsResponse
        )
    ),
    tags(
        (name = "Auth", description = "Login and session introspection"),
        (name = "Alumni", description = "Alumni profile management"),
        (name = "Links", description = "Shared link management"),
        (name = "Resources", description = "Shared resource management"),
        (name = "Bookmarks", description = "Bookmark ledger"),
        (name = "Announcements", description = "Announcements feed"),
        (name = "Uploads", description = "Media uploads"),
        (name = "Health", description = "Service health"),
        (name = "Admin", description = "Account management and statistics")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{password, TokenCodec};
    use crate::media::LocalMediaStore;
    use crate::storage::{
        DocumentStore, LinkRepository, StoragePaths, StoredLink, StoredUser, UserRepository,
    };
    use axum::body::{to_bytes, Body};
    use axum::extract::ConnectInfo;
    use axum::http::{header, Request, StatusCode};
    use chrono::Utc;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_state() -> (AppState, TempDir) {
        let temp = TempDir::new().unwrap();
        let mut store = DocumentStore::new(StoragePaths::new(temp.path()));
        store.initialize().unwrap();

        let media = Arc::new(LocalMediaStore::new(store.clone(), "/media"));
        let state = AppState::new(store, TokenCodec::new(b"router-test-secret"), media);
        (state, temp)
    }

    fn seed_user(state: &AppState, id: &str, username: &str, pw: &str, is_admin: bool) {
        let store = state.store();
        UserRepository::new(&store)
            .create(&StoredUser {
                id: id.to_string(),
                username: username.to_string(),
                password_hash: password::hash_password(pw).unwrap(),
                is_admin,
                linked_profile_id: None,
                created_at: Utc::now(),
            })
            .unwrap();
    }

    fn json_request(method: &str, uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let mut request = builder.body(Body::from(body.to_string())).unwrap();
        // The router is driven without a TCP listener; inject the peer
        // address that into_make_service_with_connect_info would provide.
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))));
        request
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let (state, _temp) = test_state();
        let app = router(state);
        let _ = app.into_make_service();
    }

    #[tokio::test]
    async fn protected_route_rejects_anonymous_requests() {
        let (state, _temp) = test_state();
        let app = router(state);

        let response = app
            .oneshot(json_request("GET", "/api/auth/me", None, ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn login_then_put_on_foreign_link_is_forbidden() {
        let (state, _temp) = test_state();
        seed_user(&state, "user-7", "seven", "password-seven", false);

        // Link 3 belongs to user 9.
        let store = state.store();
        LinkRepository::new(&store)
            .create(&StoredLink {
                id: "link-3".to_string(),
                title: "Owned by nine".to_string(),
                url: "https://example.com".to_string(),
                description: None,
                created_by: Some("user-9".to_string()),
                created_at: Utc::now(),
            })
            .unwrap();

        let app = router(state);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/login",
                None,
                r#"{"username":"seven","password":"password-seven"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let login = body_json(response).await;
        let token = login["token"].as_str().unwrap().to_string();
        assert_eq!(login["user"]["id"], "user-7");

        let response = app
            .oneshot(json_request(
                "PUT",
                "/api/links/link-3",
                Some(&token),
                r#"{"title":"Hijacked"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = body_json(response).await;
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn bookmark_flow_through_the_router() {
        let (state, _temp) = test_state();
        seed_user(&state, "user-1", "ada", "password-ada", true);

        let app = router(state);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/login",
                None,
                r#"{"username":"ada","password":"password-ada"}"#,
            ))
            .await
            .unwrap();
        let token = body_json(response).await["token"]
            .as_str()
            .unwrap()
            .to_string();

        // Create a profile to bookmark (admin).
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/alumni",
                Some(&token),
                r#"{"name":"Grace Hopper"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let profile_id = body_json(response).await["id"]
            .as_str()
            .unwrap()
            .to_string();

        // Bookmark it.
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/bookmarks",
                Some(&token),
                &format!(r#"{{"itemId":"{profile_id}","itemType":"alumni"}}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        // The check endpoint reports it.
        let response = app
            .clone()
            .oneshot(json_request(
                "GET",
                &format!("/api/bookmarks/check/{profile_id}?itemType=alumni"),
                Some(&token),
                "",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["isBookmarked"], true);

        // Duplicate insert conflicts; the count stays at one.
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/bookmarks",
                Some(&token),
                &format!(r#"{{"itemId":"{profile_id}","itemType":"alumni"}}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = app
            .oneshot(json_request(
                "GET",
                &format!("/api/bookmarks/count/{profile_id}?itemType=alumni"),
                None,
                "",
            ))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["count"], 1);
    }

    #[tokio::test]
    async fn profile_bookmark_count_is_visible_in_profile_response() {
        let (state, _temp) = test_state();
        seed_user(&state, "user-1", "ada", "password-ada", true);

        let app = router(state.clone());

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/login",
                None,
                r#"{"username":"ada","password":"password-ada"}"#,
            ))
            .await
            .unwrap();
        let token = body_json(response).await["token"]
            .as_str()
            .unwrap()
            .to_string();

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/alumni",
                Some(&token),
                r#"{"name":"Grace"}"#,
            ))
            .await
            .unwrap();
        let profile_id = body_json(response).await["id"]
            .as_str()
            .unwrap()
            .to_string();

        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/bookmarks",
                Some(&token),
                &format!(r#"{{"itemId":"{profile_id}","itemType":"alumni"}}"#),
            ))
            .await
            .unwrap();

        let response = app
            .oneshot(json_request(
                "GET",
                &format!("/api/alumni/{profile_id}"),
                None,
                "",
            ))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["bookmarkCount"], 1);
    }
}

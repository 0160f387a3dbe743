// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Alumnet

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use alumnet_server::api::router;
use alumnet_server::auth::{password, TokenCodec};
use alumnet_server::config;
use alumnet_server::media::LocalMediaStore;
use alumnet_server::state::AppState;
use alumnet_server::storage::{DocumentStore, StoragePaths, StoredUser, UserRepository};

#[tokio::main]
async fn main() {
    init_tracing();

    // Document store
    let data_dir =
        env::var(config::DATA_DIR_ENV).unwrap_or_else(|_| StoragePaths::default().root().display().to_string());
    let mut store = DocumentStore::new(StoragePaths::new(&data_dir));
    store
        .initialize()
        .expect("Failed to initialize document store");
    tracing::info!(data_dir = %data_dir, "document store initialized");

    // Session tokens
    let secret = env::var(config::TOKEN_SECRET_ENV)
        .expect("AUTH_TOKEN_SECRET must be set (HMAC secret for session tokens)");
    let tokens = TokenCodec::new(secret.as_bytes());

    // Bootstrap admin account
    seed_admin(&store);

    // Media object store
    let media_base =
        env::var(config::MEDIA_BASE_URL_ENV).unwrap_or_else(|_| "/media".to_string());
    let media = Arc::new(LocalMediaStore::new(store.clone(), media_base));

    let state = AppState::new(store, tokens, media);
    let app = router(state);

    // Bind address
    let host = env::var(config::HOST_ENV).unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var(config::PORT_ENV)
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .expect("Failed to parse bind address");

    tracing::info!("Alumnet server listening on http://{addr} (docs at /docs)");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("HTTP server failed");
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    let json = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Create the bootstrap admin account if configured and absent.
///
/// Self-registration is disabled, so a fresh deployment needs this (or a
/// pre-seeded data directory) to be usable at all.
fn seed_admin(store: &DocumentStore) {
    let (Ok(username), Ok(pw)) = (
        env::var(config::SEED_ADMIN_USERNAME_ENV),
        env::var(config::SEED_ADMIN_PASSWORD_ENV),
    ) else {
        return;
    };

    let repo = UserRepository::new(store);
    match repo.find_by_username(&username) {
        Ok(Some(_)) => {}
        Ok(None) => {
            let user = StoredUser {
                id: uuid::Uuid::new_v4().to_string(),
                username: username.clone(),
                password_hash: password::hash_password(&pw)
                    .expect("Failed to hash seed admin password"),
                is_admin: true,
                linked_profile_id: None,
                created_at: chrono::Utc::now(),
            };
            repo.create(&user).expect("Failed to seed admin account");
            tracing::info!(username = %username, "seeded admin account");
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to check for seed admin account");
        }
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::error!("failed to install shutdown signal handler");
        return;
    }
    tracing::info!("shutdown signal received");
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Alumnet

use std::sync::{Arc, Mutex};

use crate::auth::TokenCodec;
use crate::media::ObjectStore;
use crate::ratelimit::FixedWindowLimiter;
use crate::storage::DocumentStore;

/// Shared application state, cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    store: DocumentStore,
    tokens: Arc<TokenCodec>,
    media: Arc<dyn ObjectStore>,
    login_limiter: Arc<Mutex<FixedWindowLimiter>>,
    toggle_lock: Arc<tokio::sync::Mutex<()>>,
}

impl AppState {
    pub fn new(store: DocumentStore, tokens: TokenCodec, media: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            tokens: Arc::new(tokens),
            media,
            login_limiter: Arc::new(Mutex::new(FixedWindowLimiter::default())),
            toggle_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// Handle to the document store.
    pub fn store(&self) -> DocumentStore {
        self.store.clone()
    }

    /// Session token codec.
    pub fn tokens(&self) -> &TokenCodec {
        &self.tokens
    }

    /// Media object store.
    pub fn media(&self) -> &dyn ObjectStore {
        self.media.as_ref()
    }

    /// Per-IP login throttle.
    pub fn login_limiter(&self) -> &Mutex<FixedWindowLimiter> {
        &self.login_limiter
    }

    /// Serializes bookmark mutations so a ledger check-then-write pair is
    /// atomic with respect to concurrent toggles.
    pub fn toggle_lock(&self) -> &tokio::sync::Mutex<()> {
        &self.toggle_lock
    }
}

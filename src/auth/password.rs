// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Alumnet

//! Password hashing for local accounts.
//!
//! Hashes are argon2-encoded strings carrying their own salt and parameters,
//! so verification needs nothing beyond the stored value.

use rand::{thread_rng, Rng};

use super::AuthError;

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let mut salt = [0u8; 32];
    thread_rng().fill(&mut salt);

    argon2::hash_encoded(password.as_bytes(), &salt, &argon2::Config::default())
        .map_err(|e| AuthError::InternalError(format!("password hashing failed: {e}")))
}

/// Verify a password against a stored encoded hash.
///
/// Undecodable hashes count as a mismatch rather than an error, so a
/// corrupted user document cannot be logged into.
pub fn verify_password(encoded: &str, password: &str) -> bool {
    argon2::verify_encoded(encoded, password.as_bytes()).unwrap_or(false)
}

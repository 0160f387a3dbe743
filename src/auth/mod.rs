// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Alumnet

//! # Authentication Module
//!
//! Session authentication for the alumni network API.
//!
//! ## Auth Flow
//!
//! 1. Client posts credentials to `/api/auth/login`
//! 2. Server verifies the argon2 password hash and mints an HMAC-signed
//!    session token (7-day validity, no refresh)
//! 3. Client sends `Authorization: Bearer <token>` on protected routes
//! 4. Extractors verify the signature and expiry, then re-read the user
//!    from the store so role changes apply immediately
//!
//! ## Security
//!
//! - Tokens are symmetric (HMAC-SHA256); the secret never leaves the server
//! - No server-side session state and no revocation list; expiry is the
//!   only invalidation
//! - Clock skew tolerance is 60 seconds

pub mod error;
pub mod extractor;
pub mod password;
pub mod roles;
pub mod token;
pub mod user;

pub use error::AuthError;
pub use extractor::{AdminOnly, Auth, OptionalAuth};
pub use roles::Role;
pub use token::{SessionClaims, TokenCodec, TOKEN_TTL_DAYS};
pub use user::CurrentUser;

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Alumnet

//! # Runtime Configuration Constants
//!
//! This module defines environment variable names used throughout the
//! application. Configuration is loaded from the environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Root directory for the document store | `/data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `AUTH_TOKEN_SECRET` | HMAC secret for session tokens | Required |
//! | `SEED_ADMIN_USERNAME` | Username of the bootstrap admin account | Optional |
//! | `SEED_ADMIN_PASSWORD` | Password of the bootstrap admin account | Optional |
//! | `MEDIA_BASE_URL` | Public base URL for uploaded media | `/media` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

/// Environment variable name for the document store root directory.
///
/// All user, profile, resource, link, bookmark, announcement, and audit
/// documents live under this directory.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable name for the server bind address.
pub const HOST_ENV: &str = "HOST";

/// Environment variable name for the server bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the session-token signing secret.
///
/// The secret is held server-side only; tokens are symmetric (HMAC-SHA256)
/// so anyone holding this value can mint credentials.
pub const TOKEN_SECRET_ENV: &str = "AUTH_TOKEN_SECRET";

/// Environment variable name for the seeded admin username.
///
/// Self-registration is disabled; the first admin account is created at
/// startup from this pair of variables if it does not already exist.
pub const SEED_ADMIN_USERNAME_ENV: &str = "SEED_ADMIN_USERNAME";

/// Environment variable name for the seeded admin password.
pub const SEED_ADMIN_PASSWORD_ENV: &str = "SEED_ADMIN_PASSWORD";

/// Environment variable name for the public base URL of uploaded media.
pub const MEDIA_BASE_URL_ENV: &str = "MEDIA_BASE_URL";

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Alumnet

//! The two roles this product distinguishes.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Authorization role of an account.
///
/// Admins manage accounts, author announcements, and may edit anything;
/// members own at most one alumni profile and the content they created.
/// The role travels in token claims and API responses as a lowercase
/// string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Member,
}

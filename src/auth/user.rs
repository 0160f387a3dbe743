// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Alumnet

//! Resolved identity of the requesting user.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::storage::StoredUser;

use super::roles::Role;

/// The authenticated user attached to a request.
///
/// Built from the user document re-read on every authenticated request, not
/// from token claims alone, so role changes and profile re-linking take
/// effect without waiting for tokens to expire.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrentUser {
    /// Canonical user id.
    pub id: String,
    /// Login name.
    pub username: String,
    /// Current role.
    pub role: Role,
    /// Linked alumni profile id, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
}

impl CurrentUser {
    /// Check if this user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Check if this user owns the given alumni profile.
    pub fn owns_profile(&self, profile_id: &str) -> bool {
        self.profile_id.as_deref() == Some(profile_id)
    }
}

impl From<StoredUser> for CurrentUser {
    fn from(user: StoredUser) -> Self {
        let role = if user.is_admin { Role::Admin } else { Role::Member };
        Self {
            id: user.id,
            username: user.username,
            role,
            profile_id: user.linked_profile_id,
        }
    }
}

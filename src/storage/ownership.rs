// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Alumnet

//! Owner-or-admin authorization policy.
//!
//! Mutation of links, resources, and alumni self-service fields is allowed
//! to administrators and to the resource's creator. A resource with no
//! recorded creator is modifiable by administrators only.

use crate::auth::CurrentUser;

use super::{StorageError, StorageResult};

/// Trait for resources that may have an owner.
pub trait OwnedResource {
    /// The creating user's id, if the resource has one.
    fn owner_user_id(&self) -> Option<&str>;
}

/// The "admin or owner" rule.
pub fn can_modify(user: &CurrentUser, owner: Option<&str>) -> bool {
    user.is_admin() || owner.is_some_and(|owner_id| owner_id == user.id)
}

/// Trait for enforcing the policy on storage-backed resources.
pub trait OwnershipEnforcer {
    /// Verify that the user may modify this resource.
    ///
    /// # Errors
    /// Returns `StorageError::PermissionDenied` when the policy rejects.
    fn ensure_can_modify(&self, user: &CurrentUser) -> StorageResult<()>;
}

impl<T: OwnedResource> OwnershipEnforcer for T {
    fn ensure_can_modify(&self, user: &CurrentUser) -> StorageResult<()> {
        if can_modify(user, self.owner_user_id()) {
            Ok(())
        } else {
            Err(StorageError::PermissionDenied {
                user_id: user.id.clone(),
                resource: "resource".to_string(),
            })
        }
    }
}

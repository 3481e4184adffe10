// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Claims issuance from persisted user records.

use std::sync::Arc;

use tracing::debug;

use crate::claims::CustomClaims;
use crate::error::IssuerError;
use crate::store::UserStore;

/// Derives custom claims from a member's persisted role.
///
/// Issuance reads the store on every call and never caches, so two calls for
/// the same persisted role always return equal claims.
#[derive(Clone)]
pub struct ClaimsIssuer {
    users: Arc<dyn UserStore>,
}

impl ClaimsIssuer {
    /// Creates an issuer over a user store.
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Issues claims for `uid`.
    ///
    /// # Errors
    ///
    /// - [`IssuerError::NotFound`] if there is no user record. No default
    ///   role is ever fabricated.
    /// - [`IssuerError::Store`] if the store fails.
    pub async fn issue(&self, uid: &str) -> Result<CustomClaims, IssuerError> {
        let user = self
            .users
            .get_user(uid)
            .await?
            .ok_or_else(|| IssuerError::not_found(uid))?;

        let claims = CustomClaims::for_role(user.role);
        debug!(uid = %uid, role = %claims.role, admin = claims.admin, "Issued claims");
        Ok(claims)
    }
}

impl std::fmt::Debug for ClaimsIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimsIssuer").finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================

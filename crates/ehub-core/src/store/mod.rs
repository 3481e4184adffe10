// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Storage seams for persisted user records and identity records.
//!
//! The user store is owned by account management and holds the authoritative
//! role. The identity store is owned by the identity provider and holds the
//! custom claims that future ID tokens will carry.

mod memory;

pub use memory::{InMemoryIdentityStore, InMemoryUserStore};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::claims::CustomClaims;
use crate::error::StoreResult;
use crate::role::Role;

// =============================================================================
// Records
// =============================================================================

/// A persisted member profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Identity ID.
    pub uid: String,
    /// Contact email.
    pub email: String,
    /// Display name.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Assigned role.
    #[serde(default)]
    pub role: Role,
}

impl UserRecord {
    /// Creates a record.
    pub fn new(uid: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            uid: uid.into(),
            email: email.into(),
            display_name: None,
            role,
        }
    }

    /// Sets the display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

/// An identity as known to the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// Identity ID.
    pub uid: String,
    /// Sign-in email.
    pub email: String,
    /// Display name.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Claims attached to future ID tokens. `None` until first propagation.
    #[serde(default)]
    pub custom_claims: Option<CustomClaims>,
}

impl IdentityRecord {
    /// Creates an identity with no custom claims.
    pub fn new(uid: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: email.into(),
            display_name: None,
            custom_claims: None,
        }
    }
}

impl From<&UserRecord> for IdentityRecord {
    fn from(user: &UserRecord) -> Self {
        Self {
            uid: user.uid.clone(),
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            custom_claims: None,
        }
    }
}

// =============================================================================
// Store Traits
// =============================================================================

/// Read access to persisted user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Returns the record for `uid`, or `None` if there is none.
    async fn get_user(&self, uid: &str) -> StoreResult<Option<UserRecord>>;
}

/// Identity provider operations used by the propagator and token service.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Returns the identity for `uid`, or `None` if there is none.
    async fn get_identity(&self, uid: &str) -> StoreResult<Option<IdentityRecord>>;

    /// Replaces the custom claims on an identity.
    ///
    /// Fails with [`crate::StoreError::IdentityNotFound`] for an unknown uid.
    async fn set_custom_claims(&self, uid: &str, claims: CustomClaims) -> StoreResult<()>;
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! In-memory stores backed by `DashMap`.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use super::{IdentityRecord, IdentityStore, UserRecord, UserStore};
use crate::claims::CustomClaims;
use crate::error::{StoreError, StoreResult};
use crate::role::Role;

// =============================================================================
// User Store
// =============================================================================

/// In-memory user store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<DashMap<String, UserRecord>>,
}

impl InMemoryUserStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with records.
    pub fn with_users(users: impl IntoIterator<Item = UserRecord>) -> Self {
        let store = Self::new();
        for user in users {
            store.insert(user);
        }
        store
    }

    /// Inserts or replaces a record.
    pub fn insert(&self, user: UserRecord) {
        self.users.insert(user.uid.clone(), user);
    }

    /// Changes the role of an existing record.
    ///
    /// Returns `false` if there is no record for `uid`.
    pub fn set_role(&self, uid: &str, role: Role) -> bool {
        match self.users.get_mut(uid) {
            Some(mut user) => {
                user.role = role;
                true
            }
            None => false,
        }
    }

    /// Returns all records, ordered by uid.
    pub fn list(&self) -> Vec<UserRecord> {
        let mut users: Vec<UserRecord> = self.users.iter().map(|e| e.value().clone()).collect();
        users.sort_by(|a, b| a.uid.cmp(&b.uid));
        users
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns `true` if empty.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn get_user(&self, uid: &str) -> StoreResult<Option<UserRecord>> {
        Ok(self.users.get(uid).map(|e| e.value().clone()))
    }
}

// =============================================================================
// Identity Store
// =============================================================================

/// In-memory identity store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentityStore {
    identities: Arc<DashMap<String, IdentityRecord>>,
}

impl InMemoryIdentityStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with one identity per user record.
    pub fn from_users<'a>(users: impl IntoIterator<Item = &'a UserRecord>) -> Self {
        let store = Self::new();
        for user in users {
            store.insert(IdentityRecord::from(user));
        }
        store
    }

    /// Inserts or replaces an identity.
    pub fn insert(&self, identity: IdentityRecord) {
        self.identities.insert(identity.uid.clone(), identity);
    }

    /// Returns the custom claims currently stored for `uid`.
    pub fn claims_of(&self, uid: &str) -> Option<CustomClaims> {
        self.identities.get(uid).and_then(|e| e.custom_claims)
    }

    /// Returns the number of identities.
    pub fn len(&self) -> usize {
        self.identities.len()
    }

    /// Returns `true` if empty.
    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn get_identity(&self, uid: &str) -> StoreResult<Option<IdentityRecord>> {
        Ok(self.identities.get(uid).map(|e| e.value().clone()))
    }

    async fn set_custom_claims(&self, uid: &str, claims: CustomClaims) -> StoreResult<()> {
        match self.identities.get_mut(uid) {
            Some(mut identity) => {
                identity.custom_claims = Some(claims);
                Ok(())
            }
            None => Err(StoreError::identity_not_found(uid)),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

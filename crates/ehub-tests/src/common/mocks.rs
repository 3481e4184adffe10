// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Mock Implementations
//!
//! Stores with injectable failures and a navigator that records redirects.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use ehub_client::Navigator;
use ehub_core::store::InMemoryIdentityStore;
use ehub_core::{
    CustomClaims, IdentityRecord, IdentityStore, StoreError, StoreResult, UserRecord, UserStore,
};
use parking_lot::Mutex;

// =============================================================================
// User Store
// =============================================================================

/// A user store that is always unreachable.
#[derive(Debug, Default)]
pub struct UnavailableUserStore {
    lookups: AtomicU64,
}

impl UnavailableUserStore {
    /// Returns how many lookups were attempted.
    pub fn lookups(&self) -> u64 {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserStore for UnavailableUserStore {
    async fn get_user(&self, _uid: &str) -> StoreResult<Option<UserRecord>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::unavailable("connection refused"))
    }
}

// =============================================================================
// Identity Store
// =============================================================================

/// An in-memory identity store whose writes can be made to fail.
#[derive(Debug, Clone)]
pub struct FlakyIdentityStore {
    inner: InMemoryIdentityStore,
    fail_writes: Arc<AtomicBool>,
    writes: Arc<AtomicU64>,
}

impl FlakyIdentityStore {
    /// Wraps a store with one identity per record.
    pub fn from_users<'a>(users: impl IntoIterator<Item = &'a UserRecord>) -> Self {
        Self {
            inner: InMemoryIdentityStore::from_users(users),
            fail_writes: Arc::new(AtomicBool::new(false)),
            writes: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Makes every following write fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Returns how many writes were attempted.
    pub fn write_attempts(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Returns the claims currently stored for `uid`.
    pub fn claims_of(&self, uid: &str) -> Option<CustomClaims> {
        self.inner.claims_of(uid)
    }
}

#[async_trait]
impl IdentityStore for FlakyIdentityStore {
    async fn get_identity(&self, uid: &str) -> StoreResult<Option<IdentityRecord>> {
        self.inner.get_identity(uid).await
    }

    async fn set_custom_claims(&self, uid: &str, claims: CustomClaims) -> StoreResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::write_failed(uid, "quota exceeded"));
        }
        self.inner.set_custom_claims(uid, claims).await
    }
}

// =============================================================================
// Navigator
// =============================================================================

/// Records every navigation request.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    /// Returns the routes navigated to, oldest first.
    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        self.routes.lock().push(route.to_string());
    }
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Per-session cache of the signed-in member's claims.
//!
//! # State machine
//!
//! ```text
//! Unloaded ──identity──▶ Loading ──fetch ok──▶ Ready(claims | default)
//!     │                     │ ──fetch err──▶ Ready(default)
//!     └──────signed out─────┴──────────────▶ Ready(null)
//! ```
//!
//! Every identity change bumps a generation counter. A fetch commits its
//! result only if no newer change happened while it was in flight.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use ehub_core::{ClaimsResult, CustomClaims, PermissionSet, RefreshOutcome};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};
use crate::identity::{Identity, SessionState};
use crate::provider::{ClaimsRefresher, TokenProvider};

// =============================================================================
// ClaimsSnapshot
// =============================================================================

/// What the cache currently knows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimsSnapshot {
    /// The signed-in identity, `None` when signed out or not yet known.
    pub identity: Option<Identity>,
    /// Resolved claims, `None` before the first resolution and after
    /// sign-out.
    pub claims: Option<ClaimsResult>,
    /// `true` while a fetch for the current identity is pending.
    pub loading: bool,
}

impl ClaimsSnapshot {
    /// The state before the first identity event.
    pub fn unloaded() -> Self {
        Self {
            identity: None,
            claims: None,
            loading: true,
        }
    }

    fn signed_out() -> Self {
        Self {
            identity: None,
            claims: None,
            loading: false,
        }
    }

    /// Returns the effective claims.
    ///
    /// A fallback result resolves to the default claims.
    pub fn custom_claims(&self) -> Option<CustomClaims> {
        self.claims.map(|c| c.claims())
    }

    /// Returns the permissions of the effective claims.
    ///
    /// Everything is denied while loading or signed out.
    pub fn permissions(&self) -> PermissionSet {
        match self.custom_claims() {
            Some(claims) if !self.loading => claims.permissions(),
            _ => PermissionSet::none(),
        }
    }

    /// Returns `true` once the cache has settled on a signed-out state.
    pub fn is_signed_out(&self) -> bool {
        !self.loading && self.identity.is_none()
    }
}

impl Default for ClaimsSnapshot {
    fn default() -> Self {
        Self::unloaded()
    }
}

// =============================================================================
// ClaimsCache
// =============================================================================

/// Per-session claims cache.
///
/// Clones share the same state. Readers observe changes through
/// [`ClaimsCache::subscribe`].
#[derive(Clone)]
pub struct ClaimsCache {
    provider: Arc<dyn TokenProvider>,
    generation: Arc<AtomicU64>,
    state: Arc<watch::Sender<ClaimsSnapshot>>,
}

impl ClaimsCache {
    /// Creates an unloaded cache.
    pub fn new(provider: Arc<dyn TokenProvider>) -> Self {
        let (tx, _rx) = watch::channel(ClaimsSnapshot::unloaded());
        Self {
            provider,
            generation: Arc::new(AtomicU64::new(0)),
            state: Arc::new(tx),
        }
    }

    // =========================================================================
    // Readers
    // =========================================================================

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> ClaimsSnapshot {
        self.state.borrow().clone()
    }

    /// Subscribes to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<ClaimsSnapshot> {
        self.state.subscribe()
    }

    /// Returns the effective claims, `None` before the first resolution.
    pub fn claims(&self) -> Option<CustomClaims> {
        self.state.borrow().custom_claims()
    }

    /// Returns `true` while a fetch is pending.
    pub fn loading(&self) -> bool {
        self.state.borrow().loading
    }

    /// Returns the permissions of the cached claims.
    pub fn permissions(&self) -> PermissionSet {
        self.state.borrow().permissions()
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Handles an identity change and waits for the resulting fetch.
    ///
    /// A sign-out settles immediately without any network call.
    pub async fn on_identity_changed(&self, identity: Option<Identity>) {
        if let Some((generation, identity)) = self.begin(identity, false) {
            self.resolve(generation, identity).await;
        }
    }

    /// Calls `refreshUserToken`, then force-reloads the current identity's
    /// claims so a role change becomes visible.
    ///
    /// # Errors
    ///
    /// Returns the callable's error, or [`ClientError::NotSignedIn`] when
    /// nobody is signed in. The cached claims are left untouched in both
    /// cases.
    pub async fn refresh_claims(
        &self,
        refresher: &dyn ClaimsRefresher,
    ) -> ClientResult<RefreshOutcome> {
        let identity = self
            .state
            .borrow()
            .identity
            .clone()
            .ok_or(ClientError::NotSignedIn)?;

        let outcome = refresher
            .refresh_user_token()
            .await
            .inspect_err(|e| warn!(uid = %identity.uid, error = %e, "refreshUserToken failed"))?;

        if let Some((generation, identity)) = self.begin(Some(identity), true) {
            self.resolve(generation, identity).await;
        }
        Ok(outcome)
    }

    /// Follows an identity feed until it closes.
    ///
    /// The cache stays unloaded while the session is
    /// [`Resolving`](SessionState::Resolving). Each change starts its own
    /// fetch so a slow fetch never delays a newer identity.
    pub fn spawn_listener(&self, mut sessions: watch::Receiver<SessionState>) -> JoinHandle<()> {
        let cache = self.clone();
        tokio::spawn(async move {
            loop {
                let identity = match &*sessions.borrow_and_update() {
                    SessionState::Resolving => None,
                    SessionState::SignedOut => Some(None),
                    SessionState::SignedIn(identity) => Some(Some(identity.clone())),
                };
                if let Some((generation, identity)) = identity.and_then(|i| cache.begin(i, false)) {
                    let worker = cache.clone();
                    tokio::spawn(async move { worker.resolve(generation, identity).await });
                }
                if sessions.changed().await.is_err() {
                    debug!("Identity feed closed, claims listener stopping");
                    break;
                }
            }
        })
    }

    /// Records an identity change synchronously.
    ///
    /// Returns the generation and identity to fetch for, or `None` when the
    /// change settled without a fetch. A reload (`reload = true`) keeps the
    /// cached claims while loading and is skipped if the identity changed
    /// in the meantime.
    fn begin(&self, identity: Option<Identity>, reload: bool) -> Option<(u64, Identity)> {
        let Some(identity) = identity else {
            self.state.send_modify(|snapshot| {
                self.generation.fetch_add(1, Ordering::SeqCst);
                *snapshot = ClaimsSnapshot::signed_out();
            });
            return None;
        };

        let mut started = None;
        self.state.send_if_modified(|snapshot| {
            if reload && snapshot.identity.as_ref() != Some(&identity) {
                return false;
            }
            started = Some(self.generation.fetch_add(1, Ordering::SeqCst) + 1);
            if !reload {
                snapshot.claims = None;
            }
            snapshot.identity = Some(identity.clone());
            snapshot.loading = true;
            true
        });
        started.map(|generation| (generation, identity))
    }

    /// Fetches claims with a forced token refresh and commits them if still
    /// current.
    async fn resolve(&self, generation: u64, identity: Identity) {
        let result = match self.provider.fetch_claims(&identity, true).await {
            Ok(payload) => ClaimsResult::from_untyped(&payload),
            Err(e) => {
                warn!(uid = %identity.uid, error = %e, "Error fetching user claims, using defaults");
                ClaimsResult::Fallback
            }
        };

        let committed = self.state.send_if_modified(|snapshot| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            snapshot.claims = Some(result);
            snapshot.loading = false;
            true
        });

        if committed {
            debug!(uid = %identity.uid, role = %result.claims().role, fallback = result.is_fallback(), "Claims resolved");
        } else {
            debug!(uid = %identity.uid, generation, "Discarded superseded claims fetch");
        }
    }
}

impl std::fmt::Debug for ClaimsCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimsCache")
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .field("snapshot", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ehub_core::Role;
    use parking_lot::Mutex;
    use serde_json::json;
    use std::collections::HashMap;
    use tokio::sync::Notify;

    /// Serves fixed payloads per uid. Unknown uids fail.
    #[derive(Default)]
    struct StaticProvider {
        payloads: Mutex<HashMap<String, serde_json::Value>>,
        forced: Mutex<Vec<bool>>,
    }

    impl StaticProvider {
        fn with(uid: &str, payload: serde_json::Value) -> Arc<Self> {
            let provider = Self::default();
            provider.payloads.lock().insert(uid.to_string(), payload);
            Arc::new(provider)
        }
    }

    #[async_trait]
    impl TokenProvider for StaticProvider {
        async fn fetch_claims(
            &self,
            identity: &Identity,
            force_refresh: bool,
        ) -> ClientResult<serde_json::Value> {
            self.forced.lock().push(force_refresh);
            self.payloads
                .lock()
                .get(&identity.uid)
                .cloned()
                .ok_or_else(|| ClientError::callable(500, "internal", "boom"))
        }
    }

    /// Blocks the fetch for one uid until released.
    struct GatedProvider {
        gate: Notify,
        slow_uid: String,
    }

    #[async_trait]
    impl TokenProvider for GatedProvider {
        async fn fetch_claims(
            &self,
            identity: &Identity,
            _force_refresh: bool,
        ) -> ClientResult<serde_json::Value> {
            if identity.uid == self.slow_uid {
                self.gate.notified().await;
                return Ok(json!({ "role": "admin" }));
            }
            Ok(json!({ "role": "technician" }))
        }
    }

    struct StaticRefresher;

    #[async_trait]
    impl ClaimsRefresher for StaticRefresher {
        async fn refresh_user_token(&self) -> ClientResult<RefreshOutcome> {
            Ok(RefreshOutcome {
                success: true,
                claims: CustomClaims::for_role(Role::Engineer),
                message: ehub_core::REFRESH_MESSAGE.to_string(),
            })
        }
    }

    #[test]
    fn test_initial_state_is_loading_without_claims() {
        let cache = ClaimsCache::new(StaticProvider::with("u-1", json!({})));
        assert!(cache.loading());
        assert!(cache.claims().is_none());
        assert!(cache.permissions().is_empty());
    }

    #[tokio::test]
    async fn test_identity_resolves_claims_with_forced_refresh() {
        let provider = StaticProvider::with("u-1", json!({ "role": "engineer", "admin": false }));
        let cache = ClaimsCache::new(provider.clone());

        cache.on_identity_changed(Some(Identity::new("u-1"))).await;

        assert!(!cache.loading());
        assert_eq!(cache.claims(), Some(CustomClaims::for_role(Role::Engineer)));
        assert!(cache.permissions().can_create_blog_posts);
        assert_eq!(*provider.forced.lock(), vec![true]);
    }

    #[tokio::test]
    async fn test_payload_without_role_falls_back_to_default() {
        let cache = ClaimsCache::new(StaticProvider::with("u-1", json!({ "sub": "u-1" })));

        cache.on_identity_changed(Some(Identity::new("u-1"))).await;

        let snapshot = cache.snapshot();
        assert!(!snapshot.loading);
        assert_eq!(snapshot.claims, Some(ClaimsResult::Fallback));
        assert_eq!(cache.claims(), Some(ehub_core::default_claims()));
    }

    #[tokio::test]
    async fn test_fetch_failure_falls_back_to_default() {
        let cache = ClaimsCache::new(StaticProvider::with("someone-else", json!({})));

        cache.on_identity_changed(Some(Identity::new("u-1"))).await;

        assert!(!cache.loading());
        assert_eq!(cache.claims().map(|c| c.role), Some(Role::User));
    }

    #[tokio::test]
    async fn test_sign_out_settles_without_fetch() {
        let provider = StaticProvider::with("u-1", json!({ "role": "admin" }));
        let cache = ClaimsCache::new(provider.clone());
        cache.on_identity_changed(Some(Identity::new("u-1"))).await;

        cache.on_identity_changed(None).await;

        let snapshot = cache.snapshot();
        assert!(snapshot.is_signed_out());
        assert!(snapshot.claims.is_none());
        assert_eq!(provider.forced.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_superseded_fetch_is_discarded() {
        let provider = Arc::new(GatedProvider {
            gate: Notify::new(),
            slow_uid: "u-slow".to_string(),
        });
        let cache = ClaimsCache::new(provider.clone());

        let slow = {
            let cache = cache.clone();
            tokio::spawn(async move {
                cache.on_identity_changed(Some(Identity::new("u-slow"))).await;
            })
        };
        tokio::task::yield_now().await;

        cache.on_identity_changed(Some(Identity::new("u-fast"))).await;
        assert_eq!(cache.claims().map(|c| c.role), Some(Role::Technician));

        provider.gate.notify_one();
        slow.await.unwrap();

        let snapshot = cache.snapshot();
        assert_eq!(snapshot.identity.map(|i| i.uid), Some("u-fast".to_string()));
        assert_eq!(snapshot.claims.map(|c| c.claims().role), Some(Role::Technician));
    }

    #[tokio::test]
    async fn test_refresh_claims_reloads_current_identity() {
        let provider = StaticProvider::with("u-1", json!({}));
        let cache = ClaimsCache::new(provider.clone());
        cache.on_identity_changed(Some(Identity::new("u-1"))).await;
        assert_eq!(cache.claims().map(|c| c.role), Some(Role::User));

        provider
            .payloads
            .lock()
            .insert("u-1".to_string(), json!({ "role": "engineer", "admin": false }));
        let outcome = cache.refresh_claims(&StaticRefresher).await.unwrap();

        assert!(outcome.success);
        assert_eq!(cache.claims().map(|c| c.role), Some(Role::Engineer));
    }

    #[tokio::test]
    async fn test_refresh_claims_requires_identity() {
        let cache = ClaimsCache::new(StaticProvider::with("u-1", json!({})));
        let err = cache.refresh_claims(&StaticRefresher).await.unwrap_err();
        assert!(matches!(err, ClientError::NotSignedIn));
    }

    #[tokio::test]
    async fn test_listener_follows_feed() {
        let feed = crate::identity::IdentityFeed::new();
        let cache = ClaimsCache::new(StaticProvider::with("u-1", json!({ "role": "vendor" })));
        let mut rx = cache.subscribe();
        let listener = cache.spawn_listener(feed.subscribe());

        feed.sign_in(Identity::new("u-1"));
        rx.wait_for(|s| !s.loading && s.claims.is_some()).await.unwrap();
        assert_eq!(cache.claims().map(|c| c.role), Some(Role::Vendor));

        feed.sign_out();
        rx.wait_for(|s| s.is_signed_out()).await.unwrap();

        drop(feed);
        listener.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_listener_waits_for_session_restore() {
        let feed = crate::identity::IdentityFeed::new();
        let cache = ClaimsCache::new(StaticProvider::with("u-1", json!({ "role": "engineer" })));
        let mut rx = cache.subscribe();
        let listener = cache.spawn_listener(feed.subscribe());

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(cache.snapshot(), ClaimsSnapshot::unloaded());
        assert!(!cache.snapshot().is_signed_out());

        feed.sign_in(Identity::new("u-1"));
        rx.wait_for(|s| !s.loading && s.claims.is_some()).await.unwrap();
        assert_eq!(cache.claims().map(|c| c.role), Some(Role::Engineer));

        listener.abort();
    }

    #[tokio::test]
    async fn test_listener_settles_when_no_session_is_restored() {
        let feed = crate::identity::IdentityFeed::new();
        let cache = ClaimsCache::new(StaticProvider::with("u-1", json!({})));
        let mut rx = cache.subscribe();
        let listener = cache.spawn_listener(feed.subscribe());

        feed.sign_out();
        rx.wait_for(|s| s.is_signed_out()).await.unwrap();

        listener.abort();
    }
}

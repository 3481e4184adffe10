// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Client Integration Tests
//!
//! Runs the API on an ephemeral port and drives it through [`HubClient`],
//! the claims cache and the route guards.
//!
//! - `test_cache_*`: claims resolution over HTTP
//! - `test_refresh_*`: role changes becoming visible after a refresh
//! - `test_guard_*`: guards bound to a live cache

use std::sync::Arc;
use std::time::Duration;

use ehub_client::{
    AccessGuard, AdminGuard, ClaimsCache, ClaimsSnapshot, ClientError, GuardBinding,
    GuardDecision, HubClient, Identity, IdentityFeed, ProtectedGuard, decode_payload,
};
use ehub_core::{ClaimsResult, CustomClaims, Role};
use ehub_tests::prelude::*;
use tokio::sync::watch;
use tokio::time::timeout;

// =============================================================================
// Helpers
// =============================================================================

const WAIT: Duration = Duration::from_secs(5);

struct Session {
    client: Arc<HubClient>,
    cache: ClaimsCache,
}

fn session(server: &TestServer, hub: &TestHub, uid: &str) -> Session {
    let client = Arc::new(server.client(hub.token(uid, None)));
    let cache = ClaimsCache::new(client.clone());
    Session { client, cache }
}

fn identity(uid: &str) -> Identity {
    Identity::new(uid).with_email(UserFixtures::email(uid))
}

async fn settled(
    rx: &mut watch::Receiver<ClaimsSnapshot>,
    done: impl FnMut(&ClaimsSnapshot) -> bool,
) -> ClaimsSnapshot {
    timeout(WAIT, rx.wait_for(done))
        .await
        .expect("cache did not settle in time")
        .expect("cache dropped")
        .clone()
}

async fn decided(
    rx: &mut watch::Receiver<GuardDecision>,
    done: impl FnMut(&GuardDecision) -> bool,
) -> GuardDecision {
    timeout(WAIT, rx.wait_for(done))
        .await
        .expect("guard did not decide in time")
        .expect("guard dropped")
        .clone()
}

// =============================================================================
// Cache
// =============================================================================

#[tokio::test]
async fn test_cache_starts_loading() {
    init_test_logging();
    let hub = TestHub::new();
    let server = hub.spawn().await;
    let s = session(&server, &hub, UserFixtures::ADA);

    assert!(s.cache.loading());
    assert_eq!(s.cache.claims(), None);
    assert!(s.cache.permissions().is_empty());

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_cache_without_claims_falls_back() {
    let hub = TestHub::new();
    let server = hub.spawn().await;
    let s = session(&server, &hub, UserFixtures::ADA);

    s.cache.on_identity_changed(Some(identity(UserFixtures::ADA))).await;

    let snapshot = s.cache.snapshot();
    assert!(!snapshot.loading);
    assert_eq!(snapshot.claims, Some(ClaimsResult::Fallback));
    assert_eq!(s.cache.claims().map(|c| c.role), Some(Role::User));
    assert!(!s.cache.permissions().can_create_blog_posts);
}

#[tokio::test]
async fn test_cache_reads_claims_after_sync() {
    let hub = TestHub::new();
    hub.state()
        .propagator()
        .sync_user(None, UserFixtures::MO)
        .await
        .unwrap();

    let server = hub.spawn().await;
    let s = session(&server, &hub, UserFixtures::MO);
    s.cache.on_identity_changed(Some(identity(UserFixtures::MO))).await;

    assert_eq!(
        s.cache.snapshot().claims,
        Some(ClaimsResult::Valid(CustomClaims::for_role(Role::Moderator)))
    );
    assert!(s.cache.permissions().is_moderator);
}

#[tokio::test]
async fn test_cache_sign_out_clears_claims() {
    let hub = TestHub::new();
    let server = hub.spawn().await;
    let s = session(&server, &hub, UserFixtures::PAT);

    s.cache.on_identity_changed(Some(identity(UserFixtures::PAT))).await;
    s.cache.on_identity_changed(None).await;

    let snapshot = s.cache.snapshot();
    assert!(snapshot.is_signed_out());
    assert_eq!(snapshot.claims, None);
}

#[tokio::test]
async fn test_cache_unknown_identity_falls_back() {
    let hub = TestHub::new();
    let server = hub.spawn().await;
    // Signed, but the identity store has no such member to mint for.
    let s = session(&server, &hub, "u-stranger");

    s.cache.on_identity_changed(Some(Identity::new("u-stranger"))).await;
    assert_eq!(s.cache.snapshot().claims, Some(ClaimsResult::Fallback));
}

// =============================================================================
// Refresh
// =============================================================================

#[tokio::test]
async fn test_refresh_makes_role_visible() {
    let hub = TestHub::new();
    let server = hub.spawn().await;
    let s = session(&server, &hub, UserFixtures::ADA);
    s.cache.on_identity_changed(Some(identity(UserFixtures::ADA))).await;

    let outcome = s.cache.refresh_claims(s.client.as_ref()).await.unwrap();
    assert!(outcome.success);
    assert_eq!(outcome.claims.role, Role::Engineer);

    let permissions = s.cache.permissions();
    assert!(permissions.can_create_blog_posts);
    assert!(permissions.can_publish_resources);
    assert!(!permissions.can_delete_users);

    // The client now holds a token that carries the role.
    let token = s.client.id_token().unwrap();
    assert_eq!(decode_payload(&token).unwrap()["role"], "engineer");
}

#[tokio::test]
async fn test_refresh_follows_role_change() {
    let hub = TestHub::new();
    let server = hub.spawn().await;
    let s = session(&server, &hub, UserFixtures::TOM);
    s.cache.on_identity_changed(Some(identity(UserFixtures::TOM))).await;

    s.cache.refresh_claims(s.client.as_ref()).await.unwrap();
    assert_eq!(s.cache.claims().map(|c| c.role), Some(Role::Technician));
    assert!(!s.cache.permissions().can_create_blog_posts);

    hub.users.set_role(UserFixtures::TOM, Role::Company);

    // Stale until the next refresh.
    s.cache.on_identity_changed(Some(identity(UserFixtures::TOM))).await;
    assert_eq!(s.cache.claims().map(|c| c.role), Some(Role::Technician));

    s.cache.refresh_claims(s.client.as_ref()).await.unwrap();
    assert_eq!(s.cache.claims().map(|c| c.role), Some(Role::Company));
    assert!(s.cache.permissions().can_create_blog_posts);
}

#[tokio::test]
async fn test_refresh_requires_sign_in() {
    let hub = TestHub::new();
    let server = hub.spawn().await;
    let s = session(&server, &hub, UserFixtures::ADA);

    let err = s.cache.refresh_claims(s.client.as_ref()).await.unwrap_err();
    assert!(matches!(err, ClientError::NotSignedIn));
}

#[tokio::test]
async fn test_refresh_failure_keeps_cached_claims() {
    let hub = TestHub::new();
    let server = hub.spawn().await;
    let s = session(&server, &hub, "u-stranger");
    s.cache.on_identity_changed(Some(Identity::new("u-stranger"))).await;
    let before = s.cache.snapshot();

    let err = s.cache.refresh_claims(s.client.as_ref()).await.unwrap_err();
    assert_eq!(err.kind(), Some("internal"));
    assert_eq!(s.cache.snapshot(), before);
}

#[tokio::test]
async fn test_refresh_with_invalid_session_is_unauthenticated() {
    let hub = TestHub::new();
    let server = hub.spawn().await;
    let client = server.client("garbage");

    let err = client.mint_token().await.unwrap_err();
    assert!(err.is_unauthenticated());
}

// =============================================================================
// Guards
// =============================================================================

#[tokio::test]
async fn test_guard_protected_follows_identity_feed() {
    let hub = TestHub::new();
    let server = hub.spawn().await;
    let s = session(&server, &hub, UserFixtures::ADA);
    let feed = IdentityFeed::new();
    let navigator = Arc::new(RecordingNavigator::default());

    // Bound before the listener runs: the cache is still loading.
    let binding = GuardBinding::spawn(
        s.cache.subscribe(),
        Arc::new(ProtectedGuard::new("/login")),
        navigator.clone(),
    );
    assert_eq!(binding.decision(), GuardDecision::Placeholder);

    let listener = s.cache.spawn_listener(feed.subscribe());
    let mut decisions = binding.subscribe();

    // The session is still being restored: no redirect yet.
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(binding.decision(), GuardDecision::Placeholder);
    assert!(navigator.routes().is_empty());

    feed.sign_in(identity(UserFixtures::ADA));
    decided(&mut decisions, |d| *d == GuardDecision::Render).await;

    feed.sign_out();
    decided(&mut decisions, |d| d.redirect_target().is_some()).await;

    assert_eq!(navigator.routes(), vec!["/login".to_string()]);
    listener.abort();
}

#[tokio::test]
async fn test_guard_admin_uses_allow_list() {
    let hub = TestHub::new();
    let server = hub.spawn().await;
    let config = ConfigFixtures::hub_config().access;
    let guard = AdminGuard::from_config(&config);

    let ops = session(&server, &hub, UserFixtures::OPS);
    let mut snapshots = ops.cache.subscribe();
    ops.cache.on_identity_changed(Some(identity(UserFixtures::OPS))).await;
    let snapshot = settled(&mut snapshots, |s| !s.loading).await;
    // Allowed by email even though the token carries no admin role.
    assert_eq!(snapshot.claims, Some(ClaimsResult::Fallback));
    assert_eq!(
        guard.evaluate(&snapshot),
        GuardDecision::Render
    );

    let ada = session(&server, &hub, UserFixtures::ADA);
    ada.cache.on_identity_changed(Some(identity(UserFixtures::ADA))).await;
    assert_eq!(
        guard.evaluate(&ada.cache.snapshot()),
        GuardDecision::Redirect("/dashboard".to_string())
    );
}

#[tokio::test]
async fn test_guard_admin_ignores_admin_role() {
    let hub = TestHub::new();
    hub.state()
        .propagator()
        .sync_user(None, UserFixtures::OPS)
        .await
        .unwrap();
    let server = hub.spawn().await;

    let mut config = ConfigFixtures::hub_config().access;
    config.admin_emails.clear();
    let guard = AdminGuard::from_config(&config);

    let s = session(&server, &hub, UserFixtures::OPS);
    s.cache.on_identity_changed(Some(identity(UserFixtures::OPS))).await;
    let snapshot = s.cache.snapshot();
    assert_eq!(snapshot.custom_claims().map(|c| c.admin), Some(true));
    assert_eq!(
        guard.evaluate(&snapshot),
        GuardDecision::Redirect(config.default_route.clone())
    );
}

#[tokio::test]
async fn test_guard_admin_binding_waits_blank() {
    let hub = TestHub::new();
    let server = hub.spawn().await;
    let s = session(&server, &hub, UserFixtures::OPS);
    let navigator = Arc::new(RecordingNavigator::default());

    let binding = GuardBinding::spawn(
        s.cache.subscribe(),
        Arc::new(AdminGuard::from_config(&ConfigFixtures::hub_config().access)),
        navigator.clone(),
    );
    assert_eq!(binding.decision(), GuardDecision::Blank);

    s.cache.on_identity_changed(Some(identity(UserFixtures::OPS))).await;
    let mut decisions = binding.subscribe();
    decided(&mut decisions, |d| *d == GuardDecision::Render).await;
    assert!(navigator.routes().is_empty());
}

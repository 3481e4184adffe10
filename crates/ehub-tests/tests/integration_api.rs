// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # API Integration Tests
//!
//! Drives the full router with `tower::ServiceExt::oneshot`.
//!
//! - `test_public_*`: health and readiness
//! - `test_session_*`: `GET /api/v1/auth/me`
//! - `test_refresh_*`: the `refreshUserToken` callable
//! - `test_token_*`: ID token minting
//! - `test_sync_*`: the admin claims sync route
//! - `test_auth_*`: token rejection

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use ehub_api::auth::MintedToken;
use ehub_api::response::{HealthResponse, SessionResponse, SyncResponse};
use ehub_api::{ApiConfig, JwtManager};
use ehub_config::SecretValue;
use ehub_core::audit::AuditAction;
use ehub_core::{CustomClaims, RefreshOutcome, Role};
use ehub_tests::prelude::*;
use tower::ServiceExt;

// =============================================================================
// Helpers
// =============================================================================

fn get(uri: &str, auth: Option<String>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::empty()).unwrap()
}

fn post(uri: &str, auth: Option<String>) -> Request<Body> {
    let mut builder = Request::post(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::empty()).unwrap()
}

fn sync_uri(uid: &str) -> String {
    format!("/api/v1/admin/users/{}/claims/sync", uid)
}

const REFRESH_URI: &str = "/api/v1/functions/refreshUserToken";
const TOKEN_URI: &str = "/api/v1/auth/token";
const ME_URI: &str = "/api/v1/auth/me";

// =============================================================================
// Public endpoints
// =============================================================================

#[tokio::test]
async fn test_public_health() {
    init_test_logging();
    let hub = TestHub::new();

    let response = hub.router().oneshot(get("/health", None)).await.unwrap();
    let body: HealthResponse = expect_json(response, StatusCode::OK).await;
    assert_eq!(body.status, "healthy");
}

#[tokio::test]
async fn test_public_ready_reports_audit_sink() {
    let hub = TestHub::new();

    let response = hub.router().oneshot(get("/ready", None)).await.unwrap();
    let body: serde_json::Value = expect_json(response, StatusCode::OK).await;
    assert_eq!(body["ready"], true);
    assert_eq!(body["components"][0]["name"], "audit_logger:memory");
}

// =============================================================================
// Session
// =============================================================================

#[tokio::test]
async fn test_session_resolves_permissions() {
    let hub = TestHub::new();
    let auth = hub.bearer(UserFixtures::ADA, Some(Role::Engineer));

    let response = hub.router().oneshot(get(ME_URI, Some(auth))).await.unwrap();
    let session: SessionResponse = expect_json(response, StatusCode::OK).await;

    assert_eq!(session.uid, UserFixtures::ADA);
    assert_eq!(session.email.as_deref(), Some("ada@electricianhub.test"));
    assert!(!session.fallback);
    assert_eq!(session.claims, CustomClaims::for_role(Role::Engineer));
    assert!(session.permissions.can_create_blog_posts);
    assert!(session.permissions.can_give_training);
    assert!(!session.permissions.can_delete_users);
}

#[tokio::test]
async fn test_session_without_claims_falls_back() {
    let hub = TestHub::new();
    let auth = hub.bearer(UserFixtures::OPS, None);

    let response = hub.router().oneshot(get(ME_URI, Some(auth))).await.unwrap();
    let session: SessionResponse = expect_json(response, StatusCode::OK).await;

    // The persisted role is admin, but the token carries nothing yet.
    assert!(session.fallback);
    assert_eq!(session.claims.role, Role::User);
    assert!(session.permissions.is_empty());
}

#[tokio::test]
async fn test_session_body_is_camel_case() {
    let hub = TestHub::new();
    let auth = hub.bearer(UserFixtures::MO, Some(Role::Moderator));

    let response = hub.router().oneshot(get(ME_URI, Some(auth))).await.unwrap();
    let body: serde_json::Value = expect_json(response, StatusCode::OK).await;

    assert_eq!(body["claims"]["role"], "moderator");
    assert_eq!(body["permissions"]["isModerator"], true);
    assert_eq!(body["permissions"]["canDeleteOthersCommunityPosts"], true);
    assert_eq!(body["permissions"]["canAssignRoles"], false);
}

// =============================================================================
// Refresh callable
// =============================================================================

#[tokio::test]
async fn test_refresh_requires_token() {
    let hub = TestHub::new();

    let response = hub.router().oneshot(post(REFRESH_URI, None)).await.unwrap();
    assert_error(
        response,
        StatusCode::UNAUTHORIZED,
        "unauthenticated",
        "User must be authenticated",
    )
    .await;
    assert!(hub.audit.is_empty());
}

#[tokio::test]
async fn test_refresh_writes_caller_claims() {
    let hub = TestHub::new();
    let auth = hub.bearer(UserFixtures::CORA, None);

    let response = hub.router().oneshot(post(REFRESH_URI, Some(auth))).await.unwrap();
    let outcome: RefreshOutcome = expect_json(response, StatusCode::OK).await;

    assert!(outcome.success);
    assert_eq!(outcome.claims, CustomClaims::for_role(Role::Company));
    assert_eq!(
        hub.identities.claims_of(UserFixtures::CORA),
        Some(CustomClaims::for_role(Role::Company))
    );
    assert_eq!(hub.audit.entries_for_action(AuditAction::ClaimsRefresh).len(), 1);
}

#[tokio::test]
async fn test_refresh_unknown_member_is_internal() {
    let hub = TestHub::new();
    let auth = hub.bearer("u-stranger", None);

    let response = hub.router().oneshot(post(REFRESH_URI, Some(auth))).await.unwrap();
    assert_error(
        response,
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal",
        "Failed to refresh user token",
    )
    .await;
}

#[tokio::test]
async fn test_refresh_then_mint_carries_claims() {
    let hub = TestHub::new();
    let router = hub.router();
    let auth = hub.bearer(UserFixtures::TOM, None);

    // Before any refresh the minted token has no role.
    let response = router
        .clone()
        .oneshot(post(TOKEN_URI, Some(auth.clone())))
        .await
        .unwrap();
    let before: MintedToken = expect_json(response, StatusCode::OK).await;
    assert_eq!(before.claims, None);

    let response = router
        .clone()
        .oneshot(post(REFRESH_URI, Some(auth.clone())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router.oneshot(post(TOKEN_URI, Some(auth))).await.unwrap();
    let after: MintedToken = expect_json(response, StatusCode::OK).await;
    assert_eq!(after.claims, Some(CustomClaims::for_role(Role::Technician)));
    assert_eq!(after.token_type, "Bearer");

    let decoded = hub.state().jwt().validate_token(&after.id_token).unwrap();
    assert_eq!(decoded.claims.uid(), UserFixtures::TOM);
    assert_eq!(
        decoded.claims.claims_result().claims().role,
        Role::Technician
    );
}

// =============================================================================
// Token minting
// =============================================================================

#[tokio::test]
async fn test_token_mint_is_audited() {
    let hub = TestHub::new();
    let auth = hub.bearer(UserFixtures::PAT, None);

    let response = hub.router().oneshot(post(TOKEN_URI, Some(auth))).await.unwrap();
    let minted: MintedToken = expect_json(response, StatusCode::OK).await;
    assert!(minted.expires_in > 0);

    let issued = hub.audit.entries_for_action(AuditAction::TokenIssued);
    assert_eq!(issued.len(), 1);
    assert_eq!(issued[0].subject.as_deref(), Some(UserFixtures::PAT));
}

#[tokio::test]
async fn test_token_unknown_identity_is_not_found() {
    let hub = TestHub::new();
    let auth = hub.bearer("u-stranger", None);

    let response = hub.router().oneshot(post(TOKEN_URI, Some(auth))).await.unwrap();
    assert_error(response, StatusCode::NOT_FOUND, "not-found", "Identity not found").await;
}

// =============================================================================
// Admin sync
// =============================================================================

#[tokio::test]
async fn test_sync_by_admin() {
    let hub = TestHub::new();
    hub.users.set_role(UserFixtures::PAT, Role::Engineer);
    let auth = hub.bearer(UserFixtures::OPS, Some(Role::Admin));

    let response = hub
        .router()
        .oneshot(post(&sync_uri(UserFixtures::PAT), Some(auth)))
        .await
        .unwrap();
    let body: SyncResponse = expect_json(response, StatusCode::OK).await;

    assert!(body.success);
    assert_eq!(body.uid, UserFixtures::PAT);
    assert_eq!(body.claims, CustomClaims::for_role(Role::Engineer));
    assert_eq!(hub.identities.claims_of(UserFixtures::PAT), Some(body.claims));

    let synced = hub.audit.entries_for_action(AuditAction::ClaimsSync);
    assert_eq!(synced.len(), 1);
    assert_eq!(synced[0].actor.as_deref(), Some(UserFixtures::OPS));
    assert_eq!(synced[0].subject.as_deref(), Some(UserFixtures::PAT));
}

#[tokio::test]
async fn test_sync_denied_for_engineer() {
    let hub = TestHub::new();
    let auth = hub.bearer(UserFixtures::ADA, Some(Role::Engineer));

    let response = hub
        .router()
        .oneshot(post(&sync_uri(UserFixtures::ADA), Some(auth)))
        .await
        .unwrap();
    assert_error(
        response,
        StatusCode::FORBIDDEN,
        "permission-denied",
        "Insufficient permissions",
    )
    .await;

    let denied = hub.audit.entries_for_action(AuditAction::AccessDenied);
    assert_eq!(denied.len(), 1);
    assert!(denied[0].result.is_denied());
    assert_eq!(denied[0].actor.as_deref(), Some(UserFixtures::ADA));
    assert_eq!(denied[0].details["missing"][0], "canAssignRoles");
    // Nothing was written.
    assert_eq!(hub.identities.claims_of(UserFixtures::ADA), None);
}

#[tokio::test]
async fn test_sync_denied_for_moderator() {
    let hub = TestHub::new();
    let auth = hub.bearer(UserFixtures::MO, Some(Role::Moderator));

    let response = hub
        .router()
        .oneshot(post(&sync_uri(UserFixtures::PAT), Some(auth)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_sync_requires_role_in_token() {
    let hub = TestHub::new();
    // Persisted as admin, but the token has not been refreshed.
    let auth = hub.bearer(UserFixtures::OPS, None);

    let response = hub
        .router()
        .oneshot(post(&sync_uri(UserFixtures::PAT), Some(auth)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_sync_unknown_member() {
    let hub = TestHub::new();
    let auth = hub.bearer(UserFixtures::OPS, Some(Role::Admin));

    let response = hub
        .router()
        .oneshot(post(&sync_uri("u-ghost"), Some(auth)))
        .await
        .unwrap();
    assert_error(response, StatusCode::NOT_FOUND, "not-found", "User record not found").await;
}

// =============================================================================
// Token rejection
// =============================================================================

#[tokio::test]
async fn test_auth_rejects_malformed_token() {
    let hub = TestHub::new();

    let response = hub
        .router()
        .oneshot(get(ME_URI, Some("Bearer not-a-token".to_string())))
        .await
        .unwrap();
    let body: ehub_api::ErrorResponseBody = expect_json(response, StatusCode::UNAUTHORIZED).await;
    assert_eq!(body.error.kind, "unauthenticated");
}

#[tokio::test]
async fn test_auth_rejects_foreign_signature() {
    let hub = TestHub::new();

    let mut other = ConfigFixtures::hub_config();
    other.security.jwt.secret = Some(SecretValue::new("another-secret-that-is-long-enough-0000"));
    let foreign = JwtManager::new(ApiConfig::from(&other).jwt).unwrap();
    let token = foreign
        .create_token(
            &foreign
                .claims_for(UserFixtures::OPS)
                .with_custom_claims(&CustomClaims::for_role(Role::Admin)),
        )
        .unwrap();

    let response = hub
        .router()
        .oneshot(post(
            &sync_uri(UserFixtures::PAT),
            Some(format!("Bearer {}", token)),
        ))
        .await
        .unwrap();
    assert_error(
        response,
        StatusCode::UNAUTHORIZED,
        "unauthenticated",
        "Invalid token signature",
    )
    .await;
}

#[tokio::test]
async fn test_auth_requires_bearer_scheme() {
    let hub = TestHub::new();
    let token = hub.token(UserFixtures::ADA, Some(Role::Engineer));

    let response = hub
        .router()
        .oneshot(get(ME_URI, Some(format!("Basic {}", token))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Seams between the claims cache and the identity provider.

use async_trait::async_trait;
use ehub_core::RefreshOutcome;

use crate::error::ClientResult;
use crate::identity::Identity;

/// Supplies the decoded claims of an identity's current ID token.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Returns the untyped claims payload of the identity's ID token.
    ///
    /// With `force_refresh` a new token is obtained first, so claims written
    /// since the last token was minted become visible.
    async fn fetch_claims(
        &self,
        identity: &Identity,
        force_refresh: bool,
    ) -> ClientResult<serde_json::Value>;
}

/// Invokes the `refreshUserToken` callable.
#[async_trait]
pub trait ClaimsRefresher: Send + Sync {
    /// Asks the server to re-issue the caller's claims.
    async fn refresh_user_token(&self) -> ClientResult<RefreshOutcome>;
}

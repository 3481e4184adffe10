// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! ID token minting.

use std::sync::Arc;

use ehub_core::audit::{self, AuditLog, AuditLogger, NoOpAuditLogger};
use ehub_core::{CustomClaims, IdentityStore};
use serde::{Deserialize, Serialize};

use super::JwtManager;
use crate::error::{ApiError, ApiResult};

/// A freshly minted ID token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintedToken {
    /// The signed token.
    pub id_token: String,
    /// Token type, always `Bearer`.
    pub token_type: String,
    /// Seconds until expiry.
    pub expires_in: i64,
    /// Custom claims embedded in the token, if the identity had any.
    pub claims: Option<CustomClaims>,
}

/// Mints ID tokens from identity records.
///
/// A token carries whatever custom claims are stored on the identity at
/// the time of minting. Tokens minted before a propagation keep their old
/// claims; the client sees a role change only after minting a new one.
#[derive(Clone)]
pub struct TokenService {
    jwt: Arc<JwtManager>,
    identities: Arc<dyn IdentityStore>,
    audit: Arc<dyn AuditLogger>,
}

impl TokenService {
    /// Creates a token service with auditing disabled.
    pub fn new(jwt: Arc<JwtManager>, identities: Arc<dyn IdentityStore>) -> Self {
        Self {
            jwt,
            identities,
            audit: Arc::new(NoOpAuditLogger::new()),
        }
    }

    /// Sets the audit logger.
    pub fn with_audit_logger(mut self, audit: Arc<dyn AuditLogger>) -> Self {
        self.audit = audit;
        self
    }

    /// Mints a new ID token for `uid`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::NotFound`] if the identity does not exist.
    /// - [`ApiError::Internal`] if the identity store or signing fails.
    pub async fn mint(&self, uid: &str) -> ApiResult<MintedToken> {
        let identity = self
            .identities
            .get_identity(uid)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to read identity '{}': {}", uid, e)))?
            .ok_or_else(|| ApiError::not_found("Identity"))?;

        let mut claims = self.jwt.claims_for(&identity.uid).with_email(&identity.email);
        if let Some(name) = &identity.display_name {
            claims = claims.with_name(name);
        }
        if let Some(custom) = &identity.custom_claims {
            claims = claims.with_custom_claims(custom);
        }

        let id_token = self.jwt.create_token(&claims)?;

        tracing::debug!(
            uid = %uid,
            role = identity.custom_claims.map(|c| c.role.as_str()).unwrap_or("none"),
            "Minted ID token"
        );
        audit::record(
            self.audit.as_ref(),
            AuditLog::token_issued(uid, identity.custom_claims.as_ref()),
        )
        .await;

        Ok(MintedToken {
            id_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.lifetime_secs(),
            claims: identity.custom_claims,
        })
    }

    /// Returns the JWT manager.
    pub fn jwt(&self) -> &Arc<JwtManager> {
        &self.jwt
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("jwt", &self.jwt)
            .field("audit", &self.audit.name())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ehub_config::{JwtConfig, SecretValue};
    use ehub_core::audit::{AuditAction, InMemoryAuditLogger};
    use ehub_core::store::InMemoryIdentityStore;
    use ehub_core::{IdentityRecord, Role};

    fn jwt() -> Arc<JwtManager> {
        let config = JwtConfig {
            secret: Some(SecretValue::new("token-service-secret-long-enough-000")),
            ..JwtConfig::default()
        };
        Arc::new(JwtManager::new(config).unwrap())
    }

    #[tokio::test]
    async fn test_mint_without_claims_carries_no_role() {
        let identities = InMemoryIdentityStore::new();
        identities.insert(IdentityRecord::new("u-1", "ada@hub.test"));
        let service = TokenService::new(jwt(), Arc::new(identities));

        let minted = service.mint("u-1").await.unwrap();
        assert!(minted.claims.is_none());

        let decoded = service.jwt().validate_token(&minted.id_token).unwrap();
        assert!(decoded.claims.claims_result().is_fallback());
        assert_eq!(decoded.claims.email.as_deref(), Some("ada@hub.test"));
    }

    #[tokio::test]
    async fn test_mint_embeds_stored_claims() {
        let identities = InMemoryIdentityStore::new();
        identities.insert(IdentityRecord::new("u-1", "ada@hub.test"));
        identities
            .set_custom_claims("u-1", CustomClaims::for_role(Role::Company))
            .await
            .unwrap();
        let audit = InMemoryAuditLogger::new();
        let service =
            TokenService::new(jwt(), Arc::new(identities)).with_audit_logger(Arc::new(audit.clone()));

        let minted = service.mint("u-1").await.unwrap();
        assert_eq!(minted.claims, Some(CustomClaims::for_role(Role::Company)));
        assert_eq!(minted.token_type, "Bearer");

        let decoded = service.jwt().validate_token(&minted.id_token).unwrap();
        assert_eq!(decoded.claims.claims_result().claims().role, Role::Company);
        assert_eq!(audit.entries_for_action(AuditAction::TokenIssued).len(), 1);
    }

    #[tokio::test]
    async fn test_mint_unknown_identity() {
        let service = TokenService::new(jwt(), Arc::new(InMemoryIdentityStore::new()));
        let err = service.mint("ghost").await.unwrap_err();
        assert_eq!(err.kind(), "not-found");
    }
}

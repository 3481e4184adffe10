// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! State shared by every handler and middleware.

use std::sync::Arc;

use ehub_core::audit::{AuditLogger, NoOpAuditLogger};
use ehub_core::{ClaimsIssuer, ClaimsPropagator, IdentityStore, UserStore};

use crate::auth::{JwtManager, TokenService};
use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};

/// Services wired over one pair of stores and one audit logger.
///
/// Cloning is cheap; handlers receive it through `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ApiConfig>,
    jwt: Arc<JwtManager>,
    propagator: Arc<ClaimsPropagator>,
    tokens: Arc<TokenService>,
    audit: Arc<dyn AuditLogger>,
}

impl AppState {
    /// Starts a builder.
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::default()
    }

    /// Server configuration.
    pub fn config(&self) -> &Arc<ApiConfig> {
        &self.config
    }

    /// ID token signer and verifier.
    pub fn jwt(&self) -> &Arc<JwtManager> {
        &self.jwt
    }

    /// Refresh and sync of stored claims.
    pub fn propagator(&self) -> &ClaimsPropagator {
        &self.propagator
    }

    /// ID token minting.
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Audit logger shared by the propagator, the token service and the
    /// RBAC layer.
    pub fn audit(&self) -> &Arc<dyn AuditLogger> {
        &self.audit
    }
}

/// Builder for [`AppState`]. Both stores are required.
#[derive(Default)]
pub struct AppStateBuilder {
    config: Option<ApiConfig>,
    users: Option<Arc<dyn UserStore>>,
    identities: Option<Arc<dyn IdentityStore>>,
    audit: Option<Arc<dyn AuditLogger>>,
}

impl AppStateBuilder {
    /// Sets the configuration; defaults to [`ApiConfig::default`].
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the member record store.
    pub fn user_store(mut self, users: Arc<dyn UserStore>) -> Self {
        self.users = Some(users);
        self
    }

    /// Sets the identity store.
    pub fn identity_store(mut self, identities: Arc<dyn IdentityStore>) -> Self {
        self.identities = Some(identities);
        self
    }

    /// Sets the audit logger; defaults to a no-op logger.
    pub fn audit_logger(mut self, logger: Arc<dyn AuditLogger>) -> Self {
        self.audit = Some(logger);
        self
    }

    /// Wires the services.
    ///
    /// # Errors
    ///
    /// Fails if a store is missing or the JWT settings are unusable.
    pub fn build(self) -> ApiResult<AppState> {
        let config = self.config.unwrap_or_default();
        let users = self
            .users
            .ok_or_else(|| ApiError::internal("User store is not configured"))?;
        let identities = self
            .identities
            .ok_or_else(|| ApiError::internal("Identity store is not configured"))?;
        let audit = self
            .audit
            .unwrap_or_else(|| Arc::new(NoOpAuditLogger::new()));
        let jwt = Arc::new(JwtManager::new(config.jwt.clone())?);

        let propagator = ClaimsPropagator::new(ClaimsIssuer::new(users), identities.clone())
            .with_audit_logger(audit.clone());
        let tokens = TokenService::new(jwt.clone(), identities).with_audit_logger(audit.clone());

        Ok(AppState {
            config: Arc::new(config),
            jwt,
            propagator: Arc::new(propagator),
            tokens: Arc::new(tokens),
            audit,
        })
    }
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Claims propagation onto identity records.
//!
//! The propagator is the only writer of custom claims. It runs the issuer
//! for a uid and stores the result on the identity so the next ID token
//! minted for that identity carries it. Tokens that were already issued keep
//! their old claims until the client obtains a new one.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::audit::{self, ActionResult, AuditLog, AuditLogger, NoOpAuditLogger};
use crate::claims::CustomClaims;
use crate::error::{IssuerError, PropagationError};
use crate::issuer::ClaimsIssuer;
use crate::store::IdentityStore;

/// Message returned to a caller after a successful self-refresh.
pub const REFRESH_MESSAGE: &str =
    "Claims updated. Refresh your ID token to apply the new permissions.";

// =============================================================================
// Types
// =============================================================================

/// The verified identity of a remote caller.
///
/// Built only from a validated session, never from request input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    /// Identity ID.
    pub uid: String,
    /// Sign-in email, when the session carries one.
    pub email: Option<String>,
}

impl CallerIdentity {
    /// Creates a caller identity.
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: None,
        }
    }

    /// Sets the email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Response of the `refreshUserToken` callable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshOutcome {
    /// Always `true`; failures are reported as errors.
    pub success: bool,
    /// The claims written onto the identity.
    pub claims: CustomClaims,
    /// Instructs the client to obtain a new ID token.
    pub message: String,
}

impl RefreshOutcome {
    fn new(claims: CustomClaims) -> Self {
        Self {
            success: true,
            claims,
            message: REFRESH_MESSAGE.to_string(),
        }
    }
}

// =============================================================================
// Claims Propagator
// =============================================================================

/// Writes issued claims onto identity records.
#[derive(Clone)]
pub struct ClaimsPropagator {
    issuer: ClaimsIssuer,
    identities: Arc<dyn IdentityStore>,
    audit: Arc<dyn AuditLogger>,
}

impl ClaimsPropagator {
    /// Creates a propagator with auditing disabled.
    pub fn new(issuer: ClaimsIssuer, identities: Arc<dyn IdentityStore>) -> Self {
        Self {
            issuer,
            identities,
            audit: Arc::new(NoOpAuditLogger::new()),
        }
    }

    /// Sets the audit logger.
    pub fn with_audit_logger(mut self, audit: Arc<dyn AuditLogger>) -> Self {
        self.audit = audit;
        self
    }

    /// Returns the issuer.
    pub fn issuer(&self) -> &ClaimsIssuer {
        &self.issuer
    }

    /// Refreshes the claims of the calling member.
    ///
    /// The target uid is always the caller's own. An absent caller is
    /// refused before anything is read or written.
    ///
    /// # Errors
    ///
    /// - [`PropagationError::Unauthenticated`] when `caller` is `None`.
    /// - [`PropagationError::Internal`] for every other failure. The cause
    ///   is logged here and not returned.
    pub async fn refresh_caller(
        &self,
        caller: Option<&CallerIdentity>,
    ) -> Result<RefreshOutcome, PropagationError> {
        let Some(caller) = caller else {
            warn!("Rejected claims refresh without an authenticated caller");
            return Err(PropagationError::Unauthenticated);
        };
        let uid = caller.uid.as_str();

        match self.propagate(uid).await {
            Ok(claims) => {
                info!(uid = %uid, role = %claims.role, "Refreshed caller claims");
                audit::record(
                    self.audit.as_ref(),
                    AuditLog::claims_refresh(uid, ActionResult::Success, Some(&claims)),
                )
                .await;
                Ok(RefreshOutcome::new(claims))
            }
            Err(cause) => {
                error!(uid = %uid, error = %cause, "Error refreshing user token");
                audit::record(
                    self.audit.as_ref(),
                    AuditLog::claims_refresh(uid, ActionResult::failure(cause.to_string()), None),
                )
                .await;
                Err(PropagationError::Internal)
            }
        }
    }

    /// Issues and writes claims for any member.
    ///
    /// This is the trusted path used after a role assignment. `actor` is
    /// recorded in the audit trail only.
    ///
    /// # Errors
    ///
    /// - [`PropagationError::NotFound`] if there is no user record.
    /// - [`PropagationError::Internal`] for every other failure.
    pub async fn sync_user(
        &self,
        actor: Option<&str>,
        uid: &str,
    ) -> Result<CustomClaims, PropagationError> {
        match self.propagate(uid).await {
            Ok(claims) => {
                info!(uid = %uid, actor = actor.unwrap_or("system"), role = %claims.role, "Synced claims");
                audit::record(
                    self.audit.as_ref(),
                    AuditLog::claims_sync(actor, uid, ActionResult::Success, Some(&claims)),
                )
                .await;
                Ok(claims)
            }
            Err(cause) => {
                error!(uid = %uid, error = %cause, "Error syncing claims");
                audit::record(
                    self.audit.as_ref(),
                    AuditLog::claims_sync(actor, uid, ActionResult::failure(cause.to_string()), None),
                )
                .await;
                Err(match cause {
                    PropagateFailure::Issue(e) if e.is_not_found() => PropagationError::NotFound,
                    _ => PropagationError::Internal,
                })
            }
        }
    }

    async fn propagate(&self, uid: &str) -> Result<CustomClaims, PropagateFailure> {
        let claims = self.issuer.issue(uid).await.map_err(PropagateFailure::Issue)?;
        self.identities
            .set_custom_claims(uid, claims)
            .await
            .map_err(PropagateFailure::Write)?;
        Ok(claims)
    }
}

impl std::fmt::Debug for ClaimsPropagator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimsPropagator")
            .field("issuer", &self.issuer)
            .field("audit", &self.audit.name())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, thiserror::Error)]
enum PropagateFailure {
    #[error(transparent)]
    Issue(IssuerError),
    #[error("claims write failed: {0}")]
    Write(crate::error::StoreError),
}

// =============================================================================
// Tests
// =============================================================================

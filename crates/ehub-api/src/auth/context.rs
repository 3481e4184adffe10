// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication context.

use ehub_core::{CallerIdentity, Capability, ClaimsResult, CustomClaims, PermissionSet};
use uuid::Uuid;

use super::IdTokenClaims;

/// Authentication context for a request.
///
/// Attached to request extensions by the auth middleware. Permissions are
/// resolved from the token's role claims when the context is built.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Identity uid.
    pub uid: String,
    /// Sign-in email from the token.
    pub email: Option<String>,
    /// Validated role claims from the token.
    pub claims: ClaimsResult,
    /// Resolved permissions.
    pub permissions: PermissionSet,
    /// Request ID for tracing.
    pub request_id: Uuid,
}

impl AuthContext {
    /// Creates a context from verified token claims.
    pub fn from_claims(token: &IdTokenClaims) -> Self {
        let claims = token.claims_result();
        Self {
            uid: token.sub.clone(),
            email: token.email.clone(),
            claims,
            permissions: claims.claims().permissions(),
            request_id: Uuid::now_v7(),
        }
    }

    /// Creates an anonymous context (for public paths).
    pub fn anonymous() -> Self {
        Self {
            uid: "anonymous".to_string(),
            email: None,
            claims: ClaimsResult::Fallback,
            permissions: PermissionSet::none(),
            request_id: Uuid::now_v7(),
        }
    }

    /// Sets the request ID.
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }

    /// Returns the effective role claims.
    pub fn custom_claims(&self) -> CustomClaims {
        self.claims.claims()
    }

    /// Returns the caller identity handed to the propagator.
    pub fn caller(&self) -> CallerIdentity {
        let caller = CallerIdentity::new(&self.uid);
        match &self.email {
            Some(email) => caller.with_email(email),
            None => caller,
        }
    }

    /// Returns `true` if the context has the given capability.
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.permissions.contains(capability)
    }

    /// Returns `true` if the context has all of the given capabilities.
    pub fn has_all_capabilities(&self, capabilities: &[Capability]) -> bool {
        self.permissions.contains_all(capabilities)
    }

    /// Returns `true` if the context has any of the given capabilities.
    pub fn has_any_capability(&self, capabilities: &[Capability]) -> bool {
        self.permissions.contains_any(capabilities)
    }

    /// Returns the subset of `capabilities` the context lacks.
    pub fn missing(&self, capabilities: &[Capability]) -> Vec<Capability> {
        capabilities
            .iter()
            .copied()
            .filter(|c| !self.has_capability(*c))
            .collect()
    }

    /// Returns `true` if this is an anonymous context.
    pub fn is_anonymous(&self) -> bool {
        self.uid == "anonymous"
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::anonymous()
    }
}

// =============================================================================
// Tests
// =============================================================================

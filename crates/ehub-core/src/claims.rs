// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Custom claims attached to identities and embedded in ID tokens.

use serde::{Deserialize, Serialize};

use crate::capability::PermissionSet;
use crate::role::Role;

// =============================================================================
// Custom Claims
// =============================================================================

/// Role claims carried at the top level of a signed ID token.
///
/// Only trusted server code constructs these for writing. `admin` is always
/// derived from `role` by [`CustomClaims::for_role`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomClaims {
    /// The member's role.
    pub role: Role,
    /// `true` iff `role` is [`Role::Admin`].
    pub admin: bool,
}

impl CustomClaims {
    /// Derives claims from a role.
    pub fn for_role(role: Role) -> Self {
        Self {
            role,
            admin: role.is_admin(),
        }
    }

    /// Resolves the permission set for these claims.
    pub fn permissions(&self) -> PermissionSet {
        PermissionSet::for_role(Some(self.role))
    }
}

impl Default for CustomClaims {
    fn default() -> Self {
        default_claims()
    }
}

/// Least-privilege claims used when a token carries no recognisable role.
pub fn default_claims() -> CustomClaims {
    CustomClaims {
        role: Role::User,
        admin: false,
    }
}

// =============================================================================
// Claims Result
// =============================================================================

/// Outcome of validating an untyped claims record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimsResult {
    /// The record carried a recognisable role.
    Valid(CustomClaims),
    /// No recognisable role; callers act on [`default_claims`].
    Fallback,
}

impl ClaimsResult {
    /// Validates a decoded token payload.
    ///
    /// Only `role` decides the outcome. `admin` is re-derived from the role
    /// rather than trusted from the payload, so a record such as
    /// `{"role": "user", "admin": true}` cannot grant admin.
    pub fn from_untyped(payload: &serde_json::Value) -> Self {
        match payload
            .get("role")
            .and_then(serde_json::Value::as_str)
            .and_then(Role::parse)
        {
            Some(role) => ClaimsResult::Valid(CustomClaims::for_role(role)),
            None => ClaimsResult::Fallback,
        }
    }

    /// Returns the effective claims.
    pub fn claims(&self) -> CustomClaims {
        match self {
            ClaimsResult::Valid(claims) => *claims,
            ClaimsResult::Fallback => default_claims(),
        }
    }

    /// Returns `true` for [`ClaimsResult::Fallback`].
    pub fn is_fallback(&self) -> bool {
        matches!(self, ClaimsResult::Fallback)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_for_role_sets_admin_flag() {
        for role in Role::all() {
            let claims = CustomClaims::for_role(*role);
            assert_eq!(claims.admin, *role == Role::Admin);
        }
    }

    #[test]
    fn test_from_untyped_valid() {
        let result = ClaimsResult::from_untyped(&json!({"role": "engineer", "admin": false}));
        assert_eq!(result, ClaimsResult::Valid(CustomClaims::for_role(Role::Engineer)));
        assert!(!result.is_fallback());
    }

    #[test]
    fn test_from_untyped_missing_role() {
        let result = ClaimsResult::from_untyped(&json!({"sub": "u-1", "email": "a@b.c"}));
        assert_eq!(result, ClaimsResult::Fallback);
        assert_eq!(
            result.claims(),
            CustomClaims {
                role: Role::User,
                admin: false
            }
        );
    }

    #[test]
    fn test_from_untyped_unrecognised_role() {
        assert!(ClaimsResult::from_untyped(&json!({"role": "wizard"})).is_fallback());
        assert!(ClaimsResult::from_untyped(&json!({"role": 7})).is_fallback());
        assert!(ClaimsResult::from_untyped(&json!(null)).is_fallback());
    }

    #[test]
    fn test_from_untyped_ignores_forged_admin() {
        let result = ClaimsResult::from_untyped(&json!({"role": "user", "admin": true}));
        assert!(!result.claims().admin);
    }

    #[test]
    fn test_claims_wire_format() {
        let json = serde_json::to_value(CustomClaims::for_role(Role::Admin)).unwrap();
        assert_eq!(json, json!({"role": "admin", "admin": true}));
    }
}

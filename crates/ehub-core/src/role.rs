// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Member roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// =============================================================================
// Role
// =============================================================================

/// The closed set of roles a hub member can hold.
///
/// Every authenticated identity has exactly one role. Accounts that were never
/// assigned a professional role are plain [`Role::User`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Field technician.
    Technician,
    /// Electrical engineer.
    Engineer,
    /// Equipment or materials vendor.
    Vendor,
    /// Contracting company account.
    Company,
    /// Platform administrator.
    Admin,
    /// Community moderator.
    Moderator,
    /// Member without a professional role.
    #[default]
    User,
}

impl Role {
    /// Returns the role name as stored in records and tokens.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Technician => "technician",
            Role::Engineer => "engineer",
            Role::Vendor => "vendor",
            Role::Company => "company",
            Role::Admin => "admin",
            Role::Moderator => "moderator",
            Role::User => "user",
        }
    }

    /// Parses a role name.
    ///
    /// Matching is exact: role names come from trusted server writes, so a
    /// value that does not match is treated as unknown rather than guessed.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "technician" => Some(Role::Technician),
            "engineer" => Some(Role::Engineer),
            "vendor" => Some(Role::Vendor),
            "company" => Some(Role::Company),
            "admin" => Some(Role::Admin),
            "moderator" => Some(Role::Moderator),
            "user" => Some(Role::User),
            _ => None,
        }
    }

    /// Returns every role.
    pub fn all() -> &'static [Role] {
        &[
            Role::Technician,
            Role::Engineer,
            Role::Vendor,
            Role::Company,
            Role::Admin,
            Role::Moderator,
            Role::User,
        ]
    }

    /// Returns `true` for the administrator role.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Returns `true` for roles with moderation rights (moderators and admins).
    pub fn is_moderator(&self) -> bool {
        matches!(self, Role::Moderator | Role::Admin)
    }

    /// Returns a short human-readable description of the role.
    pub fn description(&self) -> &'static str {
        match self {
            Role::Technician => "Field technician",
            Role::Engineer => "Electrical engineer",
            Role::Vendor => "Equipment vendor",
            Role::Company => "Contracting company",
            Role::Admin => "Platform administrator",
            Role::Moderator => "Community moderator",
            Role::User => "Member",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when a role name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s).ok_or_else(|| UnknownRole(s.to_string()))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_round_trips_names() {
        for role in Role::all() {
            assert_eq!(Role::parse(role.as_str()), Some(*role));
        }
    }

    #[test]
    fn test_role_parse_rejects_unknown() {
        assert_eq!(Role::parse("superadmin"), None);
        assert_eq!(Role::parse("Admin"), None);
        assert_eq!(Role::parse(""), None);
        assert!("electrician".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_default_is_user() {
        assert_eq!(Role::default(), Role::User);
    }

    #[test]
    fn test_role_classification() {
        assert!(Role::Admin.is_admin());
        assert!(!Role::Moderator.is_admin());
        assert!(Role::Admin.is_moderator());
        assert!(Role::Moderator.is_moderator());
        assert!(!Role::Engineer.is_moderator());
    }

    #[test]
    fn test_role_serde_lowercase() {
        let json = serde_json::to_string(&Role::Technician).unwrap();
        assert_eq!(json, "\"technician\"");

        let role: Role = serde_json::from_str("\"company\"").unwrap();
        assert_eq!(role, Role::Company);
    }
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API response types.

use ehub_core::{CustomClaims, PermissionSet};
use serde::{Deserialize, Serialize};

// =============================================================================
// Health
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status string.
    pub status: String,
    /// Version string.
    pub version: String,
}

impl HealthResponse {
    /// Creates a healthy response.
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            version: crate::VERSION.to_string(),
        }
    }
}

/// Readiness check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// Whether all components are ready.
    pub ready: bool,
    /// Component statuses.
    pub components: Vec<ComponentStatus>,
}

/// Status of a single component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentStatus {
    /// Component name.
    pub name: String,
    /// Whether the component is healthy.
    pub healthy: bool,
    /// Optional status message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ComponentStatus {
    /// Status of `name` from the outcome of its probe.
    pub fn probe<E: std::fmt::Display>(name: impl Into<String>, outcome: Result<(), E>) -> Self {
        Self {
            name: name.into(),
            healthy: outcome.is_ok(),
            message: outcome.err().map(|e| e.to_string()),
        }
    }
}

// =============================================================================
// Identity
// =============================================================================

/// Response of `GET /api/v1/auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    /// Identity uid.
    pub uid: String,
    /// Sign-in email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Effective role claims.
    pub claims: CustomClaims,
    /// `true` when the token carried no recognisable role.
    pub fallback: bool,
    /// Resolved permissions.
    pub permissions: PermissionSet,
}

/// Response of the claims sync endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncResponse {
    /// Always `true`.
    pub success: bool,
    /// The member whose claims were written.
    pub uid: String,
    /// The written claims.
    pub claims: CustomClaims,
}

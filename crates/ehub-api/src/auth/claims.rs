// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! ID token claims structure.

use chrono::{DateTime, Utc};
use ehub_core::{ClaimsResult, CustomClaims};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims of a signed ID token.
///
/// Custom claims (`role`, `admin`) sit at the top level next to the
/// registered claims. They are kept untyped here and validated through
/// [`ClaimsResult::from_untyped`] when read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdTokenClaims {
    // =========================================================================
    // Registered claims (RFC 7519)
    // =========================================================================
    /// Subject: the identity uid.
    pub sub: String,

    /// Expiration time (Unix timestamp).
    pub exp: i64,

    /// Issued at time (Unix timestamp).
    pub iat: i64,

    /// Issuer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Audience.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,

    /// Token ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    // =========================================================================
    // Profile claims
    // =========================================================================
    /// Sign-in email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    // =========================================================================
    // Custom claims
    // =========================================================================
    /// Developer claims flattened at the top level.
    #[serde(flatten)]
    pub custom: serde_json::Map<String, serde_json::Value>,
}

impl IdTokenClaims {
    /// Creates claims for a uid that expire after `lifetime_secs`.
    pub fn new(uid: impl Into<String>, lifetime_secs: i64) -> Self {
        let now = Utc::now().timestamp();

        Self {
            sub: uid.into(),
            exp: now + lifetime_secs,
            iat: now,
            iss: None,
            aud: None,
            jti: Some(Uuid::now_v7().to_string()),
            email: None,
            name: None,
            custom: serde_json::Map::new(),
        }
    }

    /// Sets the issuer.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.iss = Some(issuer.into());
        self
    }

    /// Sets the audience.
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.aud = Some(audience.into());
        self
    }

    /// Sets the email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Embeds role claims at the top level.
    pub fn with_custom_claims(mut self, claims: &CustomClaims) -> Self {
        if let Ok(serde_json::Value::Object(map)) = serde_json::to_value(claims) {
            self.custom.extend(map);
        }
        self
    }

    /// Returns the identity uid.
    pub fn uid(&self) -> &str {
        &self.sub
    }

    /// Validates the embedded role claims.
    pub fn claims_result(&self) -> ClaimsResult {
        ClaimsResult::from_untyped(&serde_json::Value::Object(self.custom.clone()))
    }

    /// Returns `true` if the token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// Returns the expiration time as a DateTime.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

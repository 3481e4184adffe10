// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Custom extractors for API handlers.

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::auth::AuthContext;
use crate::error::ApiError;

// =============================================================================
// Auth Extractor
// =============================================================================

/// Extractor for authenticated requests.
///
/// Returns 401 if the request carries no verified identity.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(Auth(ctx): Auth) -> impl IntoResponse {
///     format!("Hello, {}", ctx.uid)
/// }
/// ```
pub struct Auth(pub AuthContext);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .filter(|ctx| !ctx.is_anonymous())
            .map(Auth)
            .ok_or_else(|| ApiError::unauthenticated("User must be authenticated"))
    }
}

// =============================================================================
// Optional Auth Extractor
// =============================================================================

/// Extractor for optionally authenticated requests.
///
/// Yields `None` instead of rejecting, leaving the decision to the handler.
pub struct OptionalAuth(pub Option<AuthContext>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .filter(|ctx| !ctx.is_anonymous());
        Ok(OptionalAuth(ctx))
    }
}

// =============================================================================
// Uid Extractor
// =============================================================================

/// Extractor for a member uid from the path.
pub struct UidPath(pub String);

impl<S> FromRequestParts<S> for UidPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(uid) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid uid: {}", e)))?;

        let uid = uid.trim();
        if uid.is_empty() {
            return Err(ApiError::bad_request("uid cannot be empty"));
        }

        Ok(UidPath(uid.to_string()))
    }
}

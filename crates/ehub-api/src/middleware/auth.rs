// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! ID token authentication.
//!
//! Every request leaves this layer with an [`AuthContext`] in its extensions:
//! anonymous on public paths, derived from the verified token elsewhere.
//! A protected request without a usable bearer token never reaches the
//! handler.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::{HeaderMap, Request, header},
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};
use uuid::Uuid;

use crate::auth::{AuthContext, JwtManager};
use crate::error::ApiError;

/// Header carrying a caller-chosen request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const UNAUTHENTICATED_MESSAGE: &str = "User must be authenticated";

// =============================================================================
// PublicPaths
// =============================================================================

/// Paths served without a token.
///
/// An entry ending in `*` matches every path starting with what precedes it.
#[derive(Debug, Clone, Default)]
pub struct PublicPaths {
    exact: Vec<String>,
    prefixes: Vec<String>,
}

impl PublicPaths {
    /// Builds the matcher from configured entries.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut paths = Self::default();
        for entry in entries {
            match entry.as_ref().strip_suffix('*') {
                Some(prefix) => paths.prefixes.push(prefix.to_string()),
                None => paths.exact.push(entry.as_ref().to_string()),
            }
        }
        paths
    }

    /// Returns `true` if `path` needs no token.
    pub fn matches(&self, path: &str) -> bool {
        self.exact.iter().any(|p| p == path)
            || self.prefixes.iter().any(|p| path.starts_with(p.as_str()))
    }
}

// =============================================================================
// AuthLayer
// =============================================================================

/// Layer attaching an [`AuthContext`] to each request.
#[derive(Clone)]
pub struct AuthLayer {
    jwt_manager: Arc<JwtManager>,
    public: Arc<PublicPaths>,
}

impl AuthLayer {
    /// Creates a layer that protects every path.
    pub fn new(jwt_manager: Arc<JwtManager>) -> Self {
        Self {
            jwt_manager,
            public: Arc::default(),
        }
    }

    /// Replaces the public paths.
    pub fn with_public_paths<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.public = Arc::new(PublicPaths::new(entries));
        self
    }

    /// Uses `security.jwt.public_paths`.
    pub fn with_configured_public_paths(self) -> Self {
        let manager = self.jwt_manager.clone();
        self.with_public_paths(manager.public_paths())
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            jwt_manager: self.jwt_manager.clone(),
            public: self.public.clone(),
        }
    }
}

// =============================================================================
// AuthMiddleware
// =============================================================================

/// Service produced by [`AuthLayer`].
#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    jwt_manager: Arc<JwtManager>,
    public: Arc<PublicPaths>,
}

impl<S> Service<Request<Body>> for AuthMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let request_id = request_id(req.headers());
        let context = if self.public.matches(req.uri().path()) {
            Ok(AuthContext::anonymous())
        } else {
            authenticate(&self.jwt_manager, req.headers())
        };

        // Take the service that was driven to readiness.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            match context {
                Ok(context) => {
                    req.extensions_mut()
                        .insert(context.with_request_id(request_id));
                    inner.call(req).await
                }
                Err(err) => {
                    tracing::debug!(
                        path = %req.uri().path(),
                        %request_id,
                        error = %err,
                        "Request not authenticated"
                    );
                    Ok(err.into_response())
                }
            }
        })
    }
}

/// Verifies the bearer token in `headers`.
fn authenticate(jwt: &JwtManager, headers: &HeaderMap) -> Result<AuthContext, ApiError> {
    let token =
        bearer_token(headers).ok_or_else(|| ApiError::unauthenticated(UNAUTHENTICATED_MESSAGE))?;
    let verified = jwt.validate_token(token)?;
    Ok(AuthContext::from_claims(&verified.claims))
}

/// Returns the token of an `Authorization: Bearer <token>` header.
///
/// Other schemes and empty tokens count as no token.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Reuses a well-formed `x-request-id`, otherwise allocates one.
fn request_id(headers: &HeaderMap) -> Uuid {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v).ok())
        .unwrap_or_else(Uuid::now_v7)
}

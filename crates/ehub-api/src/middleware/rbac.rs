// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Capability enforcement middleware.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use ehub_core::Capability;
use ehub_core::audit::{self, AuditLog, AuditLogger, NoOpAuditLogger};
use tower::{Layer, Service};

use crate::auth::AuthContext;
use crate::error::ApiError;

// =============================================================================
// RbacLayer
// =============================================================================

/// Layer for capability checks.
///
/// Must run after [`super::AuthLayer`], which attaches the [`AuthContext`].
#[derive(Clone)]
pub struct RbacLayer {
    required: Arc<Vec<Capability>>,
    require_all: bool,
    audit: Arc<dyn AuditLogger>,
}

impl RbacLayer {
    /// Creates a layer requiring a single capability.
    pub fn require(capability: Capability) -> Self {
        Self::require_all(vec![capability])
    }

    /// Creates a layer requiring all specified capabilities.
    pub fn require_all(capabilities: Vec<Capability>) -> Self {
        Self {
            required: Arc::new(capabilities),
            require_all: true,
            audit: Arc::new(NoOpAuditLogger::new()),
        }
    }

    /// Creates a layer requiring any of the specified capabilities.
    pub fn require_any(capabilities: Vec<Capability>) -> Self {
        Self {
            require_all: false,
            ..Self::require_all(capabilities)
        }
    }

    /// Records denials with the given audit logger.
    pub fn with_audit_logger(mut self, audit: Arc<dyn AuditLogger>) -> Self {
        self.audit = audit;
        self
    }
}

impl<S> Layer<S> for RbacLayer {
    type Service = RbacMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RbacMiddleware {
            inner,
            required: self.required.clone(),
            require_all: self.require_all,
            audit: self.audit.clone(),
        }
    }
}

// =============================================================================
// RbacMiddleware
// =============================================================================

/// Middleware for capability enforcement.
#[derive(Clone)]
pub struct RbacMiddleware<S> {
    inner: S,
    required: Arc<Vec<Capability>>,
    require_all: bool,
    audit: Arc<dyn AuditLogger>,
}

impl<S> Service<Request<Body>> for RbacMiddleware<S>
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

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let required = self.required.clone();
        let require_all = self.require_all;
        let audit = self.audit.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let Some(ctx) = req
                .extensions()
                .get::<AuthContext>()
                .filter(|ctx| !ctx.is_anonymous())
                .cloned()
            else {
                tracing::warn!("No auth context found, denying access");
                return Ok(ApiError::unauthenticated("User must be authenticated").into_response());
            };

            let allowed = if require_all {
                ctx.has_all_capabilities(&required)
            } else {
                ctx.has_any_capability(&required)
            };

            if allowed {
                return inner.call(req).await;
            }

            let missing = ctx.missing(&required);
            let path = req.uri().path().to_string();
            tracing::warn!(
                uid = %ctx.uid,
                role = %ctx.custom_claims().role,
                path = %path,
                required = ?required.as_slice(),
                "Permission denied"
            );
            audit::record(
                audit.as_ref(),
                AuditLog::access_denied(Some(&ctx.uid), &path, &missing),
            )
            .await;

            Ok(ApiError::permission_denied("Insufficient permissions").into_response())
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

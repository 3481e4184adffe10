// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API server implementation.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method, StatusCode, header},
    routing::{get, post},
};
use ehub_core::Capability;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::handlers;
use crate::middleware::{AuthLayer, RbacLayer};
use crate::state::AppState;

// =============================================================================
// ApiServer
// =============================================================================

/// The API server.
pub struct ApiServer {
    state: AppState,
    config: Arc<ApiConfig>,
}

impl ApiServer {
    /// Creates a new API server with the given state.
    pub fn new(state: AppState) -> Self {
        let config = state.config().clone();
        Self { state, config }
    }

    /// Creates the router with all routes and middleware.
    pub fn router(&self) -> Router {
        let cors = create_cors_layer(&self.config);
        let auth = AuthLayer::new(self.state.jwt().clone()).with_configured_public_paths();

        let middleware_stack = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                self.config.request_timeout,
            ))
            .layer(cors)
            .layer(auth);

        let admin = Router::new()
            .route(
                "/api/v1/admin/users/{uid}/claims/sync",
                post(handlers::sync_user_claims),
            )
            .route_layer(
                RbacLayer::require(Capability::CanAssignRoles)
                    .with_audit_logger(self.state.audit().clone()),
            );

        Router::new()
            // Health endpoints (public)
            .route("/health", get(handlers::health))
            .route("/ready", get(handlers::ready))
            // Callable functions
            .route(
                "/api/v1/functions/refreshUserToken",
                post(handlers::refresh_user_token),
            )
            // ID tokens
            .route("/api/v1/auth/token", post(handlers::mint_token))
            .route("/api/v1/auth/me", get(handlers::current_session))
            .merge(admin)
            .layer(middleware_stack)
            .with_state(self.state.clone())
    }

    /// Binds the configured address and serves until `shutdown_signal`
    /// resolves.
    pub async fn run_with_shutdown(
        self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to bind {}: {}", addr, e)))?;

        self.serve(listener, shutdown_signal).await
    }

    /// Serves on an already bound listener until `shutdown_signal` resolves.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        let router = self.router();
        let local_addr = listener
            .local_addr()
            .map_err(|e| ApiError::internal(format!("Failed to read local address: {}", e)))?;

        info!(addr = %local_addr, "Starting API server");

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| ApiError::internal(format!("Server error: {}", e)))?;

        info!("API server shutdown complete");

        Ok(())
    }

    /// Returns the configured server address.
    pub fn addr(&self) -> SocketAddr {
        self.config.socket_addr()
    }

    /// Returns the shared state.
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Creates the CORS layer from configuration.
fn create_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = &config.cors;

    let mut layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT]);

    let wildcard = cors.allowed_origins.iter().any(|o| o == "*");
    if wildcard {
        layer = layer.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = cors
            .allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        layer = layer.allow_origin(AllowOrigin::list(origins));
    }

    // Credentials cannot be combined with a wildcard origin.
    if cors.allow_credentials {
        if wildcard {
            warn!("CORS allow_credentials ignored with wildcard origin");
        } else {
            layer = layer.allow_credentials(true);
        }
    }

    layer
}

// =============================================================================
// Tests
// =============================================================================

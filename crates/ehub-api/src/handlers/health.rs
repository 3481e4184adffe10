// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Health check handlers.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::response::{ComponentStatus, HealthResponse, ReadinessResponse};
use crate::state::AppState;

/// GET /health
///
/// Liveness check. Returns 200 OK if the service is running.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse::healthy())
}

/// GET /ready
///
/// Ready once the audit logger accepts a flush; 503 otherwise.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    let audit = state.audit();
    let components = vec![ComponentStatus::probe(
        format!("audit_logger:{}", audit.name()),
        audit.flush().await,
    )];

    let ready = components.iter().all(|c| c.healthy);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(ReadinessResponse { ready, components }))
}

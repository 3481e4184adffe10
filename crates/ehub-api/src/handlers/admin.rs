// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Administrative handlers.

use axum::{Json, extract::State};

use crate::error::ApiResult;
use crate::extractors::{Auth, UidPath};
use crate::response::SyncResponse;
use crate::state::AppState;

/// POST /api/v1/admin/users/{uid}/claims/sync
///
/// Issues and writes claims for any member after a role assignment.
/// Guarded by `RbacLayer::require(Capability::CanAssignRoles)`.
pub async fn sync_user_claims(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    UidPath(uid): UidPath,
) -> ApiResult<Json<SyncResponse>> {
    let claims = state.propagator().sync_user(Some(&ctx.uid), &uid).await?;
    Ok(Json(SyncResponse {
        success: true,
        uid,
        claims,
    }))
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Callable functions.

use axum::{Json, extract::State};
use ehub_core::RefreshOutcome;

use crate::error::ApiResult;
use crate::extractors::OptionalAuth;
use crate::state::AppState;

/// POST /api/v1/functions/refreshUserToken
///
/// Re-issues the caller's claims from their persisted role and writes them
/// onto the caller's identity. Takes no body: the target is always the
/// verified caller.
pub async fn refresh_user_token(
    State(state): State<AppState>,
    OptionalAuth(ctx): OptionalAuth,
) -> ApiResult<Json<RefreshOutcome>> {
    let caller = ctx.map(|ctx| ctx.caller());
    let outcome = state.propagator().refresh_caller(caller.as_ref()).await?;
    Ok(Json(outcome))
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! ID token handlers.

use axum::{Json, extract::State};

use crate::auth::MintedToken;
use crate::error::ApiResult;
use crate::extractors::Auth;
use crate::response::SessionResponse;
use crate::state::AppState;

/// POST /api/v1/auth/token
///
/// Mints a new ID token for the caller carrying the claims currently stored
/// on their identity. This is the forced-refresh target.
pub async fn mint_token(
    State(state): State<AppState>,
    Auth(ctx): Auth,
) -> ApiResult<Json<MintedToken>> {
    let minted = state.tokens().mint(&ctx.uid).await?;
    Ok(Json(minted))
}

/// GET /api/v1/auth/me
///
/// Returns the session as the server sees it from the presented token.
pub async fn current_session(Auth(ctx): Auth) -> Json<SessionResponse> {
    Json(SessionResponse {
        claims: ctx.custom_claims(),
        fallback: ctx.claims.is_fallback(),
        permissions: ctx.permissions,
        uid: ctx.uid,
        email: ctx.email,
    })
}

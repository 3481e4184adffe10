// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication module.
//!
//! This module provides:
//! - ID token signing and validation
//! - ID token minting from identity records
//! - The per-request authentication context

mod claims;
mod context;
mod jwt;
mod token;

pub use claims::IdTokenClaims;
pub use context::AuthContext;
pub use jwt::JwtManager;
pub use token::{MintedToken, TokenService};

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # ehub-api
//!
//! HTTP surface for ElectricianHub access control.
//!
//! This crate exposes the `refreshUserToken` callable, ID token minting and
//! the trusted claims sync endpoint, behind ID token authentication and
//! capability checks.
//!
//! ## Routes
//!
//! | Method | Path | Guard |
//! |---|---|---|
//! | GET | `/health`, `/ready` | public |
//! | POST | `/api/v1/functions/refreshUserToken` | authenticated |
//! | POST | `/api/v1/auth/token` | authenticated |
//! | GET | `/api/v1/auth/me` | authenticated |
//! | POST | `/api/v1/admin/users/{uid}/claims/sync` | `canAssignRoles` |

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod server;
pub mod state;

pub use auth::{AuthContext, IdTokenClaims, JwtManager, MintedToken, TokenService};
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, ErrorDetails, ErrorKind, ErrorResponseBody};
pub use server::ApiServer;
pub use state::{AppState, AppStateBuilder};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

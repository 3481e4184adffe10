// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API handlers for all endpoints.
//!
//! - [`health`]: Health check endpoints
//! - [`functions`]: Callable functions (`refreshUserToken`)
//! - [`auth`]: ID token minting and session inspection
//! - [`admin`]: Trusted claims sync

mod admin;
mod auth;
mod functions;
mod health;

pub use admin::*;
pub use auth::*;
pub use functions::*;
pub use health::*;

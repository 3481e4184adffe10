// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Middleware implementations for the API server.
//!
//! - [`AuthMiddleware`]: ID token authentication
//! - [`RbacLayer`]: Capability enforcement

mod auth;
mod rbac;

pub use auth::{AuthLayer, AuthMiddleware, PublicPaths, REQUEST_ID_HEADER};
pub use rbac::{RbacLayer, RbacMiddleware};

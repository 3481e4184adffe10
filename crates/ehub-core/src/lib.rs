// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # ehub-core
//!
//! Role-based access control and claims propagation for ElectricianHub.
//!
//! - **Role / Capability**: the closed role set and the capability policy table
//! - **Claims**: custom claims embedded in ID tokens and their validation
//! - **Store**: seams for user records and identity records
//! - **Issuer**: derives claims from a persisted role
//! - **Propagator**: writes issued claims onto identities
//! - **Audit**: audit trail of claims and authorization events
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ehub_core::{ClaimsIssuer, ClaimsPropagator, CallerIdentity, Role, UserRecord};
//! use ehub_core::store::{InMemoryIdentityStore, InMemoryUserStore};
//!
//! let records = vec![UserRecord::new("u-1", "ada@hub.test", Role::Engineer)];
//! let identities = InMemoryIdentityStore::from_users(records.iter());
//! let users = InMemoryUserStore::with_users(records);
//!
//! let propagator = ClaimsPropagator::new(
//!     ClaimsIssuer::new(Arc::new(users)),
//!     Arc::new(identities),
//! );
//! let outcome = propagator.refresh_caller(Some(&CallerIdentity::new("u-1"))).await?;
//! assert!(outcome.claims.permissions().can_create_blog_posts);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Role Registry
// =============================================================================

pub mod capability;
pub mod role;

// =============================================================================
// Claims
// =============================================================================

pub mod claims;
pub mod error;
pub mod issuer;
pub mod propagator;
pub mod store;

// =============================================================================
// Audit
// =============================================================================

pub mod audit;

// =============================================================================
// Re-exports
// =============================================================================

pub use capability::{Capability, PermissionSet};
pub use claims::{ClaimsResult, CustomClaims, default_claims};
pub use error::{IssuerError, PropagationError, StoreError, StoreResult};
pub use issuer::ClaimsIssuer;
pub use propagator::{CallerIdentity, ClaimsPropagator, REFRESH_MESSAGE, RefreshOutcome};
pub use role::{Role, UnknownRole};
pub use store::{IdentityRecord, IdentityStore, UserRecord, UserStore};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

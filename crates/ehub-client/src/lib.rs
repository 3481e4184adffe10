// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # ehub-client
//!
//! Client-side claims handling for ElectricianHub sessions.
//!
//! - **Cache**: the signed-in member's claims, kept in step with identity changes
//! - **Guards**: render or redirect decisions for protected and admin views
//! - **Transport**: the HTTP client for the ElectricianHub API
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ehub_client::{ClaimsCache, HubClient, Identity, IdentityFeed};
//!
//! let client = Arc::new(HubClient::new("http://127.0.0.1:8080")?.with_id_token(token));
//! let cache = ClaimsCache::new(client.clone());
//! let feed = IdentityFeed::new();
//! let _listener = cache.spawn_listener(feed.subscribe());
//!
//! feed.sign_in(Identity::new("u-1").with_email("ada@hub.test"));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod cache;
pub mod error;
pub mod guard;
pub mod http;
pub mod identity;
pub mod provider;

pub use cache::{ClaimsCache, ClaimsSnapshot};
pub use error::{ClientError, ClientResult};
pub use guard::{
    AccessGuard, AdminAllowList, AdminGuard, GuardBinding, GuardDecision, Navigator,
    ProtectedGuard,
};
pub use http::{HubClient, decode_payload};
pub use identity::{Identity, IdentityFeed, SessionState};
pub use provider::{ClaimsRefresher, TokenProvider};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # ElectricianHub Integration Tests
//!
//! Cross-crate tests for role issuance, claims propagation, the HTTP
//! surface and the client claims cache.
//!
//! ## Module Structure
//!
//! - [`common`]: Shared test utilities
//!   - `fixtures`: Seed users and configurations
//!   - `mocks`: Failing stores and a recording navigator
//!   - `harness`: In-process hub state and a live test server
//!   - `assertions`: Response assertions
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p ehub-tests
//! cargo test -p ehub-tests --test integration_client
//! ```
//!
//! ## Test Categories
//!
//! - `integration_core.rs`: role policy, issuer, propagator, audit trail
//! - `integration_api.rs`: routes driven in-process with `oneshot`
//! - `integration_client.rs`: claims cache and guards against a live server
//! - `integration_config.rs`: file loading, overrides and validation
//!
//! ## Writing New Tests
//!
//! ```rust,ignore
//! use ehub_tests::prelude::*;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let hub = TestHub::new();
//!     let token = hub.bearer(UserFixtures::ADA, None);
//!     // ... drive hub.router()
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::assertions::*;
    pub use crate::common::fixtures::*;
    pub use crate::common::harness::*;
    pub use crate::common::mocks::*;
    pub use crate::common::init_test_logging;
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Common Test Utilities
//!
//! - `fixtures`: Seed users and configurations
//! - `mocks`: Failing stores and a recording navigator
//! - `harness`: In-process hub state and a live test server
//! - `assertions`: Response assertions

pub mod assertions;
pub mod fixtures;
pub mod harness;
pub mod mocks;

pub use assertions::*;
pub use fixtures::*;
pub use harness::*;
pub use mocks::*;

use tracing_subscriber::EnvFilter;

/// Directives used when neither `EHUB_TEST_LOG` nor `RUST_LOG` is set.
const DEFAULT_DIRECTIVES: &str = "warn,ehub_core=debug,ehub_api=debug,ehub_client=debug";

/// Routes `tracing` output through the test harness.
///
/// Safe to call from every test; only the first call installs a subscriber.
pub fn init_test_logging() {
    let directives = std::env::var("EHUB_TEST_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| DEFAULT_DIRECTIVES.to_string());
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    // Fails once a subscriber is installed, which is expected after the first test.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_test_writer()
        .try_init();
}

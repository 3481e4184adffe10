// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # ehub-bin
//!
//! The `ehub` command-line binary.
//!
//! ```text
//!              main.rs
//!                 │
//!              cli.rs ──────────┐
//!                 │             │
//!            commands ──── logging
//!                 │
//!              runtime ─── shutdown
//!                 │
//!        ehub-api / ehub-config / ehub-core
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the server (default command)
//! ehub -c /etc/ehub/ehub.yaml
//!
//! # Validate configuration
//! ehub validate --strict
//!
//! # Print the role capability table
//! ehub roles -f json
//!
//! # Mint a development token carrying freshly issued claims
//! ehub token u-ada --sync
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod runtime;
pub mod shutdown;

pub use cli::{Cli, Commands, LogSettings};
pub use error::{BinError, BinResult};
pub use logging::init_logging;
pub use runtime::{HubRuntime, RuntimeBuilder};
pub use shutdown::ShutdownCoordinator;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

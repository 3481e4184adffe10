// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # ehub-config
//!
//! Configuration management for the ElectricianHub access-control service.
//!
//! ## Quick Start
//!
//! ```no_run
//! use ehub_config::loader::load_config;
//!
//! let config = load_config("ehub.yaml").unwrap();
//! println!("Seeded users: {}", config.users.len());
//! ```
//!
//! ## Example
//!
//! ```yaml
//! server:
//!   port: 8080
//! security:
//!   jwt:
//!     secret: "${EHUB_JWT_SECRET}"
//! access:
//!   admin_emails: ["ops@electricianhub.test"]
//!   sign_in_route: /login
//!   default_route: /dashboard
//! users:
//!   - uid: u-ada
//!     email: ada@electricianhub.test
//!     role: engineer
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod loader;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigFormat, ConfigLoader, load_config};
pub use schema::{
    AccessConfig, AuditConfig, AuditSink, CorsConfig, HubConfig, JwtAlgorithm, JwtConfig,
    LogFormat, LogLevel, LoggingConfig, SecretValue, SecurityConfig, ServerConfig, UserSeed,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

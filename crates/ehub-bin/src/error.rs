// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Errors of the `ehub` binary and the exit status each one maps to.

use ehub_api::ApiError;
use ehub_config::ConfigError;
use ehub_core::PropagationError;
use thiserror::Error;

/// Result type alias for ehub-bin operations.
pub type BinResult<T> = Result<T, BinError>;

/// Process exit statuses, following `sysexits.h`.
pub mod exit {
    /// A member or identity the command named does not exist.
    pub const NO_USER: i32 = 67;
    /// A backing service refused or failed the request.
    pub const UNAVAILABLE: i32 = 69;
    /// Internal failure.
    pub const SOFTWARE: i32 = 70;
    /// Output could not be written.
    pub const IO: i32 = 74;
    /// Missing or invalid configuration.
    pub const CONFIG: i32 = 78;
}

/// Everything that can stop an `ehub` command.
#[derive(Debug, Error)]
pub enum BinError {
    /// The command was started without a usable configuration.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The configuration file could not be loaded or was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Logging, state or the listener could not be set up.
    #[error("startup failed: {0}")]
    Startup(String),

    /// The API failed, either while serving or while minting a token.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Claims could not be issued or written.
    #[error("claims sync failed: {0}")]
    Propagation(#[from] PropagationError),

    /// Command output could not be produced.
    #[error("cannot write output: {0}")]
    Output(String),

    /// Another error, annotated with what the command was doing.
    #[error("{context}: {source}")]
    WithContext {
        /// What was being attempted.
        context: String,
        /// The failure.
        #[source]
        source: Box<BinError>,
    },
}

impl BinError {
    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Creates a startup error.
    pub fn startup(msg: impl Into<String>) -> Self {
        Self::Startup(msg.into())
    }

    /// Wraps the error with a description of the failed step.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, skipping context wrappers.
    pub fn root(&self) -> &BinError {
        match self {
            Self::WithContext { source, .. } => source.root(),
            other => other,
        }
    }

    /// Returns the process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self.root() {
            Self::Configuration(_) | Self::Config(_) => exit::CONFIG,
            Self::Output(_) => exit::IO,
            Self::Api(ApiError::NotFound { .. }) | Self::Propagation(PropagationError::NotFound) => {
                exit::NO_USER
            }
            Self::Api(e) if e.is_server_error() => exit::SOFTWARE,
            Self::Api(_) | Self::Propagation(_) => exit::UNAVAILABLE,
            Self::Startup(_) | Self::WithContext { .. } => exit::SOFTWARE,
        }
    }
}

impl From<std::io::Error> for BinError {
    fn from(err: std::io::Error) -> Self {
        Self::Output(err.to_string())
    }
}

impl From<serde_json::Error> for BinError {
    fn from(err: serde_json::Error) -> Self {
        Self::Output(format!("JSON encoding failed: {}", err))
    }
}

// =============================================================================
// Error Reporting
// =============================================================================

/// Prints an error and its cause chain to stderr.
pub fn report_error(error: &BinError) {
    eprintln!("ehub: {}", error);

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("  caused by: {}", cause);
        source = cause.source();
    }
    if matches!(error.root(), BinError::Config(_) | BinError::Configuration(_)) {
        eprintln!("  hint: run `ehub validate --show-config` to inspect the effective configuration");
    }
}

/// Reports an error and exits with its exit status.
pub fn report_error_and_exit(error: BinError) -> ! {
    report_error(&error);
    std::process::exit(error.exit_code())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_chain() {
        let err = BinError::config("no file given").with_context("loading");
        assert_eq!(err.to_string(), "loading: invalid configuration: no file given");
        assert!(matches!(err.root(), BinError::Configuration(_)));
        assert_eq!(err.exit_code(), exit::CONFIG);
    }

    #[test]
    fn test_unknown_member_exit_status() {
        assert_eq!(BinError::from(PropagationError::NotFound).exit_code(), exit::NO_USER);
        assert_eq!(BinError::from(ApiError::not_found("Identity")).exit_code(), exit::NO_USER);
    }

    #[test]
    fn test_failure_exit_statuses() {
        assert_eq!(BinError::from(PropagationError::Internal).exit_code(), exit::UNAVAILABLE);
        assert_eq!(BinError::from(ApiError::internal("bind")).exit_code(), exit::SOFTWARE);
        assert_eq!(BinError::startup("logger").exit_code(), exit::SOFTWARE);
        assert_eq!(
            BinError::from(std::io::Error::other("broken pipe")).exit_code(),
            exit::IO
        );
    }
}

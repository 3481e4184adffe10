// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Errors raised while loading or checking a hub configuration.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Origin used for documents that did not come from a file.
const INLINE: &str = "<inline>";

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document could not be deserialized into a [`HubConfig`](crate::HubConfig).
    #[error("{origin}: malformed {format} document: {message}")]
    Malformed {
        /// File path, or `<inline>` for string input.
        origin: String,
        /// Document format name.
        format: &'static str,
        /// Deserializer message.
        message: String,
    },

    /// A field holds a value the hub cannot run with.
    #[error("invalid {field}: {message}")]
    Validation {
        /// Dotted path of the field.
        field: String,
        /// What is wrong with it.
        message: String,
    },

    /// A seeded user appears twice in `users`.
    #[error("user '{uid}' is declared more than once")]
    DuplicateUser {
        /// The repeated uid.
        uid: String,
    },

    /// The configuration file does not exist.
    #[error("no configuration at {}", path.display())]
    FileNotFound {
        /// Requested path.
        path: PathBuf,
    },

    /// The file exists but could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Unreadable {
        /// File path.
        path: PathBuf,
        /// I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// An `EHUB_*` override holds an unusable value.
    #[error("environment variable {name}: {message}")]
    InvalidEnvVar {
        /// Variable name.
        name: String,
        /// Why the value was rejected.
        message: String,
    },

    /// The file extension names no supported format.
    #[error("unsupported configuration extension '{extension}' (expected yaml, yml, toml or json)")]
    UnsupportedFormat {
        /// Extension as written.
        extension: String,
    },
}

impl ConfigError {
    /// Creates an error for a document that failed to deserialize.
    pub fn malformed(format: &'static str, message: impl ToString) -> Self {
        Self::Malformed {
            origin: INLINE.to_string(),
            format,
            message: message.to_string(),
        }
    }

    /// Attributes a malformed document to the file it was read from.
    pub fn in_file(self, path: &Path) -> Self {
        match self {
            Self::Malformed {
                format, message, ..
            } => Self::Malformed {
                origin: path.display().to_string(),
                format,
                message,
            },
            other => other,
        }
    }

    /// Creates a validation error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates an unreadable file error.
    pub fn unreadable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Unreadable {
            path: path.into(),
            source,
        }
    }

    /// Creates a file not found error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Creates an invalid environment variable error.
    pub fn invalid_env_var(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEnvVar {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a duplicate user error.
    pub fn duplicate_user(uid: impl Into<String>) -> Self {
        Self::DuplicateUser { uid: uid.into() }
    }

    /// Creates an unsupported format error.
    pub fn unsupported_format(extension: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            extension: extension.into(),
        }
    }

    /// Returns `true` when the document parsed but its content was rejected.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::DuplicateUser { .. })
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

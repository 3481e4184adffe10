// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types for claims issuance and propagation.

use thiserror::Error;

// =============================================================================
// Store Errors
// =============================================================================

/// Errors raised by user and identity stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be reached.
    #[error("Store unavailable: {message}")]
    Unavailable {
        /// Description of the failure.
        message: String,
    },

    /// A write was rejected.
    #[error("Write failed for {uid}: {message}")]
    WriteFailed {
        /// The identity being written.
        uid: String,
        /// Description of the failure.
        message: String,
    },

    /// The identity does not exist in the identity store.
    #[error("Identity not found: {uid}")]
    IdentityNotFound {
        /// The missing identity.
        uid: String,
    },
}

impl StoreError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a write failed error.
    pub fn write_failed(uid: impl Into<String>, message: impl Into<String>) -> Self {
        Self::WriteFailed {
            uid: uid.into(),
            message: message.into(),
        }
    }

    /// Creates an identity not found error.
    pub fn identity_not_found(uid: impl Into<String>) -> Self {
        Self::IdentityNotFound { uid: uid.into() }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Issuer Errors
// =============================================================================

/// Errors raised while issuing claims.
#[derive(Debug, Error)]
pub enum IssuerError {
    /// No persisted user record exists for the uid.
    #[error("User record not found: {uid}")]
    NotFound {
        /// The uid that was looked up.
        uid: String,
    },

    /// The user store failed.
    #[error("User store error: {0}")]
    Store(#[from] StoreError),
}

impl IssuerError {
    /// Creates a not found error.
    pub fn not_found(uid: impl Into<String>) -> Self {
        Self::NotFound { uid: uid.into() }
    }

    /// Returns `true` for [`IssuerError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, IssuerError::NotFound { .. })
    }
}

// =============================================================================
// Propagation Errors
// =============================================================================

/// Errors that cross the trust boundary from the propagator to callers.
///
/// The set is closed and carries no internal detail. Causes are logged where
/// the error is created.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropagationError {
    /// The call carried no verified identity.
    #[error("User must be authenticated")]
    Unauthenticated,

    /// No persisted record exists for the target uid.
    ///
    /// Only trusted sync paths surface this; the self-refresh callable folds
    /// it into [`PropagationError::Internal`].
    #[error("User record not found")]
    NotFound,

    /// Any other failure.
    #[error("Failed to refresh user token")]
    Internal,
}

impl PropagationError {
    /// Returns the error kind reported to callers.
    pub fn kind(&self) -> &'static str {
        match self {
            PropagationError::Unauthenticated => "unauthenticated",
            PropagationError::NotFound => "not-found",
            PropagationError::Internal => "internal",
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issuer_error_from_store() {
        let err: IssuerError = StoreError::unavailable("connection reset").into();
        assert!(matches!(err, IssuerError::Store(_)));
        assert!(!err.is_not_found());
        assert!(IssuerError::not_found("u-1").is_not_found());
    }

    #[test]
    fn test_propagation_error_kinds() {
        assert_eq!(PropagationError::Unauthenticated.kind(), "unauthenticated");
        assert_eq!(PropagationError::Internal.kind(), "internal");
        assert_eq!(PropagationError::NotFound.kind(), "not-found");
    }

    #[test]
    fn test_propagation_messages_carry_no_detail() {
        assert_eq!(
            PropagationError::Internal.to_string(),
            "Failed to refresh user token"
        );
        assert_eq!(
            PropagationError::Unauthenticated.to_string(),
            "User must be authenticated"
        );
    }
}

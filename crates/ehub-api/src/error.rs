// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Errors crossing the HTTP boundary.
//!
//! Every failure is reduced to one of the callable error kinds below. The
//! response body is always `{ "error": { "kind": ..., "message": ... } }`.

use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ehub_core::PropagationError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Message returned in place of an internal cause.
const GENERIC_INTERNAL_MESSAGE: &str = "Internal server error";

// =============================================================================
// ErrorKind
// =============================================================================

/// Callable error codes understood by clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing or invalid ID token.
    Unauthenticated,
    /// Authenticated, but lacking a capability.
    PermissionDenied,
    /// The named record does not exist.
    NotFound,
    /// Malformed request.
    InvalidArgument,
    /// Server-side failure.
    Internal,
}

impl ErrorKind {
    /// Wire name of the kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::PermissionDenied => "permission-denied",
            Self::NotFound => "not-found",
            Self::InvalidArgument => "invalid-argument",
            Self::Internal => "internal",
        }
    }

    /// HTTP status the kind is served with.
    pub const fn status(self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::PermissionDenied => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InvalidArgument => StatusCode::BAD_REQUEST,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// ApiError
// =============================================================================

/// A request failure, tagged with its [`ErrorKind`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// No valid session.
    #[error("unauthenticated: {message}")]
    Unauthenticated {
        /// Caller-facing message.
        message: String,
    },

    /// The session lacks a capability.
    #[error("permission denied: {message}")]
    PermissionDenied {
        /// Caller-facing message.
        message: String,
    },

    /// `resource` names what was looked up, e.g. `"User record"`.
    #[error("{resource} not found")]
    NotFound {
        /// What was looked up.
        resource: String,
    },

    /// Malformed request.
    #[error("invalid argument: {message}")]
    BadRequest {
        /// Caller-facing message.
        message: String,
    },

    /// `message` is logged; only `public_message` reaches the caller.
    #[error("internal: {message}")]
    Internal {
        /// Cause, for the log.
        message: String,
        /// Message for the caller, if any.
        public_message: Option<String>,
    },
}

impl ApiError {
    /// Creates an unauthenticated error.
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated {
            message: message.into(),
        }
    }

    /// Creates a permission denied error.
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }

    /// Creates a not found error for `resource`.
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Creates an invalid argument error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Internal error with a cause that must stay server-side.
    pub fn internal(cause: impl Into<String>) -> Self {
        Self::Internal {
            message: cause.into(),
            public_message: None,
        }
    }

    /// Internal error whose message is meant for the caller.
    pub fn internal_public(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::Internal {
            public_message: Some(message.clone()),
            message,
        }
    }

    /// Returns the callable error kind.
    pub fn error_kind(&self) -> ErrorKind {
        match self {
            Self::Unauthenticated { .. } => ErrorKind::Unauthenticated,
            Self::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::BadRequest { .. } => ErrorKind::InvalidArgument,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Wire name of the error kind.
    pub fn kind(&self) -> &'static str {
        self.error_kind().as_str()
    }

    /// Returns the HTTP status.
    pub fn status_code(&self) -> StatusCode {
        self.error_kind().status()
    }

    /// Message sent to the caller.
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthenticated { message }
            | Self::PermissionDenied { message }
            | Self::BadRequest { message } => message.clone(),
            Self::NotFound { .. } => self.to_string(),
            Self::Internal { public_message, .. } => public_message
                .as_deref()
                .unwrap_or(GENERIC_INTERNAL_MESSAGE)
                .to_string(),
        }
    }

    /// Returns `true` for failures logged at error level.
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    fn body(&self) -> ErrorResponseBody {
        ErrorResponseBody {
            error: ErrorDetails {
                kind: self.kind().to_string(),
                message: self.user_message(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.error_kind();
        if self.is_server_error() {
            tracing::error!(error = %self, %kind, "Request failed");
        } else {
            tracing::debug!(error = %self, %kind, "Request rejected");
        }

        (kind.status(), Json(self.body())).into_response()
    }
}

// =============================================================================
// Response body
// =============================================================================

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponseBody {
    /// Error details.
    pub error: ErrorDetails,
}

/// The `error` object of an [`ErrorResponseBody`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// One of the [`ErrorKind`] wire names.
    pub kind: String,
    /// Human-readable message.
    pub message: String,
}

// =============================================================================
// Conversions
// =============================================================================

impl From<PropagationError> for ApiError {
    fn from(err: PropagationError) -> Self {
        match err {
            PropagationError::Unauthenticated => Self::unauthenticated(err.to_string()),
            PropagationError::NotFound => Self::not_found("User record"),
            PropagationError::Internal => Self::internal_public(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::bad_request(format!("Invalid JSON: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_status_table() {
        let cases = [
            (ApiError::unauthenticated("x"), "unauthenticated", 401),
            (ApiError::permission_denied("x"), "permission-denied", 403),
            (ApiError::not_found("x"), "not-found", 404),
            (ApiError::bad_request("x"), "invalid-argument", 400),
            (ApiError::internal("x"), "internal", 500),
        ];
        for (err, kind, status) in cases {
            assert_eq!(err.kind(), kind);
            assert_eq!(err.status_code().as_u16(), status, "{}", kind);
            assert_eq!(err.is_server_error(), status == 500);
        }
    }

    #[test]
    fn test_internal_cause_is_hidden() {
        let err = ApiError::internal("store connection reset by peer");
        assert_eq!(err.user_message(), GENERIC_INTERNAL_MESSAGE);
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(ApiError::not_found("Identity").user_message(), "Identity not found");
    }

    #[test]
    fn test_from_propagation_error() {
        let err: ApiError = PropagationError::Unauthenticated.into();
        assert_eq!(err.error_kind(), ErrorKind::Unauthenticated);
        assert_eq!(err.user_message(), "User must be authenticated");

        let err: ApiError = PropagationError::Internal.into();
        assert_eq!(err.kind(), "internal");
        assert_eq!(err.user_message(), "Failed to refresh user token");

        let err: ApiError = PropagationError::NotFound.into();
        assert_eq!(err.user_message(), "User record not found");
    }

    #[tokio::test]
    async fn test_response_body_shape() {
        let response = ApiError::permission_denied("Insufficient permissions").into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorResponseBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error.kind, "permission-denied");
        assert_eq!(body.error.message, "Insufficient permissions");
    }
}

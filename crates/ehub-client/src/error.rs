// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Client error types.

use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors raised while talking to the API.
///
/// The claims cache never surfaces these to its readers; it logs them and
/// falls back to default claims.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be sent or the response not read.
    #[error("Transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
        /// Underlying error.
        #[source]
        source: Option<reqwest::Error>,
    },

    /// The server answered with an error body.
    #[error("{kind}: {message}")]
    Callable {
        /// HTTP status code.
        status: u16,
        /// Error kind reported by the server.
        kind: String,
        /// Error message reported by the server.
        message: String,
    },

    /// A token or response body could not be decoded.
    #[error("Decode error: {message}")]
    Decode {
        /// Error message.
        message: String,
    },

    /// The operation needs a signed-in identity.
    #[error("No identity is signed in")]
    NotSignedIn,
}

impl ClientError {
    /// Creates a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates a callable error.
    pub fn callable(status: u16, kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Callable {
            status,
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Returns the server error kind, if the server produced one.
    pub fn kind(&self) -> Option<&str> {
        match self {
            ClientError::Callable { kind, .. } => Some(kind),
            _ => None,
        }
    }

    /// Returns `true` if the server rejected the session.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self.kind(), Some("unauthenticated")) || matches!(self, ClientError::NotSignedIn)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for ClientError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        ClientError::decode(format!("Invalid ID token: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callable_kind() {
        let err = ClientError::callable(401, "unauthenticated", "User must be authenticated");
        assert_eq!(err.kind(), Some("unauthenticated"));
        assert!(err.is_unauthenticated());
        assert_eq!(err.to_string(), "unauthenticated: User must be authenticated");
    }

    #[test]
    fn test_not_signed_in() {
        assert!(ClientError::NotSignedIn.is_unauthenticated());
        assert!(ClientError::decode("bad").kind().is_none());
    }
}

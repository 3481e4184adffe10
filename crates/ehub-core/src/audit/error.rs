// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Audit sink errors.

use thiserror::Error;

/// Failure of an [`AuditLogger`](super::AuditLogger).
#[derive(Debug, Error)]
pub enum AuditError {
    /// The sink refused or lost the entry.
    #[error("{logger} audit sink rejected entry: {reason}")]
    Rejected {
        /// Sink name.
        logger: String,
        /// Why the entry was not recorded.
        reason: String,
    },

    /// The sink does not retain entries.
    #[error("{logger} audit sink keeps no entries to query")]
    QueryNotSupported {
        /// Sink name.
        logger: String,
    },

    /// Entry details could not be encoded.
    #[error("audit details are not encodable: {0}")]
    Encode(#[from] serde_json::Error),
}

impl AuditError {
    /// Creates a rejected-entry error.
    pub fn rejected(logger: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            logger: logger.into(),
            reason: reason.into(),
        }
    }

    /// Creates a query not supported error.
    pub fn query_not_supported(logger: impl Into<String>) -> Self {
        Self::QueryNotSupported {
            logger: logger.into(),
        }
    }

    /// Short machine-readable tag for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Rejected { .. } => "rejected",
            Self::QueryNotSupported { .. } => "query_not_supported",
            Self::Encode(_) => "encode",
        }
    }
}

/// Result type for audit operations.
pub type AuditResult<T> = Result<T, AuditError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_sink() {
        let err = AuditError::rejected("file", "disk full");
        assert_eq!(err.to_string(), "file audit sink rejected entry: disk full");
        assert_eq!(err.kind(), "rejected");

        let err = AuditError::query_not_supported("tracing");
        assert_eq!(err.to_string(), "tracing audit sink keeps no entries to query");
        assert_eq!(err.kind(), "query_not_supported");
    }
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Audit trail for claims propagation and authorization decisions.
//!
//! # Components
//!
//! - [`AuditLogger`]: Core trait for audit logger implementations
//! - [`AuditLog`]: Structured entry
//! - [`InMemoryAuditLogger`]: Queryable buffer for tests and development
//! - [`TracingAuditLogger`]: Emits entries as `tracing` events
//! - [`NoOpAuditLogger`]: Discards everything
//!
//! Recording an entry never decides the outcome of the audited operation.
//! Callers use [`record`] which logs and swallows logger failures.

mod error;
mod memory_logger;
mod tracing_logger;
mod types;

pub use error::{AuditError, AuditResult};
pub use memory_logger::InMemoryAuditLogger;
pub use tracing_logger::TracingAuditLogger;
pub use types::{ActionResult, AuditAction, AuditFilter, AuditLog, AuditSeverity};

use async_trait::async_trait;

/// Destination of audit entries.
#[async_trait]
pub trait AuditLogger: Send + Sync {
    /// Records an entry.
    async fn log(&self, entry: AuditLog) -> AuditResult<()>;

    /// Queries recorded entries.
    ///
    /// Loggers without storage return [`AuditError::QueryNotSupported`] or an
    /// empty list.
    async fn query(&self, filter: AuditFilter) -> AuditResult<Vec<AuditLog>>;

    /// Flushes any buffered entries.
    async fn flush(&self) -> AuditResult<()>;

    /// Returns the logger name.
    fn name(&self) -> &str {
        "audit_logger"
    }

    /// Returns `true` if this logger supports querying.
    fn supports_query(&self) -> bool {
        false
    }
}

/// Records an entry, logging and discarding any logger failure.
pub async fn record(logger: &dyn AuditLogger, entry: AuditLog) {
    let action = entry.action;
    if let Err(e) = logger.log(entry).await {
        tracing::warn!(
            logger = logger.name(),
            action = %action,
            error = %e,
            error_kind = e.kind(),
            "Failed to record audit entry"
        );
    }
}

/// Audit logger that discards all entries.
#[derive(Debug, Default, Clone)]
pub struct NoOpAuditLogger;

impl NoOpAuditLogger {
    /// Creates a new no-op logger.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AuditLogger for NoOpAuditLogger {
    async fn log(&self, _entry: AuditLog) -> AuditResult<()> {
        Ok(())
    }

    async fn query(&self, _filter: AuditFilter) -> AuditResult<Vec<AuditLog>> {
        Ok(Vec::new())
    }

    async fn flush(&self) -> AuditResult<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "noop"
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenLogger;

    #[async_trait]
    impl AuditLogger for BrokenLogger {
        async fn log(&self, _entry: AuditLog) -> AuditResult<()> {
            Err(AuditError::rejected("broken", "sink unavailable"))
        }

        async fn query(&self, _filter: AuditFilter) -> AuditResult<Vec<AuditLog>> {
            Ok(Vec::new())
        }

        async fn flush(&self) -> AuditResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_noop_logger() {
        let logger = NoOpAuditLogger::new();
        assert!(logger.log(AuditLog::token_issued("u", None)).await.is_ok());
        assert!(logger.query(AuditFilter::default()).await.unwrap().is_empty());
        assert!(logger.flush().await.is_ok());
    }

    #[tokio::test]
    async fn test_record_swallows_failures() {
        record(&BrokenLogger, AuditLog::token_issued("u", None)).await;
    }

    #[tokio::test]
    async fn test_record_reaches_logger() {
        let logger = InMemoryAuditLogger::new();
        record(&logger, AuditLog::token_issued("a", None)).await;
        assert_eq!(logger.len(), 1);
        assert!(logger.supports_query());
    }
}

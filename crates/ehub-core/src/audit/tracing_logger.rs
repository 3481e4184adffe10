// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Audit logger that emits entries as `tracing` events.

use async_trait::async_trait;

use super::AuditLogger;
use super::error::{AuditError, AuditResult};
use super::types::{AuditFilter, AuditLog, AuditSeverity};

/// Writes each entry as a structured event on the `audit` target.
///
/// Pairs with the JSON log format for shipping the trail to a collector.
/// Queries are not supported.
#[derive(Debug, Default, Clone)]
pub struct TracingAuditLogger;

impl TracingAuditLogger {
    /// Creates a new logger.
    pub fn new() -> Self {
        Self
    }
}

/// Emits `$entry` at `$level`; `tracing` needs the level at compile time.
macro_rules! audit_event {
    ($level:ident, $entry:expr, $details:expr) => {
        tracing::$level!(
            target: "audit",
            id = %$entry.id,
            action = %$entry.action,
            result = $entry.result.as_str(),
            actor = $entry.actor.as_deref().unwrap_or("-"),
            subject = $entry.subject.as_deref().unwrap_or("-"),
            path = $entry.path.as_deref().unwrap_or("-"),
            details = %$details,
            "audit"
        )
    };
}

#[async_trait]
impl AuditLogger for TracingAuditLogger {
    async fn log(&self, entry: AuditLog) -> AuditResult<()> {
        let details = serde_json::to_string(&entry.details)?;
        match entry.severity {
            AuditSeverity::Info | AuditSeverity::Notice => audit_event!(info, entry, details),
            AuditSeverity::Warning => audit_event!(warn, entry, details),
            AuditSeverity::Error => audit_event!(error, entry, details),
        }
        Ok(())
    }

    async fn query(&self, _filter: AuditFilter) -> AuditResult<Vec<AuditLog>> {
        Err(AuditError::query_not_supported(self.name()))
    }

    async fn flush(&self) -> AuditResult<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "tracing"
    }
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Audit trail held in process memory.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::AuditLogger;
use super::error::AuditResult;
use super::types::{AuditAction, AuditFilter, AuditLog};

/// Ring buffer of audit entries.
///
/// Clones share the buffer: the propagator and the middleware write through
/// one handle while a test or an operator reads through another. A bounded
/// buffer evicts its oldest entry and counts it in [`evicted`](Self::evicted).
#[derive(Debug, Clone, Default)]
pub struct InMemoryAuditLogger {
    ring: Arc<Ring>,
}

#[derive(Debug, Default)]
struct Ring {
    entries: RwLock<VecDeque<AuditLog>>,
    bound: Option<usize>,
    evicted: AtomicU64,
}

impl InMemoryAuditLogger {
    /// Creates an unbounded logger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a logger keeping at most `bound` entries. A bound of zero
    /// means unbounded.
    pub fn bounded(bound: usize) -> Self {
        Self {
            ring: Arc::new(Ring {
                entries: RwLock::new(VecDeque::new()),
                bound: (bound > 0).then_some(bound),
                evicted: AtomicU64::new(0),
            }),
        }
    }

    /// Entries in the order they were recorded.
    pub fn entries(&self) -> Vec<AuditLog> {
        self.ring.entries.read().iter().cloned().collect()
    }

    /// Entries of one action.
    pub fn entries_for_action(&self, action: AuditAction) -> Vec<AuditLog> {
        self.ring
            .entries
            .read()
            .iter()
            .filter(|entry| entry.action == action)
            .cloned()
            .collect()
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.ring.entries.read().len()
    }

    /// Returns `true` if nothing is retained.
    pub fn is_empty(&self) -> bool {
        self.ring.entries.read().is_empty()
    }

    /// Number of entries dropped to stay within the bound.
    pub fn evicted(&self) -> u64 {
        self.ring.evicted.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl AuditLogger for InMemoryAuditLogger {
    async fn log(&self, entry: AuditLog) -> AuditResult<()> {
        let mut entries = self.ring.entries.write();
        if let Some(bound) = self.ring.bound {
            while entries.len() >= bound {
                entries.pop_front();
                self.ring.evicted.fetch_add(1, Ordering::Relaxed);
            }
        }
        entries.push_back(entry);
        Ok(())
    }

    async fn query(&self, filter: AuditFilter) -> AuditResult<Vec<AuditLog>> {
        let entries = self.ring.entries.read();
        let mut found: Vec<AuditLog> = entries
            .iter()
            .filter(|entry| filter.matches(entry))
            .cloned()
            .collect();
        drop(entries);

        // Entries are appended in arrival order, which can differ from
        // timestamp order under concurrent writers.
        found.sort_by_key(|entry| entry.timestamp);
        if filter.descending {
            found.reverse();
        }
        if let Some(limit) = filter.limit {
            found.truncate(limit);
        }
        Ok(found)
    }

    async fn flush(&self) -> AuditResult<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }

    fn supports_query(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::types::ActionResult;

    #[tokio::test]
    async fn test_records_in_order() {
        let logger = InMemoryAuditLogger::new();
        assert!(logger.is_empty());

        logger.log(AuditLog::token_issued("u-1", None)).await.unwrap();
        logger
            .log(AuditLog::claims_refresh("u-1", ActionResult::Success, None))
            .await
            .unwrap();

        let actions: Vec<_> = logger.entries().iter().map(|e| e.action).collect();
        assert_eq!(actions, vec![AuditAction::TokenIssued, AuditAction::ClaimsRefresh]);
        assert_eq!(logger.entries_for_action(AuditAction::TokenIssued).len(), 1);
    }

    #[tokio::test]
    async fn test_bound_evicts_oldest() {
        let logger = InMemoryAuditLogger::bounded(2);
        for uid in ["a", "b", "c"] {
            logger.log(AuditLog::token_issued(uid, None)).await.unwrap();
        }

        assert_eq!(logger.len(), 2);
        assert_eq!(logger.evicted(), 1);
        assert_eq!(logger.entries()[0].actor.as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn test_zero_bound_is_unbounded() {
        let logger = InMemoryAuditLogger::bounded(0);
        for _ in 0..50 {
            logger.log(AuditLog::token_issued("a", None)).await.unwrap();
        }
        assert_eq!(logger.len(), 50);
        assert_eq!(logger.evicted(), 0);
    }

    #[tokio::test]
    async fn test_query_filters_and_limits() {
        let logger = InMemoryAuditLogger::new();
        logger.log(AuditLog::token_issued("a", None)).await.unwrap();
        logger.log(AuditLog::token_issued("b", None)).await.unwrap();
        logger
            .log(AuditLog::claims_refresh("a", ActionResult::failure("x"), None))
            .await
            .unwrap();

        let for_a = logger.query(AuditFilter::new().actor("a")).await.unwrap();
        assert_eq!(for_a.len(), 2);

        let ok_for_a = logger
            .query(AuditFilter::new().actor("a").success_only())
            .await
            .unwrap();
        assert_eq!(ok_for_a.len(), 1);

        let newest = logger
            .query(AuditFilter::new().descending().limit(1))
            .await
            .unwrap();
        assert_eq!(newest.len(), 1);
    }

    #[tokio::test]
    async fn test_clones_share_ring() {
        let logger = InMemoryAuditLogger::bounded(1);
        let reader = logger.clone();
        logger.log(AuditLog::token_issued("a", None)).await.unwrap();
        logger.log(AuditLog::token_issued("b", None)).await.unwrap();
        assert_eq!(reader.len(), 1);
        assert_eq!(reader.evicted(), 1);
    }
}

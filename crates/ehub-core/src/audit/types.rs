// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Audit trail entry types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::capability::Capability;
use crate::claims::CustomClaims;

// =============================================================================
// Audit Log Entry
// =============================================================================

/// A single audit trail entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    /// Unique entry ID.
    pub id: Uuid,

    /// When the event occurred.
    pub timestamp: DateTime<Utc>,

    /// Severity level of the event.
    pub severity: AuditSeverity,

    /// The member who triggered the event, if authenticated.
    pub actor: Option<String>,

    /// The member whose claims or access the event concerns.
    pub subject: Option<String>,

    /// What happened.
    pub action: AuditAction,

    /// Additional structured details.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,

    /// The outcome.
    pub result: ActionResult,

    /// Request path, for HTTP-originated events.
    pub path: Option<String>,
}

impl AuditLog {
    /// Creates a new entry.
    pub fn new(action: AuditAction, result: ActionResult) -> Self {
        let severity = match result {
            ActionResult::Success => action.default_severity(),
            ActionResult::Failure { .. } => AuditSeverity::Error,
            ActionResult::Denied => AuditSeverity::Warning,
        };

        Self {
            id: Uuid::now_v7(),
            timestamp: Utc::now(),
            severity,
            actor: None,
            subject: None,
            action,
            details: serde_json::Value::Null,
            result,
            path: None,
        }
    }

    /// Sets the actor.
    pub fn with_actor(mut self, uid: impl Into<String>) -> Self {
        self.actor = Some(uid.into());
        self
    }

    /// Sets the subject.
    pub fn with_subject(mut self, uid: impl Into<String>) -> Self {
        self.subject = Some(uid.into());
        self
    }

    /// Sets the details.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }

    /// Sets the request path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the severity.
    pub fn with_severity(mut self, severity: AuditSeverity) -> Self {
        self.severity = severity;
        self
    }

    // =========================================================================
    // Factory methods
    // =========================================================================

    /// A member refreshed their own claims.
    pub fn claims_refresh(uid: &str, result: ActionResult, claims: Option<&CustomClaims>) -> Self {
        let mut log = Self::new(AuditAction::ClaimsRefresh, result)
            .with_actor(uid)
            .with_subject(uid);
        if let Some(claims) = claims {
            log = log.with_details(claims_details(claims));
        }
        log
    }

    /// Claims were synced for a member by a trusted path.
    pub fn claims_sync(
        actor: Option<&str>,
        subject: &str,
        result: ActionResult,
        claims: Option<&CustomClaims>,
    ) -> Self {
        let mut log = Self::new(AuditAction::ClaimsSync, result).with_subject(subject);
        if let Some(actor) = actor {
            log = log.with_actor(actor);
        }
        if let Some(claims) = claims {
            log = log.with_details(claims_details(claims));
        }
        log
    }

    /// An ID token was minted.
    pub fn token_issued(uid: &str, claims: Option<&CustomClaims>) -> Self {
        let details = match claims {
            Some(claims) => claims_details(claims),
            None => serde_json::json!({ "role": null }),
        };
        Self::new(AuditAction::TokenIssued, ActionResult::Success)
            .with_actor(uid)
            .with_subject(uid)
            .with_details(details)
    }

    /// A request was refused for lack of a capability.
    pub fn access_denied(uid: Option<&str>, path: &str, missing: &[Capability]) -> Self {
        let missing: Vec<&str> = missing.iter().map(|c| c.as_str()).collect();
        let mut log = Self::new(AuditAction::AccessDenied, ActionResult::Denied)
            .with_path(path)
            .with_details(serde_json::json!({ "missing": missing }));
        if let Some(uid) = uid {
            log = log.with_actor(uid);
        }
        log
    }
}

fn claims_details(claims: &CustomClaims) -> serde_json::Value {
    serde_json::json!({
        "role": claims.role.as_str(),
        "admin": claims.admin,
    })
}

// =============================================================================
// Audit Severity
// =============================================================================

/// Severity level for audit events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuditSeverity {
    /// Routine events.
    #[default]
    Info,
    /// Significant but expected events.
    Notice,
    /// Refusals and suspicious activity.
    Warning,
    /// Failures.
    Error,
}

impl AuditSeverity {
    /// Returns the severity as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditSeverity::Info => "info",
            AuditSeverity::Notice => "notice",
            AuditSeverity::Warning => "warning",
            AuditSeverity::Error => "error",
        }
    }
}

impl fmt::Display for AuditSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Audit Action
// =============================================================================

/// Auditable events of the access-control subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// A member refreshed their own claims.
    ClaimsRefresh,
    /// Claims were written for a member by a trusted path.
    ClaimsSync,
    /// An ID token was minted.
    TokenIssued,
    /// A request was refused by authorization.
    AccessDenied,
}

impl AuditAction {
    /// Returns the action as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::ClaimsRefresh => "claims_refresh",
            AuditAction::ClaimsSync => "claims_sync",
            AuditAction::TokenIssued => "token_issued",
            AuditAction::AccessDenied => "access_denied",
        }
    }

    /// Returns the default severity for a successful event.
    pub fn default_severity(&self) -> AuditSeverity {
        match self {
            AuditAction::ClaimsRefresh | AuditAction::TokenIssued => AuditSeverity::Info,
            AuditAction::ClaimsSync => AuditSeverity::Notice,
            AuditAction::AccessDenied => AuditSeverity::Warning,
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Action Result
// =============================================================================

/// Outcome of an audited event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ActionResult {
    /// Completed successfully.
    #[default]
    Success,
    /// Failed.
    Failure {
        /// Reason for failure.
        reason: String,
    },
    /// Refused by authorization.
    Denied,
}

impl ActionResult {
    /// Creates a failure result.
    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
        }
    }

    /// Returns `true` on success.
    pub fn is_success(&self) -> bool {
        matches!(self, ActionResult::Success)
    }

    /// Returns `true` if refused.
    pub fn is_denied(&self) -> bool {
        matches!(self, ActionResult::Denied)
    }

    /// Returns `true` on failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, ActionResult::Failure { .. })
    }

    /// Returns the status as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionResult::Success => "success",
            ActionResult::Failure { .. } => "failure",
            ActionResult::Denied => "denied",
        }
    }
}

// =============================================================================
// Audit Filter
// =============================================================================

/// Filter for querying the audit trail.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditFilter {
    /// Entries triggered by this member.
    pub actor: Option<String>,
    /// Entries concerning this member.
    pub subject: Option<String>,
    /// Entries of this action.
    pub action: Option<AuditAction>,
    /// Only successful entries.
    #[serde(default)]
    pub success_only: bool,
    /// Minimum severity.
    pub min_severity: Option<AuditSeverity>,
    /// Start time (inclusive).
    pub from: Option<DateTime<Utc>>,
    /// Maximum number of results.
    pub limit: Option<usize>,
    /// Newest first.
    #[serde(default)]
    pub descending: bool,
}

impl AuditFilter {
    /// Creates an empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters by actor.
    pub fn actor(mut self, uid: impl Into<String>) -> Self {
        self.actor = Some(uid.into());
        self
    }

    /// Filters by subject.
    pub fn subject(mut self, uid: impl Into<String>) -> Self {
        self.subject = Some(uid.into());
        self
    }

    /// Filters by action.
    pub fn action(mut self, action: AuditAction) -> Self {
        self.action = Some(action);
        self
    }

    /// Keeps successful entries only.
    pub fn success_only(mut self) -> Self {
        self.success_only = true;
        self
    }

    /// Filters by minimum severity.
    pub fn min_severity(mut self, severity: AuditSeverity) -> Self {
        self.min_severity = Some(severity);
        self
    }

    /// Sets the start time.
    pub fn since(mut self, from: DateTime<Utc>) -> Self {
        self.from = Some(from);
        self
    }

    /// Sets the limit.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Newest first.
    pub fn descending(mut self) -> Self {
        self.descending = true;
        self
    }

    /// Checks whether an entry matches.
    pub fn matches(&self, log: &AuditLog) -> bool {
        if self.actor.is_some() && log.actor != self.actor {
            return false;
        }
        if self.subject.is_some() && log.subject != self.subject {
            return false;
        }
        if self.action.is_some_and(|a| a != log.action) {
            return false;
        }
        if self.success_only && !log.result.is_success() {
            return false;
        }
        if self
            .min_severity
            .is_some_and(|s| log.severity < s)
        {
            return false;
        }
        if self.from.is_some_and(|from| log.timestamp < from) {
            return false;
        }
        true
    }
}

// =============================================================================
// Tests
// =============================================================================

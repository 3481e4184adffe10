// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Access guards evaluated against the claims cache.
//!
//! A guard maps a [`ClaimsSnapshot`] to a [`GuardDecision`]. Guards are pure;
//! [`GuardBinding`] re-evaluates one on every snapshot change and performs
//! the navigation it asks for.

use std::collections::HashSet;
use std::sync::Arc;

use ehub_config::AccessConfig;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::cache::ClaimsSnapshot;

// =============================================================================
// GuardDecision
// =============================================================================

/// What a guarded view should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Show a loading placeholder instead of the children.
    Placeholder,
    /// Render nothing.
    Blank,
    /// Navigate to the route and render nothing.
    Redirect(String),
    /// Render the guarded children.
    Render,
}

impl GuardDecision {
    /// Returns `true` if the guarded children may be rendered.
    pub fn renders_children(&self) -> bool {
        matches!(self, GuardDecision::Render)
    }

    /// Returns the navigation target, if any.
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            GuardDecision::Redirect(route) => Some(route),
            _ => None,
        }
    }
}

/// A rule deciding whether a view may render.
pub trait AccessGuard: Send + Sync {
    /// Evaluates the rule against a cache snapshot.
    fn evaluate(&self, snapshot: &ClaimsSnapshot) -> GuardDecision;
}

// =============================================================================
// Protected Guard
// =============================================================================

/// Admits any signed-in identity.
#[derive(Debug, Clone)]
pub struct ProtectedGuard {
    sign_in_route: String,
}

impl ProtectedGuard {
    /// Creates a guard redirecting signed-out visitors to `sign_in_route`.
    pub fn new(sign_in_route: impl Into<String>) -> Self {
        Self {
            sign_in_route: sign_in_route.into(),
        }
    }

    /// Creates a guard from the access configuration.
    pub fn from_config(config: &AccessConfig) -> Self {
        Self::new(&config.sign_in_route)
    }
}

impl AccessGuard for ProtectedGuard {
    fn evaluate(&self, snapshot: &ClaimsSnapshot) -> GuardDecision {
        if snapshot.loading {
            GuardDecision::Placeholder
        } else if snapshot.identity.is_none() {
            GuardDecision::Redirect(self.sign_in_route.clone())
        } else {
            GuardDecision::Render
        }
    }
}

// =============================================================================
// Admin Guard
// =============================================================================

/// Emails allowed past the admin guard.
///
/// Comparison ignores case and surrounding whitespace.
#[derive(Debug, Clone, Default)]
pub struct AdminAllowList {
    emails: HashSet<String>,
}

impl AdminAllowList {
    /// Creates an allow-list.
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            emails: emails
                .into_iter()
                .map(|e| normalize(e.as_ref()))
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    /// Returns `true` if the email is allow-listed.
    pub fn contains(&self, email: &str) -> bool {
        self.emails.contains(&normalize(email))
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.emails.len()
    }

    /// Returns `true` if nobody is allow-listed.
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

impl From<&AccessConfig> for AdminAllowList {
    fn from(config: &AccessConfig) -> Self {
        Self::new(&config.admin_emails)
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Admits signed-in identities whose email is allow-listed.
///
/// The decision rests on the allow-list alone, not on role claims.
#[derive(Debug, Clone)]
pub struct AdminGuard {
    allow_list: Arc<AdminAllowList>,
    default_route: String,
}

impl AdminGuard {
    /// Creates a guard redirecting everyone else to `default_route`.
    pub fn new(allow_list: Arc<AdminAllowList>, default_route: impl Into<String>) -> Self {
        Self {
            allow_list,
            default_route: default_route.into(),
        }
    }

    /// Creates a guard from the access configuration.
    pub fn from_config(config: &AccessConfig) -> Self {
        Self::new(Arc::new(AdminAllowList::from(config)), &config.default_route)
    }
}

impl AccessGuard for AdminGuard {
    fn evaluate(&self, snapshot: &ClaimsSnapshot) -> GuardDecision {
        if snapshot.loading {
            return GuardDecision::Blank;
        }
        let allowed = snapshot
            .identity
            .as_ref()
            .and_then(|identity| identity.email.as_deref())
            .is_some_and(|email| self.allow_list.contains(email));

        if allowed {
            GuardDecision::Render
        } else {
            GuardDecision::Redirect(self.default_route.clone())
        }
    }
}

// =============================================================================
// Binding
// =============================================================================

/// Performs navigation on behalf of a guard.
pub trait Navigator: Send + Sync {
    /// Navigates to `route`.
    fn navigate(&self, route: &str);
}

/// Keeps a guard's decision current as the cache changes.
pub struct GuardBinding {
    decisions: watch::Receiver<GuardDecision>,
    handle: JoinHandle<()>,
}

impl GuardBinding {
    /// Starts evaluating `guard` on every snapshot from `snapshots`.
    ///
    /// The navigator is called once per transition into a redirect, not on
    /// every re-evaluation that yields the same redirect.
    pub fn spawn(
        mut snapshots: watch::Receiver<ClaimsSnapshot>,
        guard: Arc<dyn AccessGuard>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let initial = guard.evaluate(&snapshots.borrow_and_update());
        if let Some(route) = initial.redirect_target() {
            navigator.navigate(route);
        }
        let (tx, decisions) = watch::channel(initial);

        let handle = tokio::spawn(async move {
            while snapshots.changed().await.is_ok() {
                let decision = guard.evaluate(&snapshots.borrow_and_update());
                let changed = tx.send_if_modified(|current| {
                    if *current == decision {
                        return false;
                    }
                    *current = decision.clone();
                    true
                });
                if changed {
                    if let Some(route) = decision.redirect_target() {
                        tracing::debug!(route = %route, "Guard redirect");
                        navigator.navigate(route);
                    }
                }
            }
        });

        Self { decisions, handle }
    }

    /// Returns the current decision.
    pub fn decision(&self) -> GuardDecision {
        self.decisions.borrow().clone()
    }

    /// Subscribes to decision changes.
    pub fn subscribe(&self) -> watch::Receiver<GuardDecision> {
        self.decisions.clone()
    }
}

impl Drop for GuardBinding {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// =============================================================================
// Tests
// =============================================================================

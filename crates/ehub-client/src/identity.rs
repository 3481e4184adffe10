// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The signed-in identity and its change feed.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// The identity of the signed-in member, as reported by the identity
/// provider's session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Identity uid.
    pub uid: String,
    /// Sign-in email.
    pub email: Option<String>,
}

impl Identity {
    /// Creates an identity without an email.
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: None,
        }
    }

    /// Sets the email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Where the identity provider's session stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// The provider has not yet said whether a session exists.
    #[default]
    Resolving,
    /// Nobody is signed in.
    SignedOut,
    /// A member is signed in.
    SignedIn(Identity),
}

impl SessionState {
    /// Returns the signed-in identity.
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::SignedIn(identity) => Some(identity),
            _ => None,
        }
    }

    /// Returns `true` once the provider has reported a session or its absence.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Resolving)
    }
}

/// Publishes the session state.
///
/// A new feed is [`SessionState::Resolving`] until the first sign-in or
/// sign-out. Subscribers observe the latest state; intermediate states
/// published in quick succession may be skipped.
#[derive(Debug, Clone)]
pub struct IdentityFeed {
    tx: watch::Sender<SessionState>,
}

impl IdentityFeed {
    /// Creates a feed whose session is not yet known.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionState::Resolving);
        Self { tx }
    }

    /// Publishes a sign-in.
    pub fn sign_in(&self, identity: Identity) {
        tracing::debug!(uid = %identity.uid, "Identity signed in");
        self.tx.send_replace(SessionState::SignedIn(identity));
    }

    /// Publishes a sign-out, or the absence of a restored session.
    pub fn sign_out(&self) {
        tracing::debug!("Identity signed out");
        self.tx.send_replace(SessionState::SignedOut);
    }

    /// Returns the current session state.
    pub fn state(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    /// Returns the signed-in identity.
    pub fn current(&self) -> Option<Identity> {
        self.tx.borrow().identity().cloned()
    }

    /// Subscribes to session changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }
}

impl Default for IdentityFeed {
    fn default() -> Self {
        Self::new()
    }
}

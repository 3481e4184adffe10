// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Harness
//!
//! [`TestHub`] wires seeded stores, an in-memory audit trail and the API
//! state together. [`TestServer`] serves that state on an ephemeral port for
//! tests that go through a real HTTP client.

use std::sync::Arc;

use axum::Router;
use ehub_api::{ApiConfig, ApiResult, ApiServer, AppState};
use ehub_client::HubClient;
use ehub_core::audit::InMemoryAuditLogger;
use ehub_core::store::{InMemoryIdentityStore, InMemoryUserStore};
use ehub_core::{CustomClaims, Role};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use super::fixtures::{ConfigFixtures, UserFixtures};

// =============================================================================
// TestHub
// =============================================================================

/// Seeded stores and API state for one test.
pub struct TestHub {
    /// Authoritative user records.
    pub users: InMemoryUserStore,
    /// Identity records carrying custom claims.
    pub identities: InMemoryIdentityStore,
    /// Audit trail.
    pub audit: InMemoryAuditLogger,
    state: AppState,
}

impl TestHub {
    /// Creates a hub seeded with [`UserFixtures::all`].
    pub fn new() -> Self {
        Self::with_config(ConfigFixtures::api_config())
    }

    /// Creates a hub with a custom API configuration.
    pub fn with_config(config: ApiConfig) -> Self {
        let records = UserFixtures::all();
        let identities = InMemoryIdentityStore::from_users(records.iter());
        let users = InMemoryUserStore::with_users(records);
        let audit = InMemoryAuditLogger::new();

        let state = AppState::builder()
            .config(config)
            .user_store(Arc::new(users.clone()))
            .identity_store(Arc::new(identities.clone()))
            .audit_logger(Arc::new(audit.clone()))
            .build()
            .expect("fixture configuration is valid");

        Self {
            users,
            identities,
            audit,
            state,
        }
    }

    /// Returns the API state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Returns a server over this hub's state.
    pub fn server(&self) -> ApiServer {
        ApiServer::new(self.state.clone())
    }

    /// Returns the full router.
    pub fn router(&self) -> Router {
        self.server().router()
    }

    /// Signs an ID token for `uid` carrying `role` claims, or none.
    pub fn token(&self, uid: &str, role: Option<Role>) -> String {
        let jwt = self.state.jwt();
        let mut claims = jwt.claims_for(uid).with_email(UserFixtures::email(uid));
        if let Some(role) = role {
            claims = claims.with_custom_claims(&CustomClaims::for_role(role));
        }
        jwt.create_token(&claims).expect("signing with the fixture secret")
    }

    /// Returns an `Authorization` header value for [`TestHub::token`].
    pub fn bearer(&self, uid: &str, role: Option<Role>) -> String {
        format!("Bearer {}", self.token(uid, role))
    }

    /// Serves this hub on an ephemeral local port.
    pub async fn spawn(&self) -> TestServer {
        TestServer::start(self.server()).await
    }
}

impl Default for TestHub {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TestServer
// =============================================================================

/// A live API server on `127.0.0.1`, stopped on drop.
pub struct TestServer {
    base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<ApiResult<()>>>,
}

impl TestServer {
    /// Binds an ephemeral port and starts serving.
    pub async fn start(server: ApiServer) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local address");
        let (tx, rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(server.serve(listener, async move {
            let _ = rx.await;
        }));

        Self {
            base_url: format!("http://{}", addr),
            shutdown: Some(tx),
            handle: Some(handle),
        }
    }

    /// Returns the server's base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns a client signed in with `id_token`.
    pub fn client(&self, id_token: impl Into<String>) -> HubClient {
        HubClient::new(&self.base_url)
            .expect("build HTTP client")
            .with_id_token(id_token)
    }

    /// Stops the server and waits for it to finish.
    pub async fn stop(mut self) -> ApiResult<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        match self.handle.take() {
            Some(handle) => handle.await.expect("server task panicked"),
            None => Ok(()),
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

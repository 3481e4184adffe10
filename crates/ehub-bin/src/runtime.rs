// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Server runtime orchestration.
//!
//! - Configuration loading and validation
//! - Store seeding and audit sink selection
//! - API server with authentication and capability middleware
//! - Graceful shutdown coordination

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use ehub_api::{ApiConfig, ApiServer, AppState};
use ehub_config::{AuditSink, ConfigLoader, HubConfig};
use ehub_core::audit::{AuditLogger, InMemoryAuditLogger, NoOpAuditLogger, TracingAuditLogger};
use ehub_core::store::{InMemoryIdentityStore, InMemoryUserStore};
use tracing::{info, warn};

use crate::error::{BinError, BinResult};
use crate::shutdown::ShutdownCoordinator;

// =============================================================================
// HubRuntime
// =============================================================================

/// Runs the API server for a loaded configuration.
#[derive(Debug)]
pub struct HubRuntime {
    config: Arc<HubConfig>,
    shutdown: ShutdownCoordinator,
}

impl HubRuntime {
    /// Creates a runtime for a validated configuration.
    pub fn new(config: HubConfig) -> Self {
        Self {
            config: Arc::new(config),
            shutdown: ShutdownCoordinator::new(),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    /// Returns the shutdown coordinator.
    pub fn shutdown(&self) -> &ShutdownCoordinator {
        &self.shutdown
    }

    /// Builds the application state: seeded stores, audit sink and token
    /// signing.
    pub fn app_state(&self) -> BinResult<AppState> {
        let records = self.config.user_records();
        let identities = InMemoryIdentityStore::from_users(records.iter());
        let users = InMemoryUserStore::with_users(records);

        AppState::builder()
            .config(ApiConfig::from(self.config.as_ref()))
            .user_store(Arc::new(users))
            .identity_store(Arc::new(identities))
            .audit_logger(self.create_audit_logger())
            .build()
            .map_err(|e| BinError::startup(e.to_string()))
    }

    /// Creates the audit logger selected by configuration.
    fn create_audit_logger(&self) -> Arc<dyn AuditLogger> {
        let audit = &self.config.security.audit;
        match audit.sink {
            AuditSink::Tracing => Arc::new(TracingAuditLogger::new()),
            AuditSink::Memory => {
                warn!(
                    capacity = audit.memory_capacity,
                    "Audit entries are kept in memory and lost on restart"
                );
                Arc::new(InMemoryAuditLogger::bounded(audit.memory_capacity))
            }
            AuditSink::None => {
                info!("Audit logging disabled");
                Arc::new(NoOpAuditLogger::new())
            }
        }
    }

    /// Serves until an OS signal or a manual shutdown request.
    pub async fn run(self) -> BinResult<()> {
        info!("Starting ElectricianHub access control v{}", ehub_core::VERSION);

        let state = self.app_state()?;
        let audit = state.audit().clone();
        info!(
            users = self.config.users.len(),
            admin_emails = self.config.access.admin_emails.len(),
            audit = audit.name(),
            "Components initialized"
        );

        let signals = tokio::spawn({
            let shutdown = self.shutdown.clone();
            async move { shutdown.listen_for_signals().await }
        });

        let result = ApiServer::new(state)
            .run_with_shutdown(self.shutdown.shutdown_signal())
            .await;

        // The server may have failed on its own; stop the signal listener too.
        self.shutdown.initiate_shutdown();
        signals.abort();

        if let Err(e) = audit
            .flush()
            .await
            .with_context(|| format!("flushing {} audit log", audit.name()))
        {
            warn!(error = format!("{:#}", e), "Audit entries may be lost");
        }
        info!("Shutdown complete");

        result.map_err(BinError::from)
    }
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for constructing the runtime.
#[derive(Default)]
pub struct RuntimeBuilder {
    config_path: Option<PathBuf>,
    config: Option<HubConfig>,
    loader: Option<ConfigLoader>,
}

impl RuntimeBuilder {
    /// Creates a new runtime builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration file path.
    pub fn config_path(mut self, path: impl AsRef<Path>) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the configuration directly. It is validated on build.
    pub fn config(mut self, config: HubConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Uses a custom loader for the configuration file.
    pub fn loader(mut self, loader: ConfigLoader) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Builds the runtime.
    pub fn build(self) -> BinResult<HubRuntime> {
        let config = match self.config {
            Some(config) => {
                config.validate()?;
                config
            }
            None => {
                let path = self
                    .config_path
                    .ok_or_else(|| BinError::config("No configuration provided"))?;
                let loader = self.loader.unwrap_or_default();
                loader.load(&path).map_err(|e| {
                    BinError::from(e).with_context(format!("Failed to load {}", path.display()))
                })?
            }
        };

        Ok(HubRuntime::new(config))
    }
}

// =============================================================================
// Tests
// =============================================================================

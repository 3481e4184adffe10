// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Graceful shutdown coordination.
//!
//! OS signals (SIGTERM, SIGINT, SIGQUIT on Unix, Ctrl+C elsewhere) and
//! manual requests both end in [`ShutdownCoordinator::initiate_shutdown`].

use std::future::Future;

use tokio::sync::watch;
use tracing::{info, warn};

// =============================================================================
// ShutdownCoordinator
// =============================================================================

/// Coordinates graceful shutdown across components.
///
/// # Example
///
/// ```ignore
/// use ehub_bin::shutdown::ShutdownCoordinator;
///
/// let coordinator = ShutdownCoordinator::new();
/// tokio::spawn({
///     let coordinator = coordinator.clone();
///     async move { coordinator.listen_for_signals().await }
/// });
/// server.run_with_shutdown(coordinator.shutdown_signal()).await?;
/// ```
#[derive(Clone)]
pub struct ShutdownCoordinator {
    sender: watch::Sender<bool>,
}

impl ShutdownCoordinator {
    /// Creates a new shutdown coordinator.
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self { sender }
    }

    /// Returns a future that resolves once shutdown is initiated.
    ///
    /// Resolves immediately if shutdown already happened.
    pub fn shutdown_signal(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut receiver = self.sender.subscribe();
        async move {
            // An Err means every sender is gone, which also ends the wait.
            let _ = receiver.wait_for(|initiated| *initiated).await;
        }
    }

    /// Initiates shutdown. Subsequent calls do nothing.
    pub fn initiate_shutdown(&self) {
        let first = self.sender.send_if_modified(|initiated| {
            if *initiated {
                return false;
            }
            *initiated = true;
            true
        });
        if first {
            info!("Shutdown initiated");
        }
    }

    /// Returns true if shutdown has been initiated.
    pub fn is_shutdown_initiated(&self) -> bool {
        *self.sender.borrow()
    }

    /// Waits for an OS signal or a manual request, then initiates shutdown.
    pub async fn listen_for_signals(&self) {
        tokio::select! {
            _ = os_signal() => {}
            _ = self.shutdown_signal() => return,
        }
        self.initiate_shutdown();
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ShutdownCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShutdownCoordinator")
            .field("initiated", &self.is_shutdown_initiated())
            .finish()
    }
}

// =============================================================================
// Signals
// =============================================================================

#[cfg(unix)]
async fn os_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    let (mut sigterm, mut sigquit) = match (
        signal(SignalKind::terminate()),
        signal(SignalKind::quit()),
    ) {
        (Ok(term), Ok(quit)) => (term, quit),
        (Err(e), _) | (_, Err(e)) => {
            warn!(error = %e, "Failed to register signal handlers, falling back to Ctrl+C");
            ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => info!("Received SIGTERM"),
        _ = sigquit.recv() => info!("Received SIGQUIT"),
        _ = ctrl_c() => {}
    }
}

#[cfg(not(unix))]
async fn os_signal() {
    ctrl_c().await;
}

async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received SIGINT"),
        Err(e) => {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

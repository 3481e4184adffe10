// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The slice of [`HubConfig`] the API server needs.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use ehub_config::{CorsConfig, HubConfig, JwtConfig};

/// Listener, CORS and token settings for [`ApiServer`](crate::ApiServer).
///
/// Defaults are those of an empty [`HubConfig`], except that no signing
/// secret is set.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Bind address.
    pub host: IpAddr,
    /// Listen port; 0 picks an ephemeral port.
    pub port: u16,
    /// CORS policy.
    pub cors: CorsConfig,
    /// ID token signing and verification.
    pub jwt: JwtConfig,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl ApiConfig {
    /// Address the listener binds.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from(&HubConfig::default())
    }
}

impl From<&HubConfig> for ApiConfig {
    fn from(config: &HubConfig) -> Self {
        let server = &config.server;
        Self {
            host: server.bind_address,
            port: server.port,
            cors: server.cors.clone(),
            jwt: config.security.jwt.clone(),
            request_timeout: server.request_timeout(),
        }
    }
}

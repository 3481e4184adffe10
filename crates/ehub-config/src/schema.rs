// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration schema definitions.
//!
//! The configuration is organized into the following sections:
//!
//! - `server` - HTTP listener, timeouts and CORS
//! - `security` - ID token signing and audit trail
//! - `access` - Admin allow-list and guard routes
//! - `users` - Seed records for the in-memory stores
//! - `logging` - Log level and format

use std::collections::HashSet;
use std::str::FromStr;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use ehub_core::{Role, UserRecord};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// Constants
// =============================================================================

/// Default API port.
pub const DEFAULT_API_PORT: u16 = 8080;

/// Default ID token lifetime in seconds (1 hour).
pub const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 3600;

/// Minimum length of an HMAC signing secret.
pub const MIN_SECRET_LEN: usize = 32;

// =============================================================================
// Top-Level Configuration
// =============================================================================

/// The root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HubConfig {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Security configuration.
    #[serde(default)]
    pub security: SecurityConfig,

    /// Access guard configuration.
    #[serde(default)]
    pub access: AccessConfig,

    /// Seed user records.
    #[serde(default)]
    pub users: Vec<UserSeed>,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl HubConfig {
    /// Validates the entire configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.server.validate()?;
        self.security.validate()?;
        self.access.validate()?;

        let mut uids = HashSet::new();
        for user in &self.users {
            if !uids.insert(user.uid.as_str()) {
                return Err(ConfigError::duplicate_user(&user.uid));
            }
            user.validate()?;
        }

        Ok(())
    }

    /// Returns the seed users as user records.
    pub fn user_records(&self) -> Vec<UserRecord> {
        self.users.iter().map(UserSeed::to_record).collect()
    }

    /// Returns a seed user by uid.
    pub fn get_user(&self, uid: &str) -> Option<&UserSeed> {
        self.users.iter().find(|u| u.uid == uid)
    }
}

// =============================================================================
// Server Configuration
// =============================================================================

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_bind_address")]
    pub bind_address: IpAddr,

    /// Listen port.
    #[serde(default = "default_api_port")]
    pub port: u16,

    /// Request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// CORS configuration.
    #[serde(default)]
    pub cors: CorsConfig,
}

fn default_bind_address() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0))
}

fn default_api_port() -> u16 {
    DEFAULT_API_PORT
}

fn default_request_timeout() -> u64 {
    30
}

impl ServerConfig {
    /// Validates the server configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::validation(
                "server.request_timeout_secs",
                "cannot be zero",
            ));
        }
        Ok(())
    }

    /// Returns the request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Returns the socket address.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: DEFAULT_API_PORT,
            request_timeout_secs: default_request_timeout(),
            cors: CorsConfig::default(),
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins (use "*" for all). Empty disables CORS headers.
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Allow credentials.
    #[serde(default)]
    pub allow_credentials: bool,
}

// =============================================================================
// Security Configuration
// =============================================================================

/// Security configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecurityConfig {
    /// ID token configuration.
    #[serde(default)]
    pub jwt: JwtConfig,

    /// Audit trail configuration.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl SecurityConfig {
    /// Validates the security configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.jwt.validate()
    }
}

/// ID token signing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JwtConfig {
    /// HMAC signing secret.
    #[serde(default)]
    pub secret: Option<SecretValue>,

    /// Token issuer (`iss`).
    #[serde(default = "default_jwt_issuer")]
    pub issuer: String,

    /// Token audience (`aud`).
    #[serde(default = "default_jwt_audience")]
    pub audience: String,

    /// Token lifetime in seconds.
    #[serde(default = "default_token_lifetime")]
    pub lifetime_secs: u64,

    /// Clock skew tolerance in seconds.
    #[serde(default = "default_leeway")]
    pub leeway_secs: u64,

    /// Signing algorithm.
    #[serde(default)]
    pub algorithm: JwtAlgorithm,

    /// Paths that don't require authentication.
    #[serde(default = "default_public_paths")]
    pub public_paths: Vec<String>,
}

fn default_jwt_issuer() -> String {
    "electricianhub".to_string()
}

fn default_jwt_audience() -> String {
    "electricianhub-web".to_string()
}

fn default_token_lifetime() -> u64 {
    DEFAULT_TOKEN_LIFETIME_SECS
}

fn default_leeway() -> u64 {
    30
}

fn default_public_paths() -> Vec<String> {
    vec!["/health".to_string(), "/ready".to_string()]
}

impl JwtConfig {
    /// Validates the JWT configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        match &self.secret {
            None => {
                return Err(ConfigError::validation(
                    "security.jwt.secret",
                    "a signing secret is required",
                ));
            }
            Some(secret) if secret.raw().len() < MIN_SECRET_LEN => {
                return Err(ConfigError::validation(
                    "security.jwt.secret",
                    format!("must be at least {} characters", MIN_SECRET_LEN),
                ));
            }
            Some(_) => {}
        }
        if self.lifetime_secs == 0 {
            return Err(ConfigError::validation(
                "security.jwt.lifetime_secs",
                "cannot be zero",
            ));
        }
        if self.issuer.trim().is_empty() {
            return Err(ConfigError::validation("security.jwt.issuer", "cannot be empty"));
        }
        if self.audience.trim().is_empty() {
            return Err(ConfigError::validation("security.jwt.audience", "cannot be empty"));
        }
        Ok(())
    }

    /// Returns the token lifetime as a Duration.
    pub fn lifetime(&self) -> Duration {
        Duration::from_secs(self.lifetime_secs)
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: None,
            issuer: default_jwt_issuer(),
            audience: default_jwt_audience(),
            lifetime_secs: DEFAULT_TOKEN_LIFETIME_SECS,
            leeway_secs: default_leeway(),
            algorithm: JwtAlgorithm::default(),
            public_paths: default_public_paths(),
        }
    }
}

/// JWT signing algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JwtAlgorithm {
    /// HMAC using SHA-256.
    #[default]
    HS256,
    /// HMAC using SHA-384.
    HS384,
    /// HMAC using SHA-512.
    HS512,
}

/// Audit trail configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Where audit entries go.
    #[serde(default)]
    pub sink: AuditSink,

    /// Entries kept by the `memory` sink before the oldest is dropped.
    /// Zero keeps everything.
    #[serde(default = "default_memory_capacity")]
    pub memory_capacity: usize,
}

fn default_memory_capacity() -> usize {
    10_000
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            sink: AuditSink::Tracing,
            memory_capacity: default_memory_capacity(),
        }
    }
}

/// Audit trail destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditSink {
    /// Structured `tracing` events on the `audit` target.
    #[default]
    Tracing,
    /// In-process buffer.
    Memory,
    /// Disabled.
    None,
}

// =============================================================================
// Access Configuration
// =============================================================================

/// Access guard configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccessConfig {
    /// Emails allowed past the admin guard.
    #[serde(default)]
    pub admin_emails: Vec<String>,

    /// Where the protected guard sends signed-out visitors.
    #[serde(default = "default_sign_in_route")]
    pub sign_in_route: String,

    /// Where the admin guard sends everyone it refuses.
    #[serde(default = "default_route")]
    pub default_route: String,
}

fn default_sign_in_route() -> String {
    "/login".to_string()
}

fn default_route() -> String {
    "/dashboard".to_string()
}

impl AccessConfig {
    /// Validates the access configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        for (i, email) in self.admin_emails.iter().enumerate() {
            if !email.contains('@') {
                return Err(ConfigError::validation(
                    format!("access.admin_emails[{}]", i),
                    format!("'{}' is not an email address", email),
                ));
            }
        }
        for (field, route) in [
            ("access.sign_in_route", &self.sign_in_route),
            ("access.default_route", &self.default_route),
        ] {
            if !route.starts_with('/') {
                return Err(ConfigError::validation(field, "must start with '/'"));
            }
        }
        Ok(())
    }
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            admin_emails: Vec::new(),
            sign_in_route: default_sign_in_route(),
            default_route: default_route(),
        }
    }
}

// =============================================================================
// Seed Users
// =============================================================================

/// A user record seeded into the in-memory stores at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserSeed {
    /// Identity ID.
    pub uid: String,

    /// Sign-in email.
    pub email: String,

    /// Display name.
    #[serde(default)]
    pub display_name: Option<String>,

    /// Assigned role.
    #[serde(default)]
    pub role: Role,
}

impl UserSeed {
    /// Validates the seed.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.uid.trim().is_empty() {
            return Err(ConfigError::validation("users[].uid", "cannot be empty"));
        }
        if !self.email.contains('@') {
            return Err(ConfigError::validation(
                format!("users[{}].email", self.uid),
                "is not an email address",
            ));
        }
        Ok(())
    }

    /// Converts the seed into a user record.
    pub fn to_record(&self) -> UserRecord {
        let record = UserRecord::new(&self.uid, &self.email, self.role);
        match &self.display_name {
            Some(name) => record.with_display_name(name),
            None => record,
        }
    }
}

// =============================================================================
// Logging Configuration
// =============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Log format.
    #[serde(default)]
    pub format: LogFormat,
}

/// Verbosity, from most to least chatty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Everything, including per-request spans.
    Trace,
    /// Claims resolution and guard decisions.
    Debug,
    /// Startup, shutdown and audit events.
    #[default]
    Info,
    /// Degraded operation.
    Warn,
    /// Failures only.
    Error,
}

impl LogLevel {
    /// The level as an `EnvFilter` directive.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    /// Case-insensitive; `warning` is accepted for `warn`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Ok(match raw.to_ascii_lowercase().as_str() {
            "trace" => Self::Trace,
            "debug" => Self::Debug,
            "info" => Self::Info,
            "warn" | "warning" => Self::Warn,
            "error" => Self::Error,
            _ => {
                return Err(format!(
                    "unknown log level '{}' (expected trace, debug, info, warn or error)",
                    raw
                ));
            }
        })
    }
}

/// Shape of log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON for log aggregation.
    Json,
    /// Minimal single-line output.
    Compact,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            _ => Err(format!(
                "unknown log format '{}' (expected text, json or compact)",
                raw
            )),
        }
    }
}

// =============================================================================
// Secret Value
// =============================================================================

/// A secret string that never prints its contents.
#[derive(Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretValue(String);

impl SecretValue {
    /// Creates a new secret value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw value.
    pub fn raw(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretValue(***)")
    }
}

impl std::fmt::Display for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "***")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> HubConfig {
        let mut config = HubConfig::default();
        config.security.jwt.secret = Some(SecretValue::new("a".repeat(MIN_SECRET_LEN)));
        config
    }

    #[test]
    fn test_hub_config_default() {
        let config = HubConfig::default();
        assert_eq!(config.server.port, DEFAULT_API_PORT);
        assert_eq!(config.access.sign_in_route, "/login");
        assert_eq!(config.access.default_route, "/dashboard");
        assert_eq!(config.security.audit.sink, AuditSink::Tracing);
        assert!(config.users.is_empty());
    }

    #[test]
    fn test_jwt_secret_required() {
        let config = HubConfig::default();
        assert!(config.validate().is_err());
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_jwt_secret_too_short() {
        let mut config = valid_config();
        config.security.jwt.secret = Some(SecretValue::new("short"));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("security.jwt.secret"));
    }

    #[test]
    fn test_duplicate_seed_uid() {
        let mut config = valid_config();
        let seed = UserSeed {
            uid: "u-1".to_string(),
            email: "a@hub.test".to_string(),
            display_name: None,
            role: Role::Engineer,
        };
        config.users = vec![seed.clone(), seed];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateUser { .. })
        ));
    }

    #[test]
    fn test_invalid_admin_email() {
        let mut config = valid_config();
        config.access.admin_emails = vec!["not-an-email".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_route_must_be_absolute() {
        let mut config = valid_config();
        config.access.sign_in_route = "login".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_seed_to_record() {
        let seed = UserSeed {
            uid: "u-1".to_string(),
            email: "a@hub.test".to_string(),
            display_name: Some("Ada".to_string()),
            role: Role::Company,
        };
        let record = seed.to_record();
        assert_eq!(record.role, Role::Company);
        assert_eq!(record.display_name.as_deref(), Some("Ada"));
    }

    #[test]
    fn test_secret_value_is_masked() {
        let secret = SecretValue::new("super-secret");
        assert_eq!(secret.to_string(), "***");
        assert!(!format!("{:?}", secret).contains("super-secret"));
        assert_eq!(secret.raw(), "super-secret");
    }

    #[test]
    fn test_log_level_from_str() {
        assert_eq!("WARNING".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert_eq!("debug".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert!("loud".parse::<LogLevel>().unwrap_err().contains("'loud'"));
        assert!(LogLevel::Trace < LogLevel::Error);
    }

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert!("xml".parse::<LogFormat>().is_err());
    }
}

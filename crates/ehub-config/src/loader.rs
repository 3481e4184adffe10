// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration loading.
//!
//! # Loading Pipeline
//!
//! 1. Read the file
//! 2. Resolve `${VAR}` / `${VAR:default}` placeholders
//! 3. Parse YAML, TOML or JSON
//! 4. Apply environment variable overrides
//! 5. Validate
//!
//! # Environment Variable Override
//!
//! ```text
//! EHUB_SERVER_PORT=9090
//! EHUB_JWT_SECRET=...
//! EHUB_LOG_LEVEL=debug
//! EHUB_ADMIN_EMAILS=ops@hub.test,root@hub.test
//! ```

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::schema::{HubConfig, LogLevel, SecretValue};

// =============================================================================
// ConfigLoader
// =============================================================================

/// Configuration loader.
///
/// # Examples
///
/// ```no_run
/// use ehub_config::loader::ConfigLoader;
///
/// let config = ConfigLoader::new().load("ehub.yaml").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Environment variable prefix.
    env_prefix: String,

    /// Whether to resolve placeholders and apply overrides.
    resolve_env_vars: bool,

    /// Where variables are read from.
    env: EnvSource,
}

#[derive(Debug, Clone)]
enum EnvSource {
    Process,
    Fixed(HashMap<String, String>),
}

impl EnvSource {
    fn get(&self, name: &str) -> Option<String> {
        match self {
            EnvSource::Process => env::var(name).ok(),
            EnvSource::Fixed(vars) => vars.get(name).cloned(),
        }
    }
}

impl ConfigLoader {
    /// Creates a loader reading the process environment.
    pub fn new() -> Self {
        Self {
            env_prefix: "EHUB".to_string(),
            resolve_env_vars: true,
            env: EnvSource::Process,
        }
    }

    /// Sets the environment variable prefix.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Enables or disables environment variable resolution.
    pub fn with_env_vars(mut self, enabled: bool) -> Self {
        self.resolve_env_vars = enabled;
        self
    }

    /// Reads variables from a fixed map instead of the process environment.
    pub fn with_env_map<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env = EnvSource::Fixed(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Loads configuration from a file.
    ///
    /// The format is determined by the extension: `.yaml`/`.yml`, `.toml`
    /// or `.json`.
    pub fn load(&self, path: impl AsRef<Path>) -> ConfigResult<HubConfig> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        let content = self.read_file(path)?;
        let format = ConfigFormat::from_path(path)?;
        let config = self
            .load_from_str(&content, format)
            .map_err(|e| e.in_file(path))?;

        info!("Configuration loaded successfully");
        debug!(
            users = config.users.len(),
            admin_emails = config.access.admin_emails.len(),
            "Configuration summary"
        );
        Ok(config)
    }

    /// Loads configuration from a string.
    pub fn load_from_str(&self, content: &str, format: ConfigFormat) -> ConfigResult<HubConfig> {
        let content = if self.resolve_env_vars {
            self.resolve_env_placeholders(content)
        } else {
            content.to_string()
        };

        let mut config: HubConfig = parse_str(&content, format)?;

        if self.resolve_env_vars {
            self.apply_env_overrides(&mut config)?;
        }

        config.validate()?;
        Ok(config)
    }

    fn read_file(&self, path: &Path) -> ConfigResult<String> {
        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }
        fs::read_to_string(path).map_err(|e| ConfigError::unreadable(path, e))
    }

    /// Resolves `${VAR_NAME}` and `${VAR_NAME:default}` placeholders.
    ///
    /// An unset variable without a default is left as written.
    fn resolve_env_placeholders(&self, content: &str) -> String {
        let mut result = String::with_capacity(content.len());
        let mut chars = content.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '$' || chars.peek() != Some(&'{') {
                result.push(c);
                continue;
            }
            chars.next();

            let mut var_content = String::new();
            let mut found_close = false;
            for c in chars.by_ref() {
                if c == '}' {
                    found_close = true;
                    break;
                }
                var_content.push(c);
            }

            if !found_close {
                result.push_str("${");
                result.push_str(&var_content);
                continue;
            }

            let (var_name, default_value) = match var_content.split_once(':') {
                Some((name, default)) => (name, Some(default)),
                None => (var_content.as_str(), None),
            };

            match (self.env.get(var_name), default_value) {
                (Some(value), _) => result.push_str(&value),
                (None, Some(default)) => result.push_str(default),
                (None, None) => {
                    warn!("Environment variable '{}' not found", var_name);
                    result.push_str(&format!("${{{}}}", var_name));
                }
            }
        }

        result
    }

    fn apply_env_overrides(&self, config: &mut HubConfig) -> ConfigResult<()> {
        let var = |suffix: &str| format!("{}_{}", self.env_prefix, suffix);

        let name = var("SERVER_PORT");
        if let Some(value) = self.env.get(&name) {
            config.server.port = value
                .parse()
                .map_err(|_| ConfigError::invalid_env_var(&name, "expected valid port number"))?;
        }

        if let Some(value) = self.env.get(&var("JWT_SECRET")) {
            config.security.jwt.secret = Some(SecretValue::new(value));
        }

        let name = var("LOG_LEVEL");
        if let Some(value) = self.env.get(&name) {
            config.logging.level = value
                .parse::<LogLevel>()
                .map_err(|message| ConfigError::invalid_env_var(&name, message))?;
        }

        if let Some(value) = self.env.get(&var("ADMIN_EMAILS")) {
            config.access.admin_emails = value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }

        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// ConfigFormat
// =============================================================================

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format.
    Yaml,
    /// TOML format.
    Toml,
    /// JSON format.
    Json,
}

impl ConfigFormat {
    /// Determines the format from a file path.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            Some(other) => Err(ConfigError::unsupported_format(other)),
            None => Err(ConfigError::unsupported_format("(no extension)")),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_str<T: DeserializeOwned>(content: &str, format: ConfigFormat) -> ConfigResult<T> {
    match format {
        ConfigFormat::Yaml => yaml_parse(content),
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| ConfigError::malformed("toml", e))
        }
        ConfigFormat::Json => {
            serde_json::from_str(content).map_err(|e| ConfigError::malformed("json", e))
        }
    }
}

fn yaml_parse<T: DeserializeOwned>(content: &str) -> ConfigResult<T> {
    config::Config::builder()
        .add_source(config::File::from_str(content, config::FileFormat::Yaml))
        .build()
        .and_then(|c| c.try_deserialize::<T>())
        .map_err(|e| ConfigError::malformed("yaml", e))
}

/// Loads configuration from a file with default settings.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<HubConfig> {
    ConfigLoader::new().load(path)
}

// =============================================================================
// Tests
// =============================================================================

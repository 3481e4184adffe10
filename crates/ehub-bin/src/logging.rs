// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Global `tracing` subscriber setup.

use std::io::IsTerminal;

use ehub_config::{LogFormat, LogLevel};
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::cli::LogSettings;
use crate::error::{BinError, BinResult};

/// Dependency targets capped regardless of the chosen level.
const QUIET_DIRECTIVES: &[&str] = &["hyper=warn", "tower=warn", "reqwest=warn", "axum=info"];

/// Installs the global subscriber.
///
/// `RUST_LOG` replaces the configured level when set. Fails if a subscriber
/// is already installed.
///
/// ```ignore
/// use ehub_bin::cli::LogSettings;
/// use ehub_config::{LogFormat, LogLevel};
///
/// ehub_bin::logging::init_logging(LogSettings {
///     level: LogLevel::Info,
///     format: LogFormat::Json,
/// })?;
/// ```
pub fn init_logging(settings: LogSettings) -> BinResult<()> {
    let ansi = std::io::stdout().is_terminal();

    let output: Box<dyn Layer<Registry> + Send + Sync> = match settings.format {
        LogFormat::Text => fmt::layer().with_ansi(ansi).boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(false)
            .with_ansi(ansi)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(output.with_filter(build_filter(settings.level)))
        .try_init()
        .map_err(|e| BinError::startup(format!("Failed to install logger: {}", e)))
}

/// Filter for `level`, or for `RUST_LOG` when set, with dependency noise capped.
pub fn build_filter(level: LogLevel) -> EnvFilter {
    let base = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    QUIET_DIRECTIVES
        .iter()
        .filter_map(|d| d.parse().ok())
        .fold(base, EnvFilter::add_directive)
}

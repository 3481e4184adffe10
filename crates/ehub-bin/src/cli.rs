// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! - `run`: Start the API server (default)
//! - `validate`: Validate the configuration file
//! - `version`: Show version information
//! - `roles`: Print the role capability table
//! - `token`: Mint a development ID token for a seeded user

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};
use ehub_config::{LogFormat, LogLevel, LoggingConfig};

// =============================================================================
// Main CLI Structure
// =============================================================================

/// ElectricianHub access-control server
///
/// Serves the refreshUserToken callable, ID token minting and the claims
/// sync endpoint for ElectricianHub members.
#[derive(Parser, Debug)]
#[command(
    name = "ehub",
    author = "Sylvex <contact@sylvex.io>",
    version = ehub_core::VERSION,
    about = "ElectricianHub role-based access control server",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        default_value = "ehub.yaml",
        env = "EHUB_CONFIG",
        global = true
    )]
    pub config: PathBuf,

    /// Log level (trace, debug, info, warn, error). Overrides the config file.
    #[arg(short, long, env = "EHUB_CLI_LOG_LEVEL", global = true, value_parser = LogLevel::from_str)]
    pub log_level: Option<LogLevel>,

    /// Log format (text, json, compact). Overrides the config file.
    #[arg(long, env = "EHUB_LOG_FORMAT", global = true, value_parser = LogFormat::from_str)]
    pub log_format: Option<LogFormat>,

    /// Enable quiet mode (warnings and errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands for the `ehub` CLI.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the API server
    ///
    /// This is the default command when no subcommand is specified.
    Run,

    /// Validate the configuration file
    ///
    /// Parses and validates the configuration without starting the server.
    Validate(ValidateArgs),

    /// Show detailed version information
    Version,

    /// Print the capability table for every role
    Roles(RolesArgs),

    /// Mint a development ID token for a seeded user
    ///
    /// The token carries the claims stored on the identity, which for a
    /// freshly seeded store is none unless `--sync` is given.
    Token(TokenArgs),
}

// =============================================================================
// Command Arguments
// =============================================================================

/// Arguments for the `validate` command.
#[derive(Args, Debug, Clone, Default)]
pub struct ValidateArgs {
    /// Show parsed configuration after validation
    #[arg(short, long)]
    pub show_config: bool,

    /// Output format for validation results
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Strict mode: treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the `roles` command.
#[derive(Args, Debug, Clone, Default)]
pub struct RolesArgs {
    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the `token` command.
#[derive(Args, Debug, Clone)]
pub struct TokenArgs {
    /// Uid of a user seeded in the configuration
    pub uid: String,

    /// Issue and store the user's claims before minting
    #[arg(long)]
    pub sync: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

// =============================================================================
// Enums
// =============================================================================

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for programmatic parsing
    Json,
}

/// Logging settings after flags and the config file are merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogSettings {
    /// Log level.
    pub level: LogLevel,
    /// Output format.
    pub format: LogFormat,
}

// =============================================================================
// Helper Methods
// =============================================================================

impl Cli {
    /// Parse CLI arguments from the command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective command, defaulting to `Run` if none specified.
    pub fn effective_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Run)
    }

    /// Resolves logging settings.
    ///
    /// Precedence is `--quiet`/`--verbose`, then the explicit flags, then
    /// the config file section, then the defaults.
    pub fn log_settings(&self, file: Option<&LoggingConfig>) -> LogSettings {
        let level = if self.quiet {
            LogLevel::Warn
        } else if self.verbose {
            LogLevel::Debug
        } else {
            self.log_level
                .or_else(|| file.map(|f| f.level))
                .unwrap_or_default()
        };
        let format = self
            .log_format
            .or_else(|| file.map(|f| f.format))
            .unwrap_or_default();

        LogSettings { level, format }
    }
}

// =============================================================================
// Tests
// =============================================================================

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `validate` command.

use ehub_config::{AuditSink, HubConfig, SecretValue, load_config};

use crate::cli::{Cli, OutputFormat, ValidateArgs};
use crate::error::{BinError, BinResult};

/// Loads and validates the configuration, then prints a summary.
pub fn validate(cli: &Cli, args: ValidateArgs) -> BinResult<()> {
    let config_path = &cli.config;

    let config = load_config(config_path)
        .map_err(|e| BinError::from(e).with_context("Configuration validation failed"))?;
    let warnings = collect_warnings(&config);
    let shown = redacted(&config);

    match args.format {
        OutputFormat::Text => {
            println!("✓ Configuration is valid: {}", config_path.display());
            println!();
            println!("Summary:");
            println!("  API: {}", config.server.socket_addr());
            println!("  Token issuer: {}", config.security.jwt.issuer);
            println!("  Token lifetime: {}s", config.security.jwt.lifetime_secs);
            println!("  Seeded users: {}", config.users.len());
            println!("  Admin emails: {}", config.access.admin_emails.len());
            println!("  Audit sink: {:?}", config.security.audit.sink);

            if !warnings.is_empty() {
                println!();
                println!("Warnings:");
                for warning in &warnings {
                    println!("  ⚠ {}", warning);
                }
            }

            if args.show_config {
                println!();
                println!("Parsed configuration:");
                println!("{}", serde_json::to_string_pretty(&shown)?);
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "valid": true,
                "config_path": config_path.display().to_string(),
                "summary": {
                    "api": config.server.socket_addr().to_string(),
                    "token_issuer": config.security.jwt.issuer,
                    "token_lifetime_secs": config.security.jwt.lifetime_secs,
                    "user_count": config.users.len(),
                    "admin_email_count": config.access.admin_emails.len(),
                    "audit_sink": config.security.audit.sink,
                },
                "warnings": warnings,
                "config": if args.show_config { Some(&shown) } else { None },
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    if args.strict && !warnings.is_empty() {
        return Err(BinError::config(format!(
            "Strict mode: {} warning(s) found",
            warnings.len()
        )));
    }

    Ok(())
}

/// Returns non-fatal findings for a valid configuration.
pub fn collect_warnings(config: &HubConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.users.is_empty() {
        warnings.push("No users are seeded; every token request will fail".to_string());
    }
    if config.access.admin_emails.is_empty() {
        warnings.push("Admin allow-list is empty; nobody can open admin views".to_string());
    }
    for email in &config.access.admin_emails {
        let seeded = config
            .users
            .iter()
            .any(|u| u.email.trim().eq_ignore_ascii_case(email.trim()));
        if !seeded {
            warnings.push(format!("Admin email '{}' has no seeded user", email));
        }
    }

    let cors = &config.server.cors;
    if cors.allow_credentials && cors.allowed_origins.iter().any(|o| o == "*") {
        warnings.push("CORS credentials are ignored with a wildcard origin".to_string());
    }
    if config.security.audit.sink == AuditSink::Memory {
        warnings.push("Audit entries are kept in memory only".to_string());
    }

    warnings
}

fn redacted(config: &HubConfig) -> HubConfig {
    let mut shown = config.clone();
    if shown.security.jwt.secret.is_some() {
        shown.security.jwt.secret = Some(SecretValue::new("********"));
    }
    shown
}

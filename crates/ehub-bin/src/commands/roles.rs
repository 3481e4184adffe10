// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `roles` command.

use ehub_core::{Capability, PermissionSet, Role};
use serde::Serialize;

use crate::cli::{Cli, OutputFormat, RolesArgs};
use crate::error::BinResult;

/// One row of the capability table.
#[derive(Debug, Clone, Serialize)]
pub struct RoleRow {
    /// Role name, `null` for a member without claims.
    pub role: Option<Role>,
    /// Role description.
    pub description: String,
    /// Granted capabilities.
    pub capabilities: Vec<Capability>,
}

/// Builds the capability table: one row per role, then the row for a
/// member whose token carries no role.
pub fn capability_table() -> Vec<RoleRow> {
    Role::all()
        .iter()
        .map(|role| RoleRow {
            role: Some(*role),
            description: role.description().to_string(),
            capabilities: PermissionSet::for_role(Some(*role)).granted(),
        })
        .chain(std::iter::once(RoleRow {
            role: None,
            description: "No role claim".to_string(),
            capabilities: PermissionSet::for_role(None).granted(),
        }))
        .collect()
}

/// Prints the capability table.
pub fn roles(_cli: &Cli, args: RolesArgs) -> BinResult<()> {
    let table = capability_table();

    match args.format {
        OutputFormat::Text => {
            for row in &table {
                let name = row.role.map(|r| r.as_str()).unwrap_or("(none)");
                println!("{:<12} {}", name, row.description);
                if row.capabilities.is_empty() {
                    println!("             -");
                }
                for capability in &row.capabilities {
                    println!("             {}", capability.as_str());
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&table)?);
        }
    }

    Ok(())
}

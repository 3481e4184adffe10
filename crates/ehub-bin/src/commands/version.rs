// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `version` command.

use std::io::Write;

use ehub_core::{Capability, Role};

use crate::cli::Cli;
use crate::error::BinResult;

/// Prints crate versions, the size of the role policy and the build target.
pub fn version(_cli: &Cli) -> BinResult<()> {
    let crates = [
        ("ehub-bin", crate::VERSION),
        ("ehub-core", ehub_core::VERSION),
        ("ehub-config", ehub_config::VERSION),
        ("ehub-api", ehub_api::VERSION),
    ];

    let mut out = std::io::stdout().lock();
    writeln!(out, "ehub {} (ElectricianHub access control)", crate::VERSION)?;
    writeln!(out)?;
    for (name, version) in crates {
        writeln!(out, "  {:<12} {}", name, version)?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "  policy       {} roles, {} capabilities",
        Role::all().len(),
        Capability::all().len()
    )?;
    writeln!(
        out,
        "  target       {}-{}",
        std::env::consts::ARCH,
        std::env::consts::OS
    )?;
    writeln!(out)?;
    writeln!(out, "PolyForm Noncommercial License 1.0.0")?;
    writeln!(out, "Copyright (c) 2025 Sylvex. All rights reserved.")?;
    Ok(())
}

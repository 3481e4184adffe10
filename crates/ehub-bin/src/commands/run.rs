// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `run` command.

use crate::cli::Cli;
use crate::error::BinResult;
use crate::logging::init_logging;
use crate::runtime::RuntimeBuilder;

/// Loads the configuration, installs logging and serves until shutdown.
pub async fn run(cli: &Cli) -> BinResult<()> {
    let runtime = RuntimeBuilder::new().config_path(&cli.config).build()?;
    init_logging(cli.log_settings(Some(&runtime.config().logging)))?;

    runtime.run().await
}

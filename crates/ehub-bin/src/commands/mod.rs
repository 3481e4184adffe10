// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI command implementations.
//!
//! - `run`: Start the API server
//! - `validate`: Validate the configuration file
//! - `version`: Show version information
//! - `roles`: Print the role capability table
//! - `token`: Mint a development ID token

mod roles;
mod run;
mod token;
mod validate;
mod version;

pub use roles::{capability_table, roles};
pub use run::run;
pub use token::token;
pub use validate::validate;
pub use version::version;

use crate::cli::{Cli, Commands};
use crate::error::BinResult;
use crate::logging::init_logging;

/// Executes the command selected on the command line.
///
/// `run` installs logging once its configuration is loaded, so the file's
/// `logging` section applies. Every other command logs with CLI settings.
pub async fn execute(cli: Cli) -> BinResult<()> {
    let command = cli.effective_command();
    if !matches!(command, Commands::Run) {
        init_logging(cli.log_settings(None))?;
    }

    match command {
        Commands::Run => run::run(&cli).await,
        Commands::Validate(args) => validate::validate(&cli, args),
        Commands::Version => version::version(&cli),
        Commands::Roles(args) => roles::roles(&cli, args),
        Commands::Token(args) => token::token(&cli, args).await,
    }
}

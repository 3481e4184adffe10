// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Entry point of the `ehub` binary.

use ehub_bin::Cli;
use ehub_bin::commands;
use ehub_bin::error::report_error_and_exit;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    if let Err(e) = commands::execute(cli).await {
        report_error_and_exit(e);
    }
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Warden - command line client for the identity service.

use warden_bin::error::report_error_and_exit;
use warden_bin::{commands, init_logging, runtime, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    let loaded = runtime::load_config(&cli);
    let logging = loaded.as_ref().ok().map(|c| &c.logging);
    init_logging(&cli.effective_log_level(logging), cli.effective_log_format(logging));

    if let Err(e) = commands::execute(cli, loaded).await {
        report_error_and_exit(e);
    }
}

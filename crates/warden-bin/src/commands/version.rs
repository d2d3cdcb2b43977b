// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `version` command.

use std::io::Write;

use crate::error::BinResult;

/// Executes the `version` command to display version information.
pub fn version(out: &mut dyn Write) -> BinResult<()> {
    writeln!(out, "Warden - authentication client")?;
    writeln!(out)?;
    writeln!(out, "Version Information:")?;
    writeln!(out, "  warden-bin:    {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(out, "  warden-core:   {}", warden_core::VERSION)?;
    writeln!(out, "  warden-client: {}", warden_client::VERSION)?;
    writeln!(out, "  warden-config: {}", warden_config::VERSION)?;
    writeln!(out)?;
    writeln!(out, "Build Information:")?;
    writeln!(out, "  Rust Edition: 2024")?;
    writeln!(out, "  Target:       {}", std::env::consts::ARCH)?;
    writeln!(out, "  OS:           {}", std::env::consts::OS)?;
    writeln!(out)?;
    writeln!(out, "License: PolyForm Noncommercial License 1.0.0")?;
    writeln!(out, "Copyright (c) 2025 Sylvex. All rights reserved.")?;

    Ok(())
}

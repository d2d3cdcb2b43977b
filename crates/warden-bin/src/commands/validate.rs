// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `validate` command.

use std::io::Write;

use warden_config::{SessionBackend, WardenConfig};

use super::write_json;
use crate::cli::{Cli, OutputFormat, ValidateArgs};
use crate::error::{BinError, BinResult};
use crate::runtime;

/// Executes the `validate` command against the configuration loaded for `cli`.
pub fn validate(
    cli: &Cli,
    loaded: BinResult<WardenConfig>,
    args: &ValidateArgs,
    out: &mut dyn Write,
) -> BinResult<()> {
    let source = runtime::config_path(cli)
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "(defaults)".to_string());

    let config = loaded.map_err(|e| e.with_context("Configuration validation failed"))?;

    let warnings = collect_warnings(&config);

    match args.format {
        OutputFormat::Text => {
            writeln!(out, "Configuration is valid: {}", source)?;
            writeln!(out)?;
            writeln!(out, "Summary:")?;
            writeln!(out, "  API URL:        {}", config.client.api_url)?;
            writeln!(out, "  Timeout:        {}s", config.client.timeout_secs)?;
            writeln!(out, "  Session:        {}", describe_session(&config))?;
            writeln!(
                out,
                "  Signatures:     {}",
                if config.token.verify_signature { "verified" } else { "not verified" }
            )?;
            writeln!(out, "  Guarded routes: {}", config.guard.routes.rules().len())?;

            if !warnings.is_empty() {
                writeln!(out)?;
                writeln!(out, "Warnings:")?;
                for warning in &warnings {
                    writeln!(out, "  - {}", warning)?;
                }
            }

            if args.show_config {
                writeln!(out)?;
                writeln!(out, "Parsed configuration:")?;
                write_json(&config, out)?;
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "valid": true,
                "config_path": source,
                "summary": {
                    "api_url": config.client.api_url,
                    "timeout_secs": config.client.timeout_secs,
                    "session_backend": config.session.backend.as_str(),
                    "verify_signature": config.token.verify_signature,
                    "route_count": config.guard.routes.rules().len(),
                },
                "warnings": warnings,
                "config": if args.show_config { Some(&config) } else { None },
            });
            write_json(&output, out)?;
        }
    }

    // In strict mode, treat warnings as errors
    if args.strict && !warnings.is_empty() {
        return Err(BinError::config(format!(
            "Strict mode: {} warning(s) found",
            warnings.len()
        )));
    }

    Ok(())
}

fn describe_session(config: &WardenConfig) -> String {
    match config.session.backend {
        SessionBackend::Memory => "memory".to_string(),
        SessionBackend::File => format!("file ({})", config.session.path.display()),
    }
}

fn collect_warnings(config: &WardenConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if !config.token.verify_signature {
        warnings.push(
            "Token signatures are not verified; role checks are advisory only".to_string(),
        );
    }

    if config.client.api_url.starts_with("http://")
        && !config.client.api_url.contains("localhost")
        && !config.client.api_url.contains("127.0.0.1")
    {
        warnings.push(format!(
            "API URL {} does not use TLS; credentials are sent in clear text",
            config.client.api_url
        ));
    }

    if config.session.backend == SessionBackend::Memory {
        warnings.push("Memory session backend does not persist between invocations".to_string());
    }

    warnings
}

// =============================================================================
// Tests
// =============================================================================

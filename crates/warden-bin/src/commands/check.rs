// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `check` command.

use std::io::Write;

use warden_core::AuthorizationOutcome;

use super::write_json;
use crate::cli::{CheckArgs, OutputFormat};
use crate::error::{BinError, BinResult};
use crate::runtime::AppContext;

/// Executes the `check` command.
///
/// With `--route` the route table decides which roles are required. With
/// `--role` any one of the given roles suffices. With neither, only a valid
/// session is required. Redirects and notices are reported on stderr.
pub fn check(context: &AppContext, args: &CheckArgs, out: &mut dyn Write) -> BinResult<()> {
    let (target, outcome) = match args.route {
        Some(ref route) => (route.clone(), context.guard.check_route(route)),
        None => (describe_roles(&args.roles), context.guard.check(args.roles.as_slice())),
    };

    match args.format {
        OutputFormat::Text => writeln!(out, "{}: {}", target, outcome)?,
        OutputFormat::Json => {
            let report = serde_json::json!({
                "target": target,
                "outcome": outcome,
                "roles": context.resolver.roles(),
            });
            write_json(&report, out)?;
        }
    }

    match outcome {
        AuthorizationOutcome::Allowed => Ok(()),
        other => Err(BinError::AccessDenied(other)),
    }
}

fn describe_roles(roles: &[String]) -> String {
    if roles.is_empty() {
        "session".to_string()
    } else {
        format!("roles [{}]", roles.join(", "))
    }
}

// =============================================================================
// Tests
// =============================================================================

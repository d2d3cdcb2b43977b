// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `roles` command.

use std::io::Write;

use super::{report_outcome, write_json};
use crate::cli::{OutputFormat, RoleCommands};
use crate::error::BinResult;
use crate::runtime::AppContext;

/// Executes a `roles` subcommand.
pub async fn roles(context: &AppContext, command: RoleCommands, out: &mut dyn Write) -> BinResult<()> {
    let outcome = match command {
        RoleCommands::List(args) => {
            let roles = context.roles.list_roles().await?;
            return match args.format {
                OutputFormat::Json => write_json(&roles, out),
                OutputFormat::Text => {
                    if roles.is_empty() {
                        writeln!(out, "No roles defined")?;
                    }
                    for role in &roles {
                        writeln!(out, "{:<38} {:<20} {} user(s)", role.id, role.name, role.total_users)?;
                    }
                    Ok(())
                }
            };
        }
        RoleCommands::Create { name } => context.roles.create_role(&name).await?,
        RoleCommands::Delete { id } => context.roles.delete_role(&id).await?,
        RoleCommands::Assign { user_id, role_id } => {
            context.roles.assign_role(&user_id, &role_id).await?
        }
    };

    report_outcome(outcome, out)
}

// =============================================================================
// Tests
// =============================================================================

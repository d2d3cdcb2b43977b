// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `whoami` and `detail` commands.

use std::io::Write;

use warden_core::AuthError;

use super::write_json;
use crate::cli::{OutputArgs, OutputFormat};
use crate::error::BinResult;
use crate::runtime::AppContext;

/// Executes the `whoami` command.
///
/// Reads the identity from the stored token only; no request is made.
pub fn whoami(context: &AppContext, args: &OutputArgs, out: &mut dyn Write) -> BinResult<()> {
    let claims = context.resolver.claims().ok_or(AuthError::Unauthenticated)?;
    let expires_at = claims.expires_at();
    let identity = warden_core::Identity::from(claims);

    match args.format {
        OutputFormat::Text => {
            writeln!(out, "Id:      {}", identity.id)?;
            writeln!(out, "Name:    {}", identity.full_name)?;
            writeln!(out, "Email:   {}", identity.email)?;
            writeln!(out, "Roles:   {}", join_or_none(&identity.roles))?;
            if let Some(expires_at) = expires_at {
                writeln!(out, "Expires: {}", expires_at.to_rfc3339())?;
            }
        }
        OutputFormat::Json => write_json(&identity, out)?,
    }
    Ok(())
}

/// Executes the `detail` command.
pub async fn detail(context: &AppContext, args: &OutputArgs, out: &mut dyn Write) -> BinResult<()> {
    let detail = context.gateway.fetch_detail().await?;

    match args.format {
        OutputFormat::Text => {
            writeln!(out, "Id:          {}", detail.id)?;
            writeln!(out, "Name:        {}", detail.full_name)?;
            writeln!(out, "Email:       {}", detail.email)?;
            writeln!(out, "Roles:       {}", join_or_none(&detail.roles))?;
            if let Some(ref phone) = detail.phone_number {
                writeln!(out, "Phone:       {}", phone)?;
            }
            writeln!(
                out,
                "Two-factor:  {}",
                if detail.two_factor_enabled { "enabled" } else { "disabled" }
            )?;
        }
        OutputFormat::Json => write_json(&detail, out)?,
    }
    Ok(())
}

fn join_or_none(roles: &[String]) -> String {
    if roles.is_empty() {
        "(none)".to_string()
    } else {
        roles.join(", ")
    }
}

// =============================================================================
// Tests
// =============================================================================

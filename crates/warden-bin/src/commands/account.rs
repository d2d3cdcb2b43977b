// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the account commands.

use std::io::Write;

use warden_core::{
    AuthError, ChangePasswordRequest, Credentials, ForgotPasswordRequest, Identity,
    RegistrationRequest, ResetPasswordRequest,
};

use super::report_outcome;
use crate::cli::{ChangePasswordArgs, ForgotPasswordArgs, LoginArgs, RegisterArgs, ResetPasswordArgs};
use crate::error::BinResult;
use crate::runtime::AppContext;

/// Executes the `login` command.
pub async fn login(context: &AppContext, args: &LoginArgs, out: &mut dyn Write) -> BinResult<()> {
    let credentials = Credentials::new(args.email.trim(), args.password.as_str());
    let outcome = context.gateway.login(&credentials).await?;

    // Decoded from the response; the stored slot is left alone.
    let greeting = outcome
        .session_token()
        .and_then(|token| context.resolver.codec().decode(token).ok())
        .map(Identity::from);
    report_outcome(outcome, out)?;

    if let Some(identity) = greeting {
        writeln!(out, "Signed in as {} <{}>", identity.full_name, identity.email)?;
    }
    Ok(())
}

/// Executes the `register` command.
pub async fn register(context: &AppContext, args: &RegisterArgs, out: &mut dyn Write) -> BinResult<()> {
    let request = args.roles.iter().fold(
        RegistrationRequest::new(
            args.email.trim(),
            args.full_name.trim(),
            args.password.as_str(),
            args.confirm_password.as_str(),
        ),
        |request, role| request.with_role(role.as_str()),
    );

    let outcome = context.gateway.register(&request).await?;
    report_outcome(outcome, out)
}

/// Executes the `logout` command.
pub fn logout(context: &AppContext, out: &mut dyn Write) -> BinResult<()> {
    context.gateway.logout()?;
    writeln!(out, "Logged out")?;
    Ok(())
}

/// Executes the `forgot-password` command.
pub async fn forgot_password(
    context: &AppContext,
    args: &ForgotPasswordArgs,
    out: &mut dyn Write,
) -> BinResult<()> {
    let request = ForgotPasswordRequest {
        email: args.email.trim().to_string(),
    };
    let outcome = context.gateway.forgot_password(&request).await?;
    report_outcome(outcome, out)
}

/// Executes the `reset-password` command.
pub async fn reset_password(
    context: &AppContext,
    args: &ResetPasswordArgs,
    out: &mut dyn Write,
) -> BinResult<()> {
    let request = ResetPasswordRequest {
        email: args.email.trim().to_string(),
        token: args.token.trim().to_string(),
        new_password: args.new_password.clone(),
    };
    let outcome = context.gateway.reset_password(&request).await?;
    report_outcome(outcome, out)
}

/// Executes the `change-password` command for the signed-in account.
pub async fn change_password(
    context: &AppContext,
    args: &ChangePasswordArgs,
    out: &mut dyn Write,
) -> BinResult<()> {
    let identity = context
        .resolver
        .current_identity()
        .ok_or(AuthError::Unauthenticated)?;

    let request = ChangePasswordRequest {
        email: identity.email,
        current_password: args.current_password.clone(),
        new_password: args.new_password.clone(),
    };
    let outcome = context.gateway.change_password(&request).await?;
    report_outcome(outcome, out)
}

// =============================================================================
// Tests
// =============================================================================

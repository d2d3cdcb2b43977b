// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI command implementations.
//!
//! Commands write their results to the given writer and report failures as
//! [`BinError`] so that the exit code reflects the kind of failure:
//!
//! - account: `login`, `register`, `logout` and the password flows
//! - profile: `whoami`, `detail`
//! - `check`: access guard evaluation
//! - `roles`: role administration
//! - `validate`, `version`: tooling

mod account;
mod check;
mod profile;
mod roles;
mod validate;
mod version;

pub use account::{change_password, forgot_password, login, logout, register, reset_password};
pub use check::check;
pub use profile::{detail, whoami};
pub use roles::roles;
pub use validate::validate;
pub use version::version;

use std::io::Write;

use anyhow::Context;
use serde::Serialize;
use warden_config::WardenConfig;
use warden_core::AuthOutcome;

use crate::cli::{Cli, Commands};
use crate::error::{BinError, BinResult};
use crate::runtime::AppContext;

/// Executes the command named by `cli` with the configuration loaded at startup.
pub async fn execute(cli: Cli, loaded: BinResult<WardenConfig>) -> BinResult<()> {
    let mut out = std::io::stdout();

    match &cli.command {
        Commands::Validate(args) => return validate::validate(&cli, loaded, args, &mut out),
        Commands::Version => return version::version(&mut out),
        _ => {}
    }

    let context = AppContext::from_config(loaded?)?;
    dispatch(&context, cli.command, &mut out).await
}

/// Runs a command that needs the client components.
pub async fn dispatch(context: &AppContext, command: Commands, out: &mut dyn Write) -> BinResult<()> {
    match command {
        Commands::Login(args) => account::login(context, &args, out).await,
        Commands::Register(args) => account::register(context, &args, out).await,
        Commands::Logout => account::logout(context, out),
        Commands::Whoami(args) => profile::whoami(context, &args, out),
        Commands::Detail(args) => profile::detail(context, &args, out).await,
        Commands::Check(args) => check::check(context, &args, out),
        Commands::ForgotPassword(args) => account::forgot_password(context, &args, out).await,
        Commands::ResetPassword(args) => account::reset_password(context, &args, out).await,
        Commands::ChangePassword(args) => account::change_password(context, &args, out).await,
        Commands::Roles(args) => roles::roles(context, args.command, out).await,
        Commands::Validate(_) | Commands::Version => Err(BinError::runtime(
            "command does not run against a client context",
        )),
    }
}

/// Prints the outcome message, failing when the service reported failure.
fn report_outcome(outcome: AuthOutcome, out: &mut dyn Write) -> BinResult<()> {
    if !outcome.is_success {
        let message = if outcome.message.is_empty() {
            "The identity service reported a failure".to_string()
        } else {
            outcome.message
        };
        return Err(BinError::unsuccessful(message));
    }

    if !outcome.message.is_empty() {
        writeln!(out, "{}", outcome.message)?;
    }
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(value: &T, out: &mut dyn Write) -> BinResult<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render output")?;
    writeln!(out, "{}", rendered)?;
    Ok(())
}

// =============================================================================
// Test Support
// =============================================================================

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use warden_client::{ApiRequest, ApiResponse, Transport};
    use warden_config::{SessionBackend, WardenConfig};
    use warden_core::{
        AuthError, AuthResult, ClaimSet, JwtConfig, MemorySessionStore, SessionToken, TokenCodec,
    };

    use crate::runtime::AppContext;

    /// Transport that answers from a queue and records requests.
    #[derive(Default)]
    pub struct Scripted {
        pub responses: Mutex<Vec<ApiResponse>>,
        pub requests: Mutex<Vec<ApiRequest>>,
    }

    #[async_trait]
    impl Transport for Scripted {
        async fn send(&self, request: ApiRequest) -> AuthResult<ApiResponse> {
            self.requests.lock().push(request);
            let mut responses = self.responses.lock();
            if responses.is_empty() {
                return Err(AuthError::transport("no scripted response"));
            }
            Ok(responses.remove(0))
        }
    }

    pub fn context(responses: Vec<ApiResponse>) -> (AppContext, Arc<Scripted>, MemorySessionStore) {
        context_with(WardenConfig::default(), responses)
    }

    pub fn context_with(
        mut config: WardenConfig,
        responses: Vec<ApiResponse>,
    ) -> (AppContext, Arc<Scripted>, MemorySessionStore) {
        let transport = Arc::new(Scripted {
            responses: Mutex::new(responses),
            requests: Mutex::default(),
        });
        let store = MemorySessionStore::new();
        config.session.backend = SessionBackend::Memory;
        let context = AppContext::with_parts(config, Arc::new(store.clone()), transport.clone())
            .unwrap();
        (context, transport, store)
    }

    pub fn token(roles: &[&str]) -> SessionToken {
        let claims = ClaimSet::builder("user-1")
            .name("Ada Lovelace")
            .email("ada@example.com")
            .roles(roles.iter().copied())
            .expires_in(3600)
            .build();
        let signer = TokenCodec::new(JwtConfig::new("test-secret-key-that-is-long-enough")).unwrap();
        SessionToken::new(signer.encode(&claims).unwrap())
    }

    pub fn output(buffer: Vec<u8>) -> String {
        String::from_utf8(buffer).unwrap()
    }
}

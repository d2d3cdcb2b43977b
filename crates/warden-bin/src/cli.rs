// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! This module provides the command-line interface for Warden using clap.
//! Subcommands map onto the client library:
//!
//! - `login` / `logout` / `register`: session lifecycle
//! - `whoami` / `detail`: identity of the stored session
//! - `check`: evaluate the access guard against a route or a role set
//! - `forgot-password` / `reset-password` / `change-password`: password flows
//! - `roles`: role administration
//! - `validate` / `version`: tooling

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use warden_config::LoggingConfig;

// =============================================================================
// Main CLI Structure
// =============================================================================

/// Warden - authentication client for the identity service
///
/// Logs in against the remote identity service, keeps the issued token in a
/// local session slot and answers access questions from its claims.
#[derive(Parser, Debug)]
#[command(
    name = "warden",
    author = "Sylvex <contact@sylvex.io>",
    version = warden_core::VERSION,
    about = "Authentication client for the identity service",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file path (defaults to ./warden.yaml when present)
    #[arg(short, long, env = "WARDEN_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "WARDEN_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Log format (text, json, compact)
    #[arg(long, env = "WARDEN_LOG_FORMAT", global = true)]
    pub log_format: Option<LogFormat>,

    /// Enable quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands for the Warden CLI.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Log in and store the issued token
    Login(LoginArgs),

    /// Register a new account
    ///
    /// Registration never logs the new account in.
    Register(RegisterArgs),

    /// Clear the stored session
    Logout,

    /// Show the identity decoded from the stored token
    Whoami(OutputArgs),

    /// Fetch the account detail from the identity service
    Detail(OutputArgs),

    /// Evaluate access for a route or a set of roles
    ///
    /// Exits non-zero when access is not allowed.
    Check(CheckArgs),

    /// Request a password-reset token by email
    #[command(name = "forgot-password")]
    ForgotPassword(ForgotPasswordArgs),

    /// Complete a password reset with the emailed token
    #[command(name = "reset-password")]
    ResetPassword(ResetPasswordArgs),

    /// Change the password of the logged-in account
    #[command(name = "change-password")]
    ChangePassword(ChangePasswordArgs),

    /// Manage roles
    Roles(RolesArgs),

    /// Validate the configuration file
    ///
    /// Parses and validates the configuration without contacting the service.
    Validate(ValidateArgs),

    /// Show detailed version information
    Version,
}

// =============================================================================
// Command Arguments
// =============================================================================

/// Arguments for the `login` command.
#[derive(Args, Debug, Clone)]
pub struct LoginArgs {
    /// Account email
    #[arg(short, long)]
    pub email: String,

    /// Account password
    #[arg(short, long, env = "WARDEN_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// Arguments for the `register` command.
#[derive(Args, Debug, Clone)]
pub struct RegisterArgs {
    /// Account email
    #[arg(short, long)]
    pub email: String,

    /// Display name
    #[arg(long)]
    pub full_name: String,

    /// Password
    #[arg(short, long, env = "WARDEN_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Password confirmation
    #[arg(long)]
    pub confirm_password: String,

    /// Requested role (repeatable)
    #[arg(long = "role")]
    pub roles: Vec<String>,
}

/// Output selection shared by read-only commands.
#[derive(Args, Debug, Default, Clone)]
pub struct OutputArgs {
    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the `check` command.
#[derive(Args, Debug, Default, Clone)]
pub struct CheckArgs {
    /// Route path looked up in the configured route table
    #[arg(long, conflicts_with = "roles")]
    pub route: Option<String>,

    /// Required role (repeatable, any one suffices)
    #[arg(long = "role")]
    pub roles: Vec<String>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the `forgot-password` command.
#[derive(Args, Debug, Clone)]
pub struct ForgotPasswordArgs {
    /// Account email
    #[arg(short, long)]
    pub email: String,
}

/// Arguments for the `reset-password` command.
#[derive(Args, Debug, Clone)]
pub struct ResetPasswordArgs {
    /// Account email
    #[arg(short, long)]
    pub email: String,

    /// Reset token from the email
    #[arg(short, long)]
    pub token: String,

    /// New password
    #[arg(long)]
    pub new_password: String,
}

/// Arguments for the `change-password` command.
#[derive(Args, Debug, Clone)]
pub struct ChangePasswordArgs {
    /// Current password
    #[arg(long)]
    pub current_password: String,

    /// New password
    #[arg(long)]
    pub new_password: String,
}

/// Arguments for the `roles` command.
#[derive(Args, Debug, Clone)]
pub struct RolesArgs {
    /// Role operation
    #[command(subcommand)]
    pub command: RoleCommands,
}

/// Role administration operations.
#[derive(Subcommand, Debug, Clone)]
pub enum RoleCommands {
    /// List roles
    List(OutputArgs),

    /// Create a role
    Create {
        /// Role name
        name: String,
    },

    /// Delete a role
    Delete {
        /// Role id
        id: String,
    },

    /// Assign a role to a user
    Assign {
        /// User id
        #[arg(long)]
        user_id: String,

        /// Role id
        #[arg(long)]
        role_id: String,
    },
}

/// Arguments for the `validate` command.
#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Show parsed configuration after validation
    #[arg(short, long)]
    pub show_config: bool,

    /// Output format for validation results
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Strict mode: treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

// =============================================================================
// Enums
// =============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for structured logging
    Json,
    /// Compact format for minimal output
    Compact,
}

impl From<warden_config::LogFormat> for LogFormat {
    fn from(format: warden_config::LogFormat) -> Self {
        match format {
            warden_config::LogFormat::Text => Self::Text,
            warden_config::LogFormat::Json => Self::Json,
            warden_config::LogFormat::Compact => Self::Compact,
        }
    }
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for programmatic parsing
    Json,
}

// =============================================================================
// Helper Methods
// =============================================================================

impl Cli {
    /// Parse CLI arguments from the command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Check if verbose logging is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose && !self.quiet
    }

    /// Get the effective log level.
    ///
    /// Flags win over `--log-level`, which wins over the configuration file.
    pub fn effective_log_level(&self, configured: Option<&LoggingConfig>) -> String {
        if self.quiet {
            "warn".to_string()
        } else if self.verbose {
            "debug".to_string()
        } else if let Some(level) = &self.log_level {
            level.clone()
        } else {
            configured
                .map(|logging| logging.level.as_str())
                .unwrap_or("info")
                .to_string()
        }
    }

    /// Get the effective log format.
    pub fn effective_log_format(&self, configured: Option<&LoggingConfig>) -> LogFormat {
        self.log_format
            .or_else(|| configured.map(|logging| logging.format.into()))
            .unwrap_or_default()
    }
}

impl Default for ValidateArgs {
    fn default() -> Self {
        Self {
            show_config: false,
            format: OutputFormat::Text,
            strict: false,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

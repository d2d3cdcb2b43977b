// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types for the Warden binary.

use thiserror::Error;
use warden_core::{AuthError, AuthorizationOutcome};

/// Result type alias for warden-bin operations.
pub type BinResult<T> = Result<T, BinError>;

/// Errors that can occur in the Warden binary.
#[derive(Debug, Error)]
pub enum BinError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Runtime error.
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),

    /// The identity service answered with an unsuccessful outcome.
    #[error("{0}")]
    Unsuccessful(String),

    /// The access guard did not allow the request.
    #[error("Access check failed: {0}")]
    AccessDenied(AuthorizationOutcome),

    /// Authentication error.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Config parsing error.
    #[error("Config error: {0}")]
    Config(#[from] warden_config::ConfigError),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        /// The context description.
        context: String,
        /// The underlying error.
        #[source]
        source: Box<BinError>,
    },
}

impl BinError {
    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Creates a runtime error.
    pub fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }

    /// Creates an I/O error.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Creates an unsuccessful-outcome error.
    pub fn unsuccessful(msg: impl Into<String>) -> Self {
        Self::Unsuccessful(msg.into())
    }

    /// Adds context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Returns the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration(_) | Self::Config(_) => 1,
            Self::Runtime(_) => 3,
            Self::Io(_) => 4,
            Self::Unsuccessful(_) => 5,
            Self::AccessDenied(AuthorizationOutcome::RedirectToLogin) => 6,
            Self::AccessDenied(_) => 7,
            Self::Auth(err) => match err {
                AuthError::Validation { .. } => 2,
                AuthError::Configuration { .. } => 1,
                AuthError::Decode(_) | AuthError::Unauthenticated => 6,
                AuthError::Rejected { .. } => 7,
                AuthError::Transport { .. } => 8,
                AuthError::Storage { .. } => 4,
            },
            Self::WithContext { source, .. } => source.exit_code(),
        }
    }
}

impl From<std::io::Error> for BinError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<anyhow::Error> for BinError {
    fn from(err: anyhow::Error) -> Self {
        Self::Runtime(format!("{:#}", err))
    }
}

// =============================================================================
// Error Reporting
// =============================================================================

/// Reports an error with appropriate formatting.
pub fn report_error(error: &BinError) {
    eprintln!("Error: {}", error);

    if let Some(errors) = auth_error(error).and_then(AuthError::field_errors) {
        for field in &errors.fields {
            eprintln!("  {}: {}", field.field, field.message);
        }
    }

    // Print cause chain
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("  Caused by: {}", cause);
        source = cause.source();
    }
}

fn auth_error(error: &BinError) -> Option<&AuthError> {
    match error {
        BinError::Auth(err) => Some(err),
        BinError::WithContext { source, .. } => auth_error(source),
        _ => None,
    }
}

/// Reports an error and exits with the appropriate code.
pub fn report_error_and_exit(error: BinError) -> ! {
    report_error(&error);
    std::process::exit(error.exit_code())
}

// =============================================================================
// Tests
// =============================================================================

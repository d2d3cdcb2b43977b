// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types for the authentication core.
//!
//! Every failure the core can report falls into one of a small set of
//! categories. None of them is fatal: the worst case for a caller is
//! "treated as logged out".

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codec::DecodeError;

/// Result type alias for core operations.
pub type AuthResult<T> = Result<T, AuthError>;

// =============================================================================
// AuthError
// =============================================================================

/// Authentication and authorization errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Input rejected locally before any remote call was made.
    #[error("Validation failed: {errors}")]
    Validation {
        /// Field-specific errors.
        errors: ValidationErrors,
    },

    /// The stored or presented token could not be decoded.
    #[error("Token decode failed: {0}")]
    Decode(#[from] DecodeError),

    /// The remote identity service declined the request.
    #[error("Request rejected ({status}): {message}")]
    Rejected {
        /// HTTP status returned by the service.
        status: u16,
        /// Server-provided message.
        message: String,
    },

    /// Network or protocol failure talking to the remote service.
    #[error("Transport error: {message}")]
    Transport {
        /// Human-readable message.
        message: String,
        /// HTTP status, when a response was received at all.
        status: Option<u16>,
        /// Structured validation errors returned with a 400-class response.
        errors: Option<ValidationErrors>,
    },

    /// An authenticated call was attempted without a valid session.
    #[error("Not authenticated")]
    Unauthenticated,

    /// The durable session slot could not be read or written.
    #[error("Session storage error: {message}")]
    Storage {
        /// Error message.
        message: String,
    },

    /// The component was configured incorrectly.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message.
        message: String,
    },
}

impl AuthError {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Creates a validation error from a collection of field errors.
    pub fn validation(errors: ValidationErrors) -> Self {
        Self::Validation { errors }
    }

    /// Creates a validation error for a single field.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(field, message);
        Self::Validation { errors }
    }

    /// Creates a rejection error.
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Creates a transport error without a response status.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            status: None,
            errors: None,
        }
    }

    /// Creates a transport error for a non-success response.
    pub fn transport_status(status: u16, message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            status: Some(status),
            errors: None,
        }
    }

    /// Creates a transport error carrying remote validation errors.
    pub fn remote_validation(status: u16, errors: ValidationErrors) -> Self {
        Self::Transport {
            message: "Validation error".to_string(),
            status: Some(status),
            errors: Some(errors),
        }
    }

    /// Creates a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Returns the error code for categorization.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::Validation { .. } => "VALIDATION_ERROR",
            AuthError::Decode(_) => "DECODE_ERROR",
            AuthError::Rejected { .. } => "AUTH_REJECTED",
            AuthError::Transport { .. } => "TRANSPORT_ERROR",
            AuthError::Unauthenticated => "UNAUTHENTICATED",
            AuthError::Storage { .. } => "STORAGE_ERROR",
            AuthError::Configuration { .. } => "CONFIGURATION_ERROR",
        }
    }

    /// Returns `true` if the caller may retry the same request.
    ///
    /// Only connection failures and 5xx, 408 and 429 responses qualify.
    pub fn is_retryable(&self) -> bool {
        match self {
            AuthError::Transport {
                errors: None,
                status,
                ..
            } => match status {
                None => true,
                Some(code) => *code >= 500 || matches!(code, 408 | 429),
            },
            _ => false,
        }
    }

    /// Returns the HTTP status attached to this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            AuthError::Rejected { status, .. } => Some(*status),
            AuthError::Transport { status, .. } => *status,
            _ => None,
        }
    }

    /// Returns the remote or local field errors attached to this error.
    pub fn field_errors(&self) -> Option<&ValidationErrors> {
        match self {
            AuthError::Validation { errors } => Some(errors),
            AuthError::Transport { errors, .. } => errors.as_ref(),
            _ => None,
        }
    }

    /// Returns a message that is safe to show to end users.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Validation { errors } => match errors.fields.first() {
                Some(first) => first.message.clone(),
                None => "Invalid input".to_string(),
            },
            AuthError::Decode(_) | AuthError::Unauthenticated => {
                "You must log in to continue.".to_string()
            }
            AuthError::Rejected { message, .. } => message.clone(),
            AuthError::Transport {
                errors: Some(_), ..
            } => "Validations error".to_string(),
            AuthError::Transport { .. } => {
                "Unable to reach the identity service. Please try again.".to_string()
            }
            AuthError::Storage { .. } | AuthError::Configuration { .. } => {
                "An internal error occurred".to_string()
            }
        }
    }
}

impl From<std::io::Error> for AuthError {
    fn from(err: std::io::Error) -> Self {
        AuthError::storage(err.to_string())
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Collection of field validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ValidationErrors {
    /// Field-specific errors.
    pub fields: Vec<FieldError>,
}

impl ValidationErrors {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field error.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Returns `true` if there are no errors.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the number of errors.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if any error refers to `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f.field == field)
    }

    /// Converts to an `AuthError` if there are errors.
    pub fn into_result<T>(self, success: T) -> AuthResult<T> {
        if self.is_empty() {
            Ok(success)
        } else {
            Err(AuthError::validation(self))
        }
    }
}

impl From<Vec<FieldError>> for ValidationErrors {
    fn from(fields: Vec<FieldError>) -> Self {
        Self { fields }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .fields
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{}", joined)
    }
}

/// A single field validation error.
///
/// The identity service reports errors as `{code, description}` pairs; both
/// spellings are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field name or error code.
    #[serde(alias = "code")]
    pub field: String,
    /// Error message.
    #[serde(alias = "description")]
    pub message: String,
}

// =============================================================================
// Tests
// =============================================================================

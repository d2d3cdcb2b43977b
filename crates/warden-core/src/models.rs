// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Request and response bodies exchanged with the identity service.
//!
//! Field names follow the service's camelCase JSON.

use serde::{Deserialize, Serialize};

// =============================================================================
// Account Requests
// =============================================================================

/// Login credentials. Input only; never persisted.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Account email.
    pub email: String,
    /// Password.
    pub password: String,
}

impl Credentials {
    /// Creates credentials.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Account registration request.
///
/// `confirm_password` is checked locally and is not sent to the service.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    /// Account email.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Password.
    pub password: String,
    /// Password confirmation.
    #[serde(skip_serializing, default)]
    pub confirm_password: String,
    /// Requested roles.
    #[serde(default)]
    pub roles: Vec<String>,
}

impl RegistrationRequest {
    /// Creates a registration request with no roles.
    pub fn new(
        email: impl Into<String>,
        full_name: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            full_name: full_name.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
            roles: Vec::new(),
        }
    }

    /// Adds a requested role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }
}

impl std::fmt::Debug for RegistrationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationRequest")
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .field("roles", &self.roles)
            .finish_non_exhaustive()
    }
}

/// Request to start the password-reset flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    /// Account email.
    pub email: String,
}

/// Request to complete a password reset with the emailed token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    /// Account email.
    pub email: String,
    /// Reset token delivered out of band.
    pub token: String,
    /// New password.
    pub new_password: String,
}

/// Request to change the password of the signed-in account.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    /// Account email.
    pub email: String,
    /// Current password.
    pub current_password: String,
    /// New password.
    pub new_password: String,
}

// =============================================================================
// Responses
// =============================================================================

/// Outcome of a login, registration or password exchange.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthOutcome {
    /// Whether the service accepted the request.
    pub is_success: bool,
    /// Server-provided message.
    pub message: String,
    /// Issued token, present on successful login.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl AuthOutcome {
    /// Creates a successful outcome.
    pub fn success(message: impl Into<String>, token: Option<String>) -> Self {
        Self {
            is_success: true,
            message: message.into(),
            token,
        }
    }

    /// Creates an unsuccessful outcome.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            is_success: false,
            message: message.into(),
            token: None,
        }
    }

    /// Returns the token when the outcome is successful and carries one.
    pub fn session_token(&self) -> Option<&str> {
        if !self.is_success {
            return None;
        }
        self.token.as_deref().filter(|t| !t.trim().is_empty())
    }
}

impl std::fmt::Debug for AuthOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthOutcome")
            .field("is_success", &self.is_success)
            .field("message", &self.message)
            .field("has_token", &self.token.is_some())
            .finish()
    }
}

/// Canonical profile of the signed-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UserDetail {
    /// Account id.
    pub id: String,
    /// Display name.
    pub full_name: String,
    /// Account email.
    pub email: String,
    /// Assigned roles.
    pub roles: Vec<String>,
    /// Phone number.
    pub phone_number: Option<String>,
    /// Whether the phone number has been confirmed.
    pub phone_number_confirmed: bool,
    /// Whether two-factor authentication is enabled.
    pub two_factor_enabled: bool,
    /// Consecutive failed sign-in attempts.
    pub access_failed_count: u32,
}

// =============================================================================
// Roles
// =============================================================================

/// A role as listed by the identity service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleInfo {
    /// Role id.
    pub id: String,
    /// Role name.
    pub name: String,
    /// Number of accounts holding the role.
    #[serde(default)]
    pub total_users: u32,
}

/// Request to create a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleRequest {
    /// Name of the new role.
    pub role_name: String,
}

/// Request to assign a role to an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRoleRequest {
    /// Account id.
    pub user_id: String,
    /// Role id.
    pub role_id: String,
}

// =============================================================================
// Tests
// =============================================================================

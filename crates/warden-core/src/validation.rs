// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Client-side input validation.
//!
//! Runs before any request is sent; a request that fails here never reaches
//! the network.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{AuthResult, ValidationErrors};
use crate::models::{
    AssignRoleRequest, ChangePasswordRequest, CreateRoleRequest, Credentials,
    ForgotPasswordRequest, RegistrationRequest, ResetPasswordRequest,
};

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Returns `true` if `password` and `confirm` are identical.
pub fn confirmation_matches(password: &str, confirm: &str) -> bool {
    password == confirm
}

/// Returns `true` if `email` has valid email syntax.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

fn check_email(errors: &mut ValidationErrors, email: &str) {
    if email.trim().is_empty() {
        errors.add("email", "Email is required");
    } else if !is_valid_email(email) {
        errors.add("email", "Email is not valid");
    }
}

fn check_required(errors: &mut ValidationErrors, field: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.add(field, message);
    }
}

/// Local validation of a request body.
pub trait Validate {
    /// Collects every field error for this value.
    fn field_errors(&self) -> ValidationErrors;

    /// Returns `Err(AuthError::Validation)` if any field is invalid.
    fn validate(&self) -> AuthResult<()> {
        self.field_errors().into_result(())
    }
}

impl Validate for Credentials {
    fn field_errors(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        check_email(&mut errors, &self.email);
        if self.password.is_empty() {
            errors.add("password", "Password is required");
        }
        errors
    }
}

impl Validate for RegistrationRequest {
    fn field_errors(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        check_email(&mut errors, &self.email);
        check_required(&mut errors, "fullName", &self.full_name, "Full name is required");
        if self.password.is_empty() {
            errors.add("password", "Password is required");
        }
        if self.confirm_password.is_empty() {
            errors.add("confirmPassword", "Confirm password is required");
        } else if !confirmation_matches(&self.password, &self.confirm_password) {
            errors.add("confirmPassword", "Passwords do not match");
        }
        errors
    }
}

impl Validate for ForgotPasswordRequest {
    fn field_errors(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        check_email(&mut errors, &self.email);
        errors
    }
}

impl Validate for ResetPasswordRequest {
    fn field_errors(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        check_email(&mut errors, &self.email);
        check_required(&mut errors, "token", &self.token, "Reset token is required");
        if self.new_password.is_empty() {
            errors.add("newPassword", "New password is required");
        }
        errors
    }
}

impl Validate for ChangePasswordRequest {
    fn field_errors(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        check_email(&mut errors, &self.email);
        if self.current_password.is_empty() {
            errors.add("currentPassword", "Current password is required");
        }
        if self.new_password.is_empty() {
            errors.add("newPassword", "New password is required");
        }
        errors
    }
}

impl Validate for CreateRoleRequest {
    fn field_errors(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        check_required(&mut errors, "roleName", &self.role_name, "Role Name is required.");
        errors
    }
}

impl Validate for AssignRoleRequest {
    fn field_errors(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        check_required(&mut errors, "userId", &self.user_id, "User id is required");
        check_required(&mut errors, "roleId", &self.role_id, "Role id is required");
        errors
    }
}

// =============================================================================
// Tests
// =============================================================================

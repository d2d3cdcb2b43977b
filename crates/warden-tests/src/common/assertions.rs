// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Custom Test Assertions
//!
//! Assertion helpers for session state, with failure messages that name
//! what was actually found.

use warden_core::{AuthError, AuthorizationOutcome, IdentityResolver, SessionStore, SessionToken};

// =============================================================================
// Session Assertions
// =============================================================================

/// Assertion extensions for [`IdentityResolver`].
pub trait SessionAssertions {
    /// Assert that a valid session exists for `user_id`.
    fn assert_logged_in_as(&self, user_id: &str);

    /// Assert that no valid session exists.
    fn assert_logged_out(&self);

    /// Assert the roles of the current session.
    fn assert_roles(&self, expected: &[&str]);
}

impl SessionAssertions for IdentityResolver {
    fn assert_logged_in_as(&self, user_id: &str) {
        match self.current_identity() {
            Some(identity) => assert_eq!(
                identity.id, user_id,
                "Expected session for {}, found {}",
                user_id, identity.id
            ),
            None => panic!("Expected session for {}, found none", user_id),
        }
    }

    fn assert_logged_out(&self) {
        if let Some(identity) = self.current_identity() {
            panic!("Expected no session, found one for {}", identity.id);
        }
    }

    fn assert_roles(&self, expected: &[&str]) {
        let roles = self
            .roles()
            .unwrap_or_else(|| panic!("Expected roles {:?}, but no session exists", expected));
        assert_eq!(roles, expected, "Unexpected session roles");
    }
}

/// Asserts the raw content of a session slot.
pub fn assert_slot<S: SessionStore + ?Sized>(store: &S, expected: Option<&SessionToken>) {
    let actual = store.read().expect("session read");
    assert_eq!(
        actual.as_ref(),
        expected,
        "Unexpected session slot content in {} store",
        store.name()
    );
}

// =============================================================================
// Outcome Assertions
// =============================================================================

/// Asserts an authorization outcome with a readable message.
pub fn assert_outcome(actual: AuthorizationOutcome, expected: AuthorizationOutcome) {
    assert_eq!(actual, expected, "Expected {}, got {}", expected, actual);
}

/// Asserts that an error is a local validation error naming `field`.
pub fn assert_validation_error(error: &AuthError, field: &str) {
    match error {
        AuthError::Validation { errors } => assert!(
            errors.has_field(field),
            "Expected a validation error for '{}', got: {}",
            field,
            errors
        ),
        other => panic!("Expected a validation error, got: {}", other),
    }
}

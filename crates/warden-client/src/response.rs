// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Interpretation of account service responses.

use serde::de::DeserializeOwned;
use serde_json::Value;
use warden_core::{AuthError, AuthOutcome, AuthResult, FieldError, ValidationErrors};

use crate::transport::ApiResponse;

/// Interprets a response to an exchange that yields an [`AuthOutcome`].
///
/// A non-2xx response whose body is itself an outcome is a normal rejection
/// and is returned as an unsuccessful outcome.
pub(crate) fn outcome(response: ApiResponse) -> AuthResult<AuthOutcome> {
    if response.is_success() {
        return body(&response);
    }

    let rejection = response
        .value()
        .filter(is_outcome)
        .and_then(|value| serde_json::from_value::<AuthOutcome>(value).ok());
    if let Some(mut outcome) = rejection {
        outcome.is_success = false;
        outcome.token = None;
        return Ok(outcome);
    }

    if matches!(response.status, 401 | 403) {
        tracing::debug!(status = response.status, "Request rejected by the identity service");
        return Ok(AuthOutcome::failure(rejection_message(&response)));
    }

    Err(failure(&response))
}

/// Parses the body of a 2xx response.
pub(crate) fn body<T: DeserializeOwned>(response: &ApiResponse) -> AuthResult<T> {
    response.parse().map_err(|e| {
        tracing::warn!(status = response.status, error = %e, "Unexpected response body");
        AuthError::transport_status(
            response.status,
            "Unexpected response from the identity service",
        )
    })
}

/// Maps a non-2xx response to an error.
pub(crate) fn failure(response: &ApiResponse) -> AuthError {
    let value = response.value();

    if response.status == 400 {
        if let Some(errors) = value.as_ref().and_then(field_errors) {
            return AuthError::remote_validation(response.status, errors);
        }
    }

    let message = value
        .as_ref()
        .and_then(server_message)
        .unwrap_or_else(|| format!("Request failed with status {}", response.status));

    AuthError::transport_status(response.status, message)
}

/// Maps a 401/403 response to a rejection, anything else via [`failure`].
pub(crate) fn authenticated_failure(response: &ApiResponse) -> AuthError {
    match response.status {
        401 | 403 => AuthError::rejected(response.status, rejection_message(response)),
        _ => failure(response),
    }
}

/// Server message of a 401/403 response, or the status reason.
fn rejection_message(response: &ApiResponse) -> String {
    response
        .value()
        .as_ref()
        .and_then(server_message)
        .unwrap_or_else(|| match response.status {
            401 => "Unauthorized".to_string(),
            _ => "Forbidden".to_string(),
        })
}

fn is_outcome(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|obj| obj.contains_key("isSuccess"))
}

fn field_errors(value: &Value) -> Option<ValidationErrors> {
    if !value.is_array() {
        return None;
    }
    let list: Vec<FieldError> = serde_json::from_value(value.clone()).ok()?;
    if list.is_empty() {
        return None;
    }
    Some(list.into())
}

fn server_message(value: &Value) -> Option<String> {
    if let Some(text) = value.as_str() {
        return Some(text.to_string()).filter(|t| !t.trim().is_empty());
    }
    ["message", "title", "detail"]
        .iter()
        .filter_map(|key| value.get(key)?.as_str())
        .find(|text| !text.trim().is_empty())
        .map(str::to_string)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_outcome() {
        let response = ApiResponse::json(
            200,
            &json!({"isSuccess": true, "message": "Login Success", "token": "abc"}),
        );
        let outcome = outcome(response).unwrap();

        assert!(outcome.is_success);
        assert_eq!(outcome.session_token(), Some("abc"));
    }

    #[test]
    fn test_rejection_outcome_on_error_status() {
        let response = ApiResponse::json(
            401,
            &json!({"isSuccess": false, "message": "Invalid password"}),
        );
        let outcome = outcome(response).unwrap();

        assert!(!outcome.is_success);
        assert_eq!(outcome.message, "Invalid password");
    }

    #[test]
    fn test_unauthorized_without_outcome_body() {
        let response = ApiResponse::json(401, &json!({"message": "Invalid credentials"}));
        let outcome = outcome(response).unwrap();
        assert!(!outcome.is_success);
        assert_eq!(outcome.message, "Invalid credentials");
        assert_eq!(outcome.session_token(), None);

        let outcome = outcome_of(ApiResponse::new(403, r#""Account locked""#));
        assert_eq!(outcome.message, "Account locked");

        let outcome = outcome_of(ApiResponse::new(401, ""));
        assert_eq!(outcome.message, "Unauthorized");
    }

    fn outcome_of(response: ApiResponse) -> AuthOutcome {
        outcome(response).unwrap()
    }

    #[test]
    fn test_validation_list() {
        let response = ApiResponse::json(
            400,
            &json!([
                {"code": "DuplicateEmail", "description": "Email is already taken."},
                {"field": "password", "message": "Too short"}
            ]),
        );
        let err = outcome(response).unwrap_err();

        let errors = err.field_errors().unwrap();
        assert_eq!(errors.len(), 2);
        assert!(errors.has_field("DuplicateEmail"));
        assert_eq!(err.status(), Some(400));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_other_failure_uses_server_message() {
        let err = outcome(ApiResponse::json(500, &json!({"message": "boom"}))).unwrap_err();
        match err {
            AuthError::Transport { message, status, .. } => {
                assert_eq!(message, "boom");
                assert_eq!(status, Some(500));
            }
            other => panic!("unexpected: {other:?}"),
        }

        let err = outcome(ApiResponse::new(502, "")).unwrap_err();
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn test_malformed_success_body() {
        let err = outcome(ApiResponse::new(200, "not json")).unwrap_err();
        assert!(matches!(err, AuthError::Transport { status: Some(200), .. }));
    }

    #[test]
    fn test_authenticated_failure() {
        let err = authenticated_failure(&ApiResponse::new(401, ""));
        assert!(matches!(err, AuthError::Rejected { status: 401, .. }));

        let err = authenticated_failure(&ApiResponse::new(404, ""));
        assert!(matches!(err, AuthError::Transport { status: Some(404), .. }));
    }
}

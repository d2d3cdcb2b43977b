// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Role management endpoints.

use std::sync::Arc;

use warden_core::{
    AssignRoleRequest, AuthError, AuthOutcome, AuthResult, CreateRoleRequest, IdentityResolver,
    RoleInfo, Validate,
};

use crate::response;
use crate::transport::{ApiRequest, ApiResponse, Transport};

/// Role collection path.
pub const ROLES_PATH: &str = "roles";

/// Client for the role endpoints. All calls are authenticated.
#[derive(Clone)]
pub struct RoleService {
    transport: Arc<dyn Transport>,
    resolver: IdentityResolver,
}

impl RoleService {
    /// Creates a role service.
    pub fn new(transport: Arc<dyn Transport>, resolver: IdentityResolver) -> Self {
        Self {
            transport,
            resolver,
        }
    }

    /// Lists roles.
    pub async fn list_roles(&self) -> AuthResult<Vec<RoleInfo>> {
        let response = self.send(ApiRequest::get(ROLES_PATH)).await?;
        response::body(&response)
    }

    /// Creates a role.
    pub async fn create_role(&self, name: &str) -> AuthResult<AuthOutcome> {
        let request = CreateRoleRequest {
            role_name: name.trim().to_string(),
        };
        request.validate()?;

        let response = self.send(ApiRequest::post(ROLES_PATH, &request)?).await?;
        let outcome = acknowledgement(&response, "Role created successfully.");
        log_acknowledgement(&outcome, "Role creation");
        Ok(outcome)
    }

    /// Deletes a role by id.
    pub async fn delete_role(&self, id: &str) -> AuthResult<AuthOutcome> {
        if id.trim().is_empty() {
            return Err(AuthError::invalid_field("id", "Role id is required."));
        }

        let path = format!("{}/{}", ROLES_PATH, id.trim());
        let response = self.send(ApiRequest::delete(path)).await?;
        let outcome = acknowledgement(&response, "Role deleted successfully.");
        log_acknowledgement(&outcome, "Role deletion");
        Ok(outcome)
    }

    /// Assigns a role to an account.
    pub async fn assign_role(&self, user_id: &str, role_id: &str) -> AuthResult<AuthOutcome> {
        let request = AssignRoleRequest {
            user_id: user_id.to_string(),
            role_id: role_id.to_string(),
        };
        request.validate()?;

        let path = format!("{}/assign", ROLES_PATH);
        let response = self.send(ApiRequest::post(path, &request)?).await?;
        let outcome = acknowledgement(&response, "Role assigned successfully.");
        log_acknowledgement(&outcome, "Role assignment");
        Ok(outcome)
    }

    async fn send(&self, request: ApiRequest) -> AuthResult<ApiResponse> {
        let token = self.resolver.token().ok_or(AuthError::Unauthenticated)?;
        let response = self.transport.send(request.with_bearer(token)).await?;
        if !response.is_success() {
            return Err(response::authenticated_failure(&response));
        }
        Ok(response)
    }
}

const REFUSED_MESSAGE: &str = "The identity service did not accept the request.";

/// Builds the outcome of a mutating call from a 2xx response, which may carry
/// an outcome body, a bare message, or nothing. An outcome body is taken as
/// reported; only an empty message is filled in.
fn acknowledgement(response: &ApiResponse, default_message: &str) -> AuthOutcome {
    let value = response.value();
    if let Some(serde_json::Value::String(message)) = &value {
        if !message.trim().is_empty() {
            return AuthOutcome::success(message.as_str(), None);
        }
    }

    let reported = value
        .filter(|value| value.get("isSuccess").is_some())
        .and_then(|value| serde_json::from_value::<AuthOutcome>(value).ok());
    match reported {
        Some(mut outcome) => {
            if outcome.message.trim().is_empty() {
                outcome.message = if outcome.is_success {
                    default_message.to_string()
                } else {
                    REFUSED_MESSAGE.to_string()
                };
            }
            outcome
        }
        None => AuthOutcome::success(default_message, None),
    }
}

fn log_acknowledgement(outcome: &AuthOutcome, action: &str) {
    if outcome.is_success {
        tracing::info!(message = %outcome.message, "{}", action);
    } else {
        tracing::warn!(message = %outcome.message, "{} refused", action);
    }
}

impl std::fmt::Debug for RoleService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleService")
            .field("transport", &self.transport.name())
            .finish()
    }
}

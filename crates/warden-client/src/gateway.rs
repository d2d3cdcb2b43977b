// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Account exchanges with the remote identity service.
//!
//! Every operation validates its input locally first; a request that fails
//! validation never reaches the transport. Only [`AuthGateway::login`] writes
//! the session slot.

use std::sync::Arc;

use warden_core::{
    AuthError, AuthOutcome, AuthResult, ChangePasswordRequest, Credentials,
    ForgotPasswordRequest, IdentityResolver, RegistrationRequest, ResetPasswordRequest,
    SessionToken, UserDetail, Validate,
};

use crate::response;
use crate::transport::{ApiRequest, Transport};

/// Account service paths, relative to the API base URL.
pub mod paths {
    /// Login.
    pub const LOGIN: &str = "account/login";
    /// Registration.
    pub const REGISTER: &str = "account/register";
    /// Profile of the signed-in account.
    pub const DETAIL: &str = "account/detail";
    /// Password reset request.
    pub const FORGOT_PASSWORD: &str = "account/forgot-password";
    /// Password reset with an emailed token.
    pub const RESET_PASSWORD: &str = "account/reset-password";
    /// Password change for the signed-in account.
    pub const CHANGE_PASSWORD: &str = "account/change-password";
}

/// Client for the account endpoints of the identity service.
#[derive(Clone)]
pub struct AuthGateway {
    transport: Arc<dyn Transport>,
    resolver: IdentityResolver,
}

impl AuthGateway {
    /// Creates a gateway that talks through `transport` and keeps the
    /// session in the resolver's store.
    pub fn new(transport: Arc<dyn Transport>, resolver: IdentityResolver) -> Self {
        Self {
            transport,
            resolver,
        }
    }

    /// Returns the identity resolver.
    pub fn resolver(&self) -> &IdentityResolver {
        &self.resolver
    }

    /// Signs in.
    ///
    /// The returned token is saved only if the service reports success and
    /// the token is non-empty. An unsuccessful outcome leaves the session
    /// slot untouched.
    pub async fn login(&self, credentials: &Credentials) -> AuthResult<AuthOutcome> {
        credentials.validate()?;

        let request = ApiRequest::post(paths::LOGIN, credentials)?;
        let outcome = response::outcome(self.transport.send(request).await?)?;

        match outcome.session_token() {
            Some(token) => {
                self.resolver.store().save(&SessionToken::new(token))?;
                tracing::info!(user = %credentials.email, "Login succeeded");
            }
            None => {
                tracing::info!(user = %credentials.email, message = %outcome.message, "Login rejected");
            }
        }

        Ok(outcome)
    }

    /// Creates an account. Never touches the session.
    pub async fn register(&self, request: &RegistrationRequest) -> AuthResult<AuthOutcome> {
        request.validate()?;

        let outcome = self.post_outcome(paths::REGISTER, request, None).await?;
        tracing::info!(
            user = %request.email,
            success = outcome.is_success,
            "Registration completed"
        );
        Ok(outcome)
    }

    /// Fetches the canonical profile of the signed-in account.
    pub async fn fetch_detail(&self) -> AuthResult<UserDetail> {
        let token = self.session_token()?;

        let response = self
            .transport
            .send(ApiRequest::get(paths::DETAIL).with_bearer(token))
            .await?;
        if !response.is_success() {
            return Err(response::authenticated_failure(&response));
        }
        response::body(&response)
    }

    /// Ends the session.
    pub fn logout(&self) -> AuthResult<()> {
        self.resolver.logout()?;
        tracing::info!("Logged out");
        Ok(())
    }

    /// Asks the service to send a password reset link.
    pub async fn forgot_password(&self, request: &ForgotPasswordRequest) -> AuthResult<AuthOutcome> {
        request.validate()?;
        self.post_outcome(paths::FORGOT_PASSWORD, request, None).await
    }

    /// Sets a new password using an emailed reset token.
    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> AuthResult<AuthOutcome> {
        request.validate()?;
        self.post_outcome(paths::RESET_PASSWORD, request, None).await
    }

    /// Changes the password of the signed-in account.
    pub async fn change_password(&self, request: &ChangePasswordRequest) -> AuthResult<AuthOutcome> {
        request.validate()?;
        let token = self.session_token()?;
        self.post_outcome(paths::CHANGE_PASSWORD, request, Some(token))
            .await
    }

    fn session_token(&self) -> AuthResult<SessionToken> {
        self.resolver.token().ok_or(AuthError::Unauthenticated)
    }

    async fn post_outcome<T: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &T,
        bearer: Option<SessionToken>,
    ) -> AuthResult<AuthOutcome> {
        let mut request = ApiRequest::post(path, body)?;
        request.bearer = bearer;
        response::outcome(self.transport.send(request).await?)
    }
}

impl std::fmt::Debug for AuthGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGateway")
            .field("transport", &self.transport.name())
            .field("resolver", &self.resolver)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

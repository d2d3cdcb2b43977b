// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! Tokens and identity service responses shared by the integration suites.
//! Every token is signed with [`TEST_SECRET`], so a verifying codec built by
//! [`TokenFixtures::verifier`] accepts them.

use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header};
use serde_json::{json, Value};
use warden_client::ApiResponse;
use warden_core::{ClaimSet, JwtConfig, SessionToken, TokenCodec};

/// HMAC secret shared by every fixture token.
pub const TEST_SECRET: &str = "integration-test-secret-key-at-least-32-bytes";

/// Subject id of the fixture account.
pub const TEST_USER_ID: &str = "user-001";

/// Email of the fixture account.
pub const TEST_EMAIL: &str = "ada@example.com";

/// Password accepted by the fixture account.
pub const TEST_PASSWORD: &str = "Secret#123";

// =============================================================================
// Token Fixtures
// =============================================================================

/// Fixture providing signed tokens.
pub struct TokenFixtures;

impl TokenFixtures {
    /// A codec that signs and verifies with [`TEST_SECRET`].
    pub fn verifier() -> TokenCodec {
        TokenCodec::new(JwtConfig::new(TEST_SECRET)).expect("fixture codec")
    }

    /// Claims for the fixture account, valid for an hour.
    pub fn claims(roles: &[&str]) -> ClaimSet {
        ClaimSet::builder(TEST_USER_ID)
            .name("Ada Lovelace")
            .email(TEST_EMAIL)
            .roles(roles.iter().copied())
            .expires_in(3600)
            .build()
    }

    /// Signs an arbitrary claim set.
    pub fn sign(claims: &ClaimSet) -> SessionToken {
        SessionToken::new(Self::verifier().encode(claims).expect("fixture token"))
    }

    /// A valid, unexpired token carrying `roles`.
    pub fn valid(roles: &[&str]) -> SessionToken {
        Self::sign(&Self::claims(roles))
    }

    /// A token whose expiry is `seconds_ago` in the past.
    pub fn expired(roles: &[&str], seconds_ago: i64) -> SessionToken {
        let mut claims = Self::claims(roles);
        claims.exp = Utc::now().timestamp() - seconds_ago;
        Self::sign(&claims)
    }

    /// Signs a raw JSON payload, for claim shapes the builder does not emit.
    pub fn raw(payload: &Value) -> SessionToken {
        let token = jsonwebtoken::encode(
            &Header::default(),
            payload,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .expect("fixture token");
        SessionToken::new(token)
    }

    /// A token whose `role` claim is a bare string.
    pub fn single_string_role(role: &str) -> SessionToken {
        Self::raw(&json!({
            "nameid": TEST_USER_ID,
            "name": "Ada Lovelace",
            "email": TEST_EMAIL,
            "role": role,
            "exp": Utc::now().timestamp() + 3600,
        }))
    }

    /// A valid token signed with a different secret.
    pub fn foreign(roles: &[&str]) -> SessionToken {
        let codec = TokenCodec::new(JwtConfig::new("some-other-issuer-secret-of-32-bytes!"))
            .expect("foreign codec");
        SessionToken::new(codec.encode(&Self::claims(roles)).expect("foreign token"))
    }

    /// A value that is not a compact token at all.
    pub fn malformed() -> SessionToken {
        SessionToken::new("not-a-token")
    }
}

// =============================================================================
// Response Fixtures
// =============================================================================

/// Fixture providing identity service responses.
pub struct ResponseFixtures;

impl ResponseFixtures {
    /// Successful login carrying `token`.
    pub fn login_success(token: &SessionToken) -> ApiResponse {
        ApiResponse::json(
            200,
            &json!({"isSuccess": true, "message": "Login Success.", "token": token.as_str()}),
        )
    }

    /// Login rejected by the service.
    pub fn login_failure(message: &str) -> ApiResponse {
        ApiResponse::json(400, &json!({"isSuccess": false, "message": message}))
    }

    /// Successful outcome without a token.
    pub fn success(message: &str) -> ApiResponse {
        ApiResponse::json(200, &json!({"isSuccess": true, "message": message}))
    }

    /// Per-field validation errors in the service's `{code, description}` shape.
    pub fn validation_problem(errors: &[(&str, &str)]) -> ApiResponse {
        let body: Vec<Value> = errors
            .iter()
            .map(|(code, description)| json!({"code": code, "description": description}))
            .collect();
        ApiResponse::json(400, &Value::Array(body))
    }

    /// Profile of the fixture account.
    pub fn detail(roles: &[&str]) -> ApiResponse {
        ApiResponse::json(
            200,
            &json!({
                "id": TEST_USER_ID,
                "fullName": "Ada Lovelace",
                "email": TEST_EMAIL,
                "roles": roles,
                "phoneNumber": null,
                "twoFactorEnabled": false,
                "accessFailedCount": 0,
            }),
        )
    }

    /// Bare status with an empty body.
    pub fn status(status: u16) -> ApiResponse {
        ApiResponse::new(status, "")
    }

    /// Plain-text server error.
    pub fn server_error() -> ApiResponse {
        ApiResponse::new(500, "\"Internal Server Error\"")
    }
}

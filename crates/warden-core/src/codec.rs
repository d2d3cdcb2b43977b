// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Token decoding, verification and issuance.
//!
//! Decoding is local and never touches the network. A codec built with
//! [`TokenCodec::insecure`] only checks the token's shape, which is enough
//! for client-side UX decisions; a codec built from a [`JwtConfig`] with
//! `verify_signature` set also checks the signature, issuer and audience and
//! is suitable as an authorization boundary.
//!
//! Decoding never looks at `exp`. Expiry is a separate question answered by
//! [`TokenCodec::is_expired`].

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::claims::ClaimSet;
use crate::error::{AuthError, AuthResult};

// =============================================================================
// DecodeError
// =============================================================================

/// Reasons a token could not be turned into a claim set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Not a well-formed compact token, or the payload is not a claim set.
    #[error("Malformed token: {message}")]
    Malformed {
        /// Error message.
        message: String,
    },

    /// Signature does not verify against the configured key.
    #[error("Invalid token signature")]
    InvalidSignature,

    /// Token was signed with an algorithm the codec does not accept.
    #[error("Invalid token algorithm")]
    InvalidAlgorithm,

    /// Issuer does not match.
    #[error("Invalid token issuer")]
    InvalidIssuer,

    /// Audience does not match.
    #[error("Invalid token audience")]
    InvalidAudience,

    /// Token is past its expiry.
    #[error("Token has expired")]
    Expired,

    /// Any other decoding failure.
    #[error("Token decode failed: {message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl DecodeError {
    /// Creates a malformed-token error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for DecodeError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Utf8(_) => {
                DecodeError::malformed(err.to_string())
            }
            ErrorKind::Json(e) => DecodeError::malformed(e.to_string()),
            ErrorKind::InvalidSignature => DecodeError::InvalidSignature,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                DecodeError::InvalidAlgorithm
            }
            ErrorKind::InvalidIssuer => DecodeError::InvalidIssuer,
            ErrorKind::InvalidAudience => DecodeError::InvalidAudience,
            ErrorKind::ExpiredSignature => DecodeError::Expired,
            _ => DecodeError::Other {
                message: err.to_string(),
            },
        }
    }
}

// =============================================================================
// JwtConfig
// =============================================================================

/// Token codec configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JwtConfig {
    /// Shared secret for HMAC algorithms. Also used for issuing tokens.
    #[serde(skip_serializing)]
    pub secret: String,
    /// PEM-encoded public key for RSA, ECDSA or EdDSA verification.
    pub public_key_pem: Option<String>,
    /// Expected issuer, checked when set.
    pub issuer: Option<String>,
    /// Expected audience, checked when set.
    pub audience: Option<String>,
    /// Signing algorithm.
    #[serde(with = "algorithm_serde")]
    pub algorithm: Algorithm,
    /// Whether to verify the signature when decoding.
    pub verify_signature: bool,
    /// Clock skew tolerance applied to expiry checks, in seconds.
    pub leeway_secs: u64,
    /// Lifetime of issued tokens, in seconds.
    pub expiration_secs: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            public_key_pem: None,
            issuer: None,
            audience: None,
            algorithm: Algorithm::HS256,
            verify_signature: false,
            leeway_secs: 0,
            expiration_secs: 3600,
        }
    }
}

impl JwtConfig {
    /// Creates a verifying configuration with the given HMAC secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            verify_signature: true,
            ..Default::default()
        }
    }

    /// Sets the issuer.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Sets the audience.
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Sets the clock skew tolerance.
    pub fn with_leeway(mut self, seconds: u64) -> Self {
        self.leeway_secs = seconds;
        self
    }

    /// Returns `true` if the algorithm is an HMAC variant.
    pub fn is_hmac(&self) -> bool {
        matches!(
            self.algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        )
    }

    /// Validates the configuration.
    pub fn validate(&self) -> AuthResult<()> {
        if self.verify_signature {
            if self.is_hmac() && self.secret.is_empty() {
                return Err(AuthError::configuration(
                    "signature verification enabled but no secret configured",
                ));
            }
            if !self.is_hmac() && self.public_key_pem.is_none() {
                return Err(AuthError::configuration(
                    "signature verification enabled but no public key configured",
                ));
            }
        }
        if !self.secret.is_empty() && self.secret.len() < 32 {
            tracing::warn!("JWT secret is shorter than recommended (32 bytes)");
        }
        Ok(())
    }

    fn decoding_key(&self) -> AuthResult<DecodingKey> {
        if !self.verify_signature {
            return Ok(DecodingKey::from_secret(&[]));
        }

        let pem = self.public_key_pem.as_deref().map(str::as_bytes);
        let key = match (self.algorithm, pem) {
            (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512, _) => {
                Ok(DecodingKey::from_secret(self.secret.as_bytes()))
            }
            (
                Algorithm::RS256
                | Algorithm::RS384
                | Algorithm::RS512
                | Algorithm::PS256
                | Algorithm::PS384
                | Algorithm::PS512,
                Some(pem),
            ) => DecodingKey::from_rsa_pem(pem),
            (Algorithm::ES256 | Algorithm::ES384, Some(pem)) => DecodingKey::from_ec_pem(pem),
            (Algorithm::EdDSA, Some(pem)) => DecodingKey::from_ed_pem(pem),
            (_, None) => return Err(AuthError::configuration("public key is not configured")),
        };

        key.map_err(|e| AuthError::configuration(format!("Invalid public key: {}", e)))
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(self.algorithm);
        validation.required_spec_claims = HashSet::new();
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = self.leeway_secs;

        if !self.verify_signature {
            validation.insecure_disable_signature_validation();
            validation.validate_aud = false;
            return validation;
        }

        if let Some(ref issuer) = self.issuer {
            validation.set_issuer(&[issuer]);
        }
        match self.audience {
            Some(ref audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }
        validation
    }
}

// =============================================================================
// TokenCodec
// =============================================================================

/// Decodes, verifies and issues session tokens.
#[derive(Clone)]
pub struct TokenCodec {
    config: Arc<JwtConfig>,
    decoding_key: Arc<DecodingKey>,
    encoding_key: Option<Arc<EncodingKey>>,
    validation: Arc<Validation>,
}

impl TokenCodec {
    /// Creates a codec from configuration.
    pub fn new(config: JwtConfig) -> AuthResult<Self> {
        config.validate()?;

        let decoding_key = config.decoding_key()?;
        let encoding_key = (config.is_hmac() && !config.secret.is_empty())
            .then(|| Arc::new(EncodingKey::from_secret(config.secret.as_bytes())));
        let validation = config.validation();

        Ok(Self {
            config: Arc::new(config),
            decoding_key: Arc::new(decoding_key),
            encoding_key,
            validation: Arc::new(validation),
        })
    }

    /// Creates a codec that checks token shape only.
    ///
    /// The signature is not verified, so decisions based on its output are
    /// advisory. The service that issued the token remains the authority.
    pub fn insecure() -> Self {
        let config = JwtConfig::default();
        let validation = config.validation();

        Self {
            config: Arc::new(config),
            decoding_key: Arc::new(DecodingKey::from_secret(&[])),
            encoding_key: None,
            validation: Arc::new(validation),
        }
    }

    /// Returns `true` if decoded tokens have had their signature verified.
    pub fn verifies_signature(&self) -> bool {
        self.config.verify_signature
    }

    /// Returns the configured lifetime for issued tokens.
    pub fn expiration_secs(&self) -> i64 {
        self.config.expiration_secs
    }

    /// Decodes a token into its claim set.
    pub fn decode(&self, token: &str) -> Result<ClaimSet, DecodeError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(DecodeError::malformed("empty token"));
        }
        if token.split('.').count() != 3 {
            return Err(DecodeError::malformed("expected three dot-separated segments"));
        }

        decode::<ClaimSet>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(DecodeError::from)
    }

    /// Decodes a token and rejects it if it has expired.
    pub fn decode_unexpired(&self, token: &str) -> Result<ClaimSet, DecodeError> {
        let claims = self.decode(token)?;
        if self.is_expired(&claims) {
            return Err(DecodeError::Expired);
        }
        Ok(claims)
    }

    /// Returns `true` if the claims have expired.
    pub fn is_expired(&self, claims: &ClaimSet) -> bool {
        self.is_expired_at(claims, Utc::now())
    }

    /// Returns `true` if the claims have expired at `now`, after leeway.
    pub fn is_expired_at(&self, claims: &ClaimSet, now: DateTime<Utc>) -> bool {
        let leeway = chrono::Duration::seconds(self.config.leeway_secs as i64);
        claims.is_expired_at(now - leeway)
    }

    /// Signs a claim set into a compact token.
    pub fn encode(&self, claims: &ClaimSet) -> AuthResult<String> {
        let key = self
            .encoding_key
            .as_ref()
            .ok_or_else(|| AuthError::configuration("no signing secret configured"))?;

        encode(&Header::new(self.config.algorithm), claims, key)
            .map_err(|e| AuthError::configuration(format!("Failed to create token: {}", e)))
    }

    /// Issues a token for an account using the configured lifetime and issuer.
    pub fn issue(
        &self,
        subject_id: &str,
        name: &str,
        email: &str,
        roles: Vec<String>,
    ) -> AuthResult<String> {
        let mut builder = ClaimSet::builder(subject_id)
            .name(name)
            .email(email)
            .roles(roles)
            .expires_in(self.config.expiration_secs);
        if let Some(ref issuer) = self.config.issuer {
            builder = builder.issuer(issuer);
        }
        if let Some(ref audience) = self.config.audience {
            builder = builder.audience(audience);
        }

        self.encode(&builder.build())
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &self.config.algorithm)
            .field("verify_signature", &self.config.verify_signature)
            .field("issuer", &self.config.issuer)
            .finish()
    }
}

// =============================================================================
// Algorithm Serialization
// =============================================================================

mod algorithm_serde {
    use jsonwebtoken::Algorithm;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(algorithm: &Algorithm, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        format!("{:?}", algorithm).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Algorithm, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<Algorithm>()
            .map_err(|_| serde::de::Error::custom(format!("Unknown algorithm: {}", s)))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-that-is-long-enough-for-testing";

    fn issuing_codec() -> TokenCodec {
        TokenCodec::new(JwtConfig::new(SECRET)).unwrap()
    }

    #[test]
    fn test_round_trip() {
        let codec = issuing_codec();
        let claims = ClaimSet::builder("user123")
            .name("Ada Lovelace")
            .email("ada@example.com")
            .roles(["Admin", "Editor"])
            .build();

        let token = codec.encode(&claims).unwrap();
        let decoded = codec.decode(&token).unwrap();

        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_insecure_decodes_foreign_signature() {
        let token = issuing_codec()
            .encode(&ClaimSet::builder("user").add_role("User").build())
            .unwrap();

        let claims = TokenCodec::insecure().decode(&token).unwrap();
        assert_eq!(claims.subject_id, "user");
        assert!(!TokenCodec::insecure().verifies_signature());
    }

    #[test]
    fn test_decode_ignores_expiry() {
        let codec = issuing_codec();
        let token = codec
            .encode(&ClaimSet::builder("user").expires_in(-3600).build())
            .unwrap();

        let claims = codec.decode(&token).unwrap();
        assert!(codec.is_expired(&claims));
        assert_eq!(codec.decode_unexpired(&token), Err(DecodeError::Expired));
    }

    #[test]
    fn test_malformed_tokens() {
        let codec = TokenCodec::insecure();

        assert!(matches!(codec.decode(""), Err(DecodeError::Malformed { .. })));
        assert!(matches!(
            codec.decode("not-a-token"),
            Err(DecodeError::Malformed { .. })
        ));
        assert!(matches!(
            codec.decode("invalid.token.here"),
            Err(DecodeError::Malformed { .. })
        ));
    }

    #[test]
    fn test_wrong_secret() {
        let other = TokenCodec::new(JwtConfig::new("another-secret-that-is-long-enough-too")).unwrap();
        let token = other.encode(&ClaimSet::builder("user").build()).unwrap();

        assert_eq!(
            issuing_codec().decode(&token),
            Err(DecodeError::InvalidSignature)
        );
    }

    #[test]
    fn test_issuer_checked_when_configured() {
        let codec = TokenCodec::new(JwtConfig::new(SECRET).with_issuer("warden")).unwrap();
        let foreign = codec
            .encode(&ClaimSet::builder("user").issuer("someone-else").build())
            .unwrap();
        let own = codec.issue("user", "User", "user@example.com", vec![]).unwrap();

        assert_eq!(codec.decode(&foreign), Err(DecodeError::InvalidIssuer));
        assert!(codec.decode(&own).is_ok());
    }

    #[test]
    fn test_leeway_extends_expiry() {
        let codec = TokenCodec::new(JwtConfig::new(SECRET).with_leeway(120)).unwrap();
        let claims = ClaimSet::builder("user").expires_in(-60).build();

        assert!(!codec.is_expired(&claims));
        assert!(issuing_codec().is_expired(&claims));
    }

    #[test]
    fn test_encode_requires_secret() {
        let result = TokenCodec::insecure().encode(&ClaimSet::builder("user").build());
        assert!(matches!(result, Err(AuthError::Configuration { .. })));
    }

    #[test]
    fn test_verification_requires_key() {
        let config = JwtConfig {
            verify_signature: true,
            ..JwtConfig::default()
        };
        assert!(TokenCodec::new(config).is_err());
    }

    #[test]
    fn test_algorithm_serde() {
        let config: JwtConfig = serde_json::from_str(r#"{"algorithm":"HS512"}"#).unwrap();
        assert_eq!(config.algorithm, Algorithm::HS512);

        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["algorithm"], "HS512");
        assert!(value.get("secret").is_none());

        assert!(serde_json::from_str::<JwtConfig>(r#"{"algorithm":"XX1"}"#).is_err());
    }
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Token claim set.
//!
//! The identity service writes claims under its own names (`nameid`, `name`,
//! `email`, `role`). Multi-valued claims such as `role` and `aud` arrive as a
//! bare string when there is one value and as an array otherwise; both are
//! normalized to a `Vec<String>` here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Long-form role claim type some issuers emit instead of `role`.
const MS_ROLE_CLAIM: &str = "http://schemas.microsoft.com/ws/2008/06/identity/claims/role";

// =============================================================================
// ClaimSet
// =============================================================================

/// Identity and role claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawClaims", into = "RawClaims")]
pub struct ClaimSet {
    /// Subject identifier (account id).
    pub subject_id: String,

    /// Display name.
    pub name: String,

    /// Account email.
    pub email: String,

    /// Role names, in claim order.
    pub roles: Vec<String>,

    /// Expiration time (Unix timestamp, seconds).
    pub exp: i64,

    /// Issued at time (Unix timestamp, seconds).
    pub iat: Option<i64>,

    /// Not before time (Unix timestamp, seconds).
    pub nbf: Option<i64>,

    /// Issuer.
    pub iss: Option<String>,

    /// Audiences.
    pub audience: Vec<String>,

    /// Token id.
    pub jti: Option<String>,
}

impl ClaimSet {
    /// Creates a builder for the given subject.
    pub fn builder(subject_id: impl Into<String>) -> ClaimSetBuilder {
        ClaimSetBuilder::new(subject_id)
    }

    /// Returns the subject identifier.
    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    /// Returns the roles.
    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    /// Returns `true` if the claims carry the given role (exact match).
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Returns `true` if the token has expired at `now`.
    ///
    /// Compared in milliseconds: the token is valid only while
    /// `now < exp * 1000`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp_millis() >= self.exp.saturating_mul(1000)
    }

    /// Returns `true` if the token has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Returns the expiration time as a DateTime.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Returns the time remaining until expiration.
    pub fn time_until_expiration(&self) -> Option<std::time::Duration> {
        let remaining = self.exp.saturating_mul(1000) - Utc::now().timestamp_millis();
        if remaining > 0 {
            Some(std::time::Duration::from_millis(remaining as u64))
        } else {
            None
        }
    }
}

// =============================================================================
// Wire Representation
// =============================================================================

/// A claim that may be a single string or an array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    /// Single value.
    One(String),
    /// Multiple values.
    Many(Vec<String>),
}

impl OneOrMany {
    /// Normalizes to a sequence.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }

    fn from_vec(mut values: Vec<String>) -> Option<Self> {
        match values.len() {
            0 => None,
            1 => values.pop().map(OneOrMany::One),
            _ => Some(OneOrMany::Many(values)),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nameid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unique_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<OneOrMany>,
    #[serde(
        default,
        rename = "http://schemas.microsoft.com/ws/2008/06/identity/claims/role",
        skip_serializing_if = "Option::is_none"
    )]
    ms_role: Option<OneOrMany>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nbf: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    aud: Option<OneOrMany>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    jti: Option<String>,
}

impl TryFrom<RawClaims> for ClaimSet {
    type Error = String;

    fn try_from(raw: RawClaims) -> Result<Self, Self::Error> {
        let subject_id = raw
            .nameid
            .or(raw.sub)
            .ok_or_else(|| "missing subject claim (nameid)".to_string())?;
        let exp = raw
            .exp
            .ok_or_else(|| "missing expiration claim (exp)".to_string())?;

        let mut roles = raw.role.map(OneOrMany::into_vec).unwrap_or_default();
        for role in raw.ms_role.map(OneOrMany::into_vec).unwrap_or_default() {
            if !roles.contains(&role) {
                roles.push(role);
            }
        }

        Ok(Self {
            subject_id,
            name: raw.name.or(raw.unique_name).unwrap_or_default(),
            email: raw.email.unwrap_or_default(),
            roles,
            exp,
            iat: raw.iat,
            nbf: raw.nbf,
            iss: raw.iss,
            audience: raw.aud.map(OneOrMany::into_vec).unwrap_or_default(),
            jti: raw.jti,
        })
    }
}

impl From<ClaimSet> for RawClaims {
    fn from(claims: ClaimSet) -> Self {
        Self {
            nameid: Some(claims.subject_id),
            name: Some(claims.name).filter(|s| !s.is_empty()),
            email: Some(claims.email).filter(|s| !s.is_empty()),
            role: OneOrMany::from_vec(claims.roles),
            exp: Some(claims.exp),
            iat: claims.iat,
            nbf: claims.nbf,
            iss: claims.iss,
            aud: OneOrMany::from_vec(claims.audience),
            jti: claims.jti,
            ..Default::default()
        }
    }
}

// =============================================================================
// ClaimSet Builder
// =============================================================================

/// Builder for constructing claim sets.
#[derive(Debug)]
pub struct ClaimSetBuilder {
    subject_id: String,
    name: String,
    email: String,
    roles: Vec<String>,
    expires_in_secs: i64,
    issuer: Option<String>,
    audience: Vec<String>,
}

impl ClaimSetBuilder {
    /// Creates a new builder.
    pub fn new(subject_id: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            name: String::new(),
            email: String::new(),
            roles: Vec::new(),
            expires_in_secs: 3600,
            issuer: None,
            audience: Vec::new(),
        }
    }

    /// Sets the display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the email.
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Sets the roles.
    pub fn roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a role.
    pub fn add_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    /// Sets the lifetime in seconds. Negative values produce an already
    /// expired token.
    pub fn expires_in(mut self, seconds: i64) -> Self {
        self.expires_in_secs = seconds;
        self
    }

    /// Sets the issuer.
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Adds an audience.
    pub fn audience(mut self, audience: impl Into<String>) -> Self {
        self.audience.push(audience.into());
        self
    }

    /// Builds the claims.
    pub fn build(self) -> ClaimSet {
        let now = Utc::now().timestamp();

        ClaimSet {
            subject_id: self.subject_id,
            name: self.name,
            email: self.email,
            roles: self.roles,
            exp: now + self.expires_in_secs,
            iat: Some(now),
            nbf: None,
            iss: self.issuer,
            audience: self.audience,
            jti: Some(Uuid::now_v7().to_string()),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

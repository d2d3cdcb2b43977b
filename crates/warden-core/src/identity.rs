// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Identity resolution from the current session.
//!
//! Nothing here is cached. Every call reads the session slot and decodes the
//! token again, so a logout or an expiry is observed on the very next check.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::claims::ClaimSet;
use crate::codec::TokenCodec;
use crate::error::AuthResult;
use crate::session::{SessionStore, SessionToken};

// =============================================================================
// Identity
// =============================================================================

/// The signed-in account, projected from a valid token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Account id.
    pub id: String,
    /// Display name.
    pub full_name: String,
    /// Account email.
    pub email: String,
    /// Role names.
    pub roles: Vec<String>,
}

impl Identity {
    /// Returns `true` if the identity holds `role` (case-sensitive).
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Returns `true` if the identity holds at least one of `roles`.
    pub fn has_any_role<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        roles.iter().any(|role| self.has_role(role.as_ref()))
    }
}

impl From<ClaimSet> for Identity {
    fn from(claims: ClaimSet) -> Self {
        Self {
            id: claims.subject_id,
            full_name: claims.name,
            email: claims.email,
            roles: claims.roles,
        }
    }
}

impl From<&ClaimSet> for Identity {
    fn from(claims: &ClaimSet) -> Self {
        claims.clone().into()
    }
}

// =============================================================================
// IdentityResolver
// =============================================================================

/// Derives the current identity from the session slot.
#[derive(Clone)]
pub struct IdentityResolver {
    store: Arc<dyn SessionStore>,
    codec: TokenCodec,
}

impl IdentityResolver {
    /// Creates a resolver over `store`, decoding with `codec`.
    pub fn new(store: Arc<dyn SessionStore>, codec: TokenCodec) -> Self {
        Self { store, codec }
    }

    /// Returns the underlying session store.
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Returns the codec.
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Returns the current identity, or `None` when there is no valid
    /// session.
    pub fn current_identity(&self) -> Option<Identity> {
        self.current_identity_at(Utc::now())
    }

    /// Like [`current_identity`](Self::current_identity), evaluated at `now`.
    pub fn current_identity_at(&self, now: DateTime<Utc>) -> Option<Identity> {
        self.valid_session(now).map(|(_, claims)| claims.into())
    }

    /// Returns `true` if a valid, unexpired session exists right now.
    pub fn is_logged_in(&self) -> bool {
        self.current_identity().is_some()
    }

    /// Returns the roles of the current identity.
    pub fn roles(&self) -> Option<Vec<String>> {
        self.current_identity().map(|identity| identity.roles)
    }

    /// Returns the stored token, but only while it is still valid.
    pub fn token(&self) -> Option<SessionToken> {
        self.valid_session(Utc::now()).map(|(token, _)| token)
    }

    /// Returns the claims of the current session.
    pub fn claims(&self) -> Option<ClaimSet> {
        self.valid_session(Utc::now()).map(|(_, claims)| claims)
    }

    /// Ends the current session.
    pub fn logout(&self) -> AuthResult<()> {
        self.store.clear()
    }

    fn valid_session(&self, now: DateTime<Utc>) -> Option<(SessionToken, ClaimSet)> {
        let token = match self.store.read() {
            Ok(Some(token)) => token,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(store = self.store.name(), error = %e, "Failed to read session");
                return None;
            }
        };

        let claims = match self.codec.decode(token.as_str()) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::warn!(error = %e, "Stored token is unreadable, clearing session");
                self.discard(&token);
                return None;
            }
        };

        if self.codec.is_expired_at(&claims, now) {
            tracing::info!(subject = %claims.subject_id, "Session expired, clearing");
            self.discard(&token);
            return None;
        }

        Some((token, claims))
    }

    /// Clears the slot unless it was replaced after `stale` was read.
    fn discard(&self, stale: &SessionToken) {
        if let Err(e) = self.store.clear_if(stale) {
            tracing::warn!(store = self.store.name(), error = %e, "Failed to clear session");
        }
    }
}

impl std::fmt::Debug for IdentityResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityResolver")
            .field("store", &self.store.name())
            .field("codec", &self.codec)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::JwtConfig;
    use crate::session::MemorySessionStore;

    const SECRET: &str = "test-secret-key-that-is-long-enough-for-testing";

    fn issue(claims: &ClaimSet) -> String {
        TokenCodec::new(JwtConfig::new(SECRET))
            .unwrap()
            .encode(claims)
            .unwrap()
    }

    fn resolver(store: &MemorySessionStore) -> IdentityResolver {
        IdentityResolver::new(Arc::new(store.clone()), TokenCodec::insecure())
    }

    #[test]
    fn test_no_session() {
        let store = MemorySessionStore::new();
        let resolver = resolver(&store);

        assert_eq!(resolver.current_identity(), None);
        assert!(!resolver.is_logged_in());
        assert_eq!(resolver.roles(), None);
    }

    #[test]
    fn test_valid_session_projects_identity() {
        let claims = ClaimSet::builder("42")
            .name("Ada Lovelace")
            .email("ada@example.com")
            .add_role("Admin")
            .build();
        let store = MemorySessionStore::with_token(issue(&claims));
        let resolver = resolver(&store);

        let identity = resolver.current_identity().unwrap();
        assert_eq!(identity.id, "42");
        assert_eq!(identity.full_name, "Ada Lovelace");
        assert_eq!(identity.email, "ada@example.com");
        assert_eq!(identity.roles, vec!["Admin".to_string()]);
        assert!(resolver.token().is_some());
    }

    #[test]
    fn test_expired_session_is_cleared() {
        let claims = ClaimSet::builder("42").expires_in(-1).build();
        let store = MemorySessionStore::with_token(issue(&claims));
        let resolver = resolver(&store);

        assert!(!resolver.is_logged_in());
        assert!(!store.is_occupied());
    }

    #[test]
    fn test_expiry_detected_on_later_check() {
        let claims = ClaimSet::builder("42").expires_in(60).build();
        let store = MemorySessionStore::with_token(issue(&claims));
        let resolver = resolver(&store);

        assert!(resolver.current_identity().is_some());

        let later = Utc::now() + chrono::Duration::seconds(120);
        assert_eq!(resolver.current_identity_at(later), None);
        assert!(!store.is_occupied());
    }

    #[test]
    fn test_malformed_session_is_cleared() {
        let store = MemorySessionStore::with_token("garbage");
        let resolver = resolver(&store);

        assert_eq!(resolver.current_identity(), None);
        assert!(!store.is_occupied());
    }

    #[test]
    fn test_logout() {
        let store = MemorySessionStore::with_token(issue(&ClaimSet::builder("1").build()));
        let resolver = resolver(&store);
        assert!(resolver.is_logged_in());

        resolver.logout().unwrap();
        assert!(!resolver.is_logged_in());
    }

    #[test]
    fn test_identity_role_checks() {
        let identity = Identity {
            id: "1".into(),
            full_name: "Ada".into(),
            email: "ada@example.com".into(),
            roles: vec!["Editor".into(), "User".into()],
        };

        assert!(identity.has_any_role(&["Admin", "Editor"]));
        assert!(!identity.has_any_role(&["Admin", "editor"]));
        assert!(!identity.has_any_role::<&str>(&[]));
    }
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Session Integration Tests
//!
//! Token decoding, session storage and identity resolution together.
//!
//! ## Test Categories
//!
//! - `test_codec_*`: Token encoding and decoding
//! - `test_resolver_*`: Identity derivation and session validity
//! - `test_store_*`: Session slot behavior across instances and threads

use std::sync::Arc;
use std::thread;

use chrono::{Duration as ChronoDuration, Utc};
use serde_json::json;
use warden_core::{
    DecodeError, FileSessionStore, IdentityResolver, JwtConfig, MemorySessionStore, SessionStore,
    SessionToken, TokenCodec,
};
use warden_tests::prelude::*;

fn resolver_over(store: &MemorySessionStore, codec: TokenCodec) -> IdentityResolver {
    IdentityResolver::new(Arc::new(store.clone()), codec)
}

// =============================================================================
// Codec Tests
// =============================================================================

#[test]
fn test_codec_round_trip() {
    let codec = TokenFixtures::verifier();
    let claims = TokenFixtures::claims(&["Admin", "User"]);

    let token = codec.encode(&claims).expect("encode");
    let decoded = codec.decode(&token).expect("decode");

    assert_eq!(decoded, claims);
}

#[test]
fn test_codec_rejects_foreign_signature() {
    let codec = TokenFixtures::verifier();
    let token = TokenFixtures::foreign(&["Admin"]);

    assert_eq!(codec.decode(token.as_str()), Err(DecodeError::InvalidSignature));
}

#[test]
fn test_codec_shape_only_accepts_foreign_signature() {
    let token = TokenFixtures::foreign(&["Admin"]);

    let claims = TokenCodec::insecure().decode(token.as_str()).expect("decode");
    assert_eq!(claims.roles, vec!["Admin"]);
}

#[test]
fn test_codec_malformed_tokens() {
    let codec = TokenCodec::insecure();

    for token in ["", "   ", "not-a-token", "a.b", "a.b.c", "!!!.???.***"] {
        assert!(
            matches!(codec.decode(token), Err(DecodeError::Malformed { .. })),
            "expected '{}' to be malformed",
            token
        );
    }
}

#[test]
fn test_codec_missing_expiry_is_malformed() {
    let token = TokenFixtures::raw(&json!({"nameid": "user-001", "role": "Admin"}));

    let result = TokenCodec::insecure().decode(token.as_str());
    assert!(matches!(result, Err(DecodeError::Malformed { .. })));
}

#[test]
fn test_codec_decode_unexpired() {
    let codec = TokenFixtures::verifier();
    let expired = TokenFixtures::expired(&["User"], 1);

    assert!(codec.decode(expired.as_str()).is_ok());
    assert_eq!(codec.decode_unexpired(expired.as_str()), Err(DecodeError::Expired));
}

#[test]
fn test_codec_leeway() {
    let codec = TokenCodec::new(JwtConfig::new(TEST_SECRET).with_leeway(60)).unwrap();
    let claims = codec
        .decode(TokenFixtures::expired(&[], 30).as_str())
        .unwrap();

    assert!(!codec.is_expired(&claims));
    assert!(claims.is_expired());
}

#[test]
fn test_codec_verifying_config_requires_key() {
    let config = JwtConfig {
        verify_signature: true,
        ..JwtConfig::default()
    };
    assert!(TokenCodec::new(config).is_err());
}

// =============================================================================
// Resolver Tests
// =============================================================================

#[test]
fn test_resolver_valid_token() {
    init_test_logging();
    let store = MemorySessionStore::with_token(TokenFixtures::valid(&["Admin", "User"]));
    let resolver = resolver_over(&store, TokenCodec::insecure());

    resolver.assert_logged_in_as(TEST_USER_ID);
    resolver.assert_roles(&["Admin", "User"]);

    let identity = resolver.current_identity().unwrap();
    assert_eq!(identity.full_name, "Ada Lovelace");
    assert_eq!(identity.email, TEST_EMAIL);
}

#[test]
fn test_resolver_single_string_role() {
    let store = MemorySessionStore::with_token(TokenFixtures::single_string_role("Admin"));
    let resolver = resolver_over(&store, TokenFixtures::verifier());

    resolver.assert_roles(&["Admin"]);
}

#[test]
fn test_resolver_long_form_role_claim() {
    let token = TokenFixtures::raw(&json!({
        "nameid": TEST_USER_ID,
        "exp": Utc::now().timestamp() + 600,
        "http://schemas.microsoft.com/ws/2008/06/identity/claims/role": ["Manager", "User"],
    }));
    let store = MemorySessionStore::with_token(token);
    let resolver = resolver_over(&store, TokenCodec::insecure());

    resolver.assert_roles(&["Manager", "User"]);
}

#[test]
fn test_resolver_expired_one_second_ago() {
    let store = MemorySessionStore::with_token(TokenFixtures::expired(&["Admin"], 1));
    let resolver = resolver_over(&store, TokenCodec::insecure());

    assert!(!resolver.is_logged_in());
    assert_slot(&store, None);
}

#[test]
fn test_resolver_expired_tokens_always_cleared() {
    for seconds_ago in [1, 60, 3600, 86_400 * 30] {
        let store = MemorySessionStore::with_token(TokenFixtures::expired(&["User"], seconds_ago));
        let resolver = resolver_over(&store, TokenCodec::insecure());

        assert!(resolver.current_identity().is_none());
        assert!(!store.is_occupied(), "expired {}s ago was not cleared", seconds_ago);
    }
}

#[test]
fn test_resolver_expiry_is_checked_lazily() {
    let store = MemorySessionStore::with_token(TokenFixtures::valid(&["User"]));
    let resolver = resolver_over(&store, TokenCodec::insecure());

    let later = Utc::now() + ChronoDuration::hours(2);
    assert!(resolver.current_identity().is_some());
    assert!(store.is_occupied());

    assert!(resolver.current_identity_at(later).is_none());
    assert!(!store.is_occupied());
}

#[test]
fn test_resolver_malformed_token_clears_session() {
    let store = MemorySessionStore::with_token(TokenFixtures::malformed());
    let resolver = resolver_over(&store, TokenCodec::insecure());

    resolver.assert_logged_out();
    assert_slot(&store, None);
}

#[test]
fn test_resolver_foreign_token_cleared_when_verifying() {
    let store = MemorySessionStore::with_token(TokenFixtures::foreign(&["Admin"]));
    let resolver = resolver_over(&store, TokenFixtures::verifier());

    resolver.assert_logged_out();
    assert!(!store.is_occupied());
}

#[test]
fn test_resolver_token_only_while_valid() {
    let store = MemorySessionStore::with_token(TokenFixtures::expired(&[], 5));
    let resolver = resolver_over(&store, TokenCodec::insecure());

    assert_eq!(resolver.token(), None);
    assert_eq!(resolver.claims(), None);
}

#[test]
fn test_resolver_logout_regardless_of_state() {
    let states = [
        None,
        Some(TokenFixtures::valid(&["Admin"])),
        Some(TokenFixtures::expired(&["Admin"], 10)),
        Some(TokenFixtures::malformed()),
    ];

    for state in states {
        let store = MemorySessionStore::new();
        if let Some(token) = state {
            store.save(&token).unwrap();
        }
        let resolver = resolver_over(&store, TokenCodec::insecure());

        resolver.logout().expect("logout");
        assert!(!resolver.is_logged_in());
        assert_slot(&store, None);
    }
}

#[test]
fn test_resolver_read_failure_is_logged_out() {
    let store = Arc::new(FlakySessionStore::new());
    store.save(&TokenFixtures::valid(&["User"])).unwrap();
    store.fail_reads(true);

    let resolver = IdentityResolver::new(store.clone(), TokenCodec::insecure());

    assert!(!resolver.is_logged_in());
    assert_eq!(store.clear_count(), 0);
    assert!(store.peek().is_some());
}

#[test]
fn test_resolver_clear_failure_is_not_fatal() {
    let store = Arc::new(FlakySessionStore::new());
    store.save(&TokenFixtures::expired(&["User"], 1)).unwrap();
    store.fail_writes(true);

    let resolver = IdentityResolver::new(store.clone(), TokenCodec::insecure());

    assert!(resolver.current_identity().is_none());
    assert_eq!(store.clear_count(), 1);
}

#[test]
fn test_resolver_keeps_token_saved_during_expiry_check() {
    let store = Arc::new(FlakySessionStore::new());
    store.save(&TokenFixtures::expired(&["User"], 1)).unwrap();
    let fresh = TokenFixtures::valid(&["Admin"]);
    store.save_after_next_read(fresh.clone());

    let resolver = IdentityResolver::new(store.clone(), TokenCodec::insecure());

    assert!(resolver.current_identity().is_none());
    assert_eq!(store.clear_count(), 0);
    assert_eq!(store.peek(), Some(fresh));
    resolver.assert_roles(&["Admin"]);
}

// =============================================================================
// Store Tests
// =============================================================================

#[test]
fn test_store_file_survives_restart() {
    let dir = temp_test_dir("warden-session");
    let path = dir.path().join("nested").join("session.json");
    let token = TokenFixtures::valid(&["User"]);

    FileSessionStore::new(&path).save(&token).unwrap();

    let resolver = IdentityResolver::new(Arc::new(FileSessionStore::new(&path)), TokenCodec::insecure());
    resolver.assert_logged_in_as(TEST_USER_ID);
}

#[test]
fn test_store_file_keys_are_independent() {
    let dir = temp_test_dir("warden-session");
    let path = dir.path().join("session.json");
    let primary = FileSessionStore::with_key(&path, "token");
    let secondary = FileSessionStore::with_key(&path, "refresh");

    primary.save(&SessionToken::new("a.b.c")).unwrap();
    secondary.save(&SessionToken::new("d.e.f")).unwrap();
    primary.clear().unwrap();

    assert_slot(&primary, None);
    assert_slot(&secondary, Some(&SessionToken::new("d.e.f")));
}

#[test]
fn test_store_corrupt_file_is_logged_out() {
    let dir = temp_test_dir("warden-session");
    let path = dir.path().join("session.json");
    std::fs::write(&path, "{ not json").unwrap();

    let store = FileSessionStore::new(&path);
    assert!(store.read().is_err());

    let resolver = IdentityResolver::new(Arc::new(store), TokenCodec::insecure());
    assert!(!resolver.is_logged_in());
}

#[test]
fn test_store_save_visible_to_later_read_across_threads() {
    let store = MemorySessionStore::new();
    let token = TokenFixtures::valid(&["User"]);

    let writer = {
        let store = store.clone();
        let token = token.clone();
        thread::spawn(move || store.save(&token).unwrap())
    };
    writer.join().unwrap();

    let reader = {
        let store = store.clone();
        thread::spawn(move || store.read().unwrap())
    };
    assert_eq!(reader.join().unwrap(), Some(token));
}

#[test]
fn test_store_last_write_wins() {
    let store = MemorySessionStore::new();
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = store.clone();
            thread::spawn(move || store.save(&SessionToken::new(format!("t{}", i))).unwrap())
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let value = store.read().unwrap().expect("one write survives");
    assert!(value.as_str().starts_with('t'));
}

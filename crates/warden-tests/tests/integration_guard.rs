// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Access Guard Integration Tests
//!
//! The authorization policy, the guard's side effects, and route metadata.
//!
//! ## Test Categories
//!
//! - `test_policy_*`: The pure policy function
//! - `test_guard_*`: Guard outcomes and collaborator calls
//! - `test_routes_*`: Route table lookup

use std::time::Duration;

use warden_core::{
    authorize, AuthorizationOutcome, GuardConfig, Identity, MemorySessionStore, RouteRule,
    RouteTable, SessionStore,
};
use warden_tests::prelude::*;

const UNIVERSE: [&str; 3] = ["Admin", "Editor", "User"];

fn subsets() -> Vec<Vec<&'static str>> {
    (0..(1u8 << UNIVERSE.len()))
        .map(|mask| {
            UNIVERSE
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, role)| *role)
                .collect()
        })
        .collect()
}

fn identity(roles: &[&str]) -> Identity {
    Identity {
        id: TEST_USER_ID.to_string(),
        full_name: "Ada Lovelace".to_string(),
        email: TEST_EMAIL.to_string(),
        roles: roles.iter().map(|r| r.to_string()).collect(),
    }
}

// =============================================================================
// Policy Tests
// =============================================================================

#[test]
fn test_policy_exhaustive() {
    for required in subsets() {
        assert_outcome(
            authorize(&required, None),
            AuthorizationOutcome::RedirectToLogin,
        );

        for held in subsets() {
            let expected = if required.is_empty() || required.iter().any(|r| held.contains(r)) {
                AuthorizationOutcome::Allowed
            } else {
                AuthorizationOutcome::Denied
            };
            assert_eq!(
                authorize(&required, Some(&identity(&held))),
                expected,
                "required {:?}, held {:?}",
                required,
                held
            );
        }
    }
}

#[test]
fn test_policy_single_string_role_scenario() {
    let harness = ClientHarness::new();
    harness
        .store
        .save(&TokenFixtures::single_string_role("Admin"))
        .unwrap();

    harness.resolver.assert_roles(&["Admin"]);
    assert_outcome(
        harness.guard.check(&["Admin", "Editor"]),
        AuthorizationOutcome::Allowed,
    );
}

#[test]
fn test_policy_role_names_are_exact() {
    let outcome = authorize(&["admin"], Some(&identity(&["Admin"])));
    assert_outcome(outcome, AuthorizationOutcome::Denied);
}

// =============================================================================
// Guard Tests
// =============================================================================

#[test]
fn test_guard_no_token_redirects_to_login() {
    init_test_logging();
    let harness = ClientHarness::new();

    let outcome = harness.guard.check(&["Admin"]);

    assert_outcome(outcome, AuthorizationOutcome::RedirectToLogin);
    assert_eq!(harness.navigator.paths(), vec!["/login"]);
    assert_eq!(
        harness.notifier.notices(),
        vec![(
            "You must log in to view this page.".to_string(),
            Duration::from_millis(5000)
        )]
    );
}

#[test]
fn test_guard_wrong_role_goes_home() {
    let harness = ClientHarness::new();
    harness.store.save(&TokenFixtures::valid(&["User"])).unwrap();

    let outcome = harness.guard.check(&["Admin"]);

    assert_outcome(outcome, AuthorizationOutcome::Denied);
    assert_eq!(harness.navigator.paths(), vec!["/"]);
    assert_eq!(harness.notifier.notices()[0].0, "You do not have permission to view this page");
}

#[test]
fn test_guard_allowed_has_no_side_effects() {
    let harness = ClientHarness::new();
    harness.store.save(&TokenFixtures::valid(&["Admin"])).unwrap();

    assert!(harness.guard.can_activate(&["Admin"]));
    assert!(harness.guard.can_activate::<&str>(&[]));
    assert!(harness.navigator.paths().is_empty());
    assert!(harness.notifier.notices().is_empty());
}

#[test]
fn test_guard_evaluate_has_no_side_effects() {
    let harness = ClientHarness::new();

    assert_outcome(
        harness.guard.evaluate(&["Admin"]),
        AuthorizationOutcome::RedirectToLogin,
    );
    assert!(harness.navigator.paths().is_empty());
}

#[test]
fn test_guard_expired_session_redirects_and_clears() {
    let harness = ClientHarness::new();
    harness
        .store
        .save(&TokenFixtures::expired(&["Admin"], 1))
        .unwrap();

    assert_outcome(
        harness.guard.check(&["Admin"]),
        AuthorizationOutcome::RedirectToLogin,
    );
    assert_slot(&harness.store, None);
}

#[test]
fn test_guard_rereads_session_each_check() {
    let harness = ClientHarness::new();
    assert!(!harness.guard.can_activate::<&str>(&[]));

    harness.store.save(&TokenFixtures::valid(&[])).unwrap();
    assert!(harness.guard.can_activate::<&str>(&[]));

    harness.resolver.logout().unwrap();
    assert!(!harness.guard.can_activate::<&str>(&[]));
}

#[test]
fn test_guard_custom_destinations() {
    let harness = ClientHarness::new();
    let config = GuardConfig {
        login_path: "/account/login".to_string(),
        notice_duration_ms: 1500,
        login_required_message: "Please sign in".to_string(),
        ..GuardConfig::default()
    };
    let guard = harness.guard.clone().with_config(config);

    guard.check(&["Admin"]);

    assert_eq!(harness.navigator.paths(), vec!["/account/login"]);
    assert_eq!(
        harness.notifier.notices(),
        vec![("Please sign in".to_string(), Duration::from_millis(1500))]
    );
}

// =============================================================================
// Route Tests
// =============================================================================

fn route_table() -> RouteTable {
    RouteTable::new()
        .with_rule(RouteRule::new("/roles", ["Admin"]))
        .with_rule(RouteRule::new("/admin/*", ["Admin"]))
        .with_rule(RouteRule::new("/admin/reports/*", ["Admin", "Manager"]))
        .with_rule(RouteRule::new("/account/*", Vec::<String>::new()))
}

#[test]
fn test_routes_lookup_precedence() {
    let table = route_table();

    assert_eq!(table.lookup("/roles").unwrap().path, "/roles");
    assert!(table.lookup("/roles/1").is_none());
    assert_eq!(table.lookup("/admin").unwrap().path, "/admin/*");
    assert_eq!(table.lookup("/admin/users").unwrap().path, "/admin/*");
    assert_eq!(table.lookup("/admin/reports/q1").unwrap().path, "/admin/reports/*");
    assert!(table.lookup("/administrator").is_none());
    assert!(table.lookup("/").is_none());
    assert!(table.validate().is_ok());
}

#[test]
fn test_routes_validation() {
    let bad_paths = ["admin", "/adm*n", "/admin/*/x"];
    for path in bad_paths {
        let table = RouteTable::new().with_rule(RouteRule::new(path, ["Admin"]));
        assert!(table.validate().is_err(), "'{}' should be rejected", path);
    }

    let blank_role = RouteTable::new().with_rule(RouteRule::new("/x", [" "]));
    assert!(blank_role.validate().is_err());
}

#[test]
fn test_routes_guarded_by_table() {
    let harness = ClientHarness::new();
    let guard = harness.guard.clone().with_config(GuardConfig {
        routes: route_table(),
        ..GuardConfig::default()
    });

    assert_outcome(guard.check_route("/about"), AuthorizationOutcome::Allowed);
    assert_outcome(
        guard.check_route("/account/profile"),
        AuthorizationOutcome::RedirectToLogin,
    );

    harness.store.save(&TokenFixtures::valid(&["Manager"])).unwrap();
    assert_outcome(guard.check_route("/account/profile"), AuthorizationOutcome::Allowed);
    assert_outcome(guard.check_route("/admin/users"), AuthorizationOutcome::Denied);
    assert_outcome(guard.check_route("/admin/reports/q1"), AuthorizationOutcome::Allowed);
}

#[test]
fn test_routes_from_serialized_metadata() {
    let config: GuardConfig = serde_json::from_value(serde_json::json!({
        "routes": [
            {"path": "/roles", "roles": ["Admin"]},
            {"path": "/profile"}
        ]
    }))
    .unwrap();

    assert_eq!(config.login_path, "/login");
    assert_eq!(config.routes.lookup("/profile").unwrap().roles, Vec::<String>::new());

    let store = MemorySessionStore::with_token(TokenFixtures::valid(&["User"]));
    let resolver = warden_core::IdentityResolver::new(
        std::sync::Arc::new(store),
        warden_core::TokenCodec::insecure(),
    );
    let guard = warden_core::AccessGuard::new(resolver).with_config(config);
    assert_outcome(guard.evaluate(&["Admin"]), AuthorizationOutcome::Denied);
    assert!(!guard.check_route("/roles").is_allowed());
    assert!(guard.check_route("/profile").is_allowed());
}

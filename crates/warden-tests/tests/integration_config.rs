// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Config Integration Tests
//!
//! Loading complete configuration files and building components from them.

use std::collections::HashMap;
use std::sync::Arc;

use warden_config::{ConfigError, ConfigFormat, ConfigLoader, SessionBackend};
use warden_core::{
    AccessGuard, AuthorizationOutcome, FileSessionStore, IdentityResolver, SessionStore,
    TokenCodec,
};
use warden_tests::prelude::*;

const FULL_CONFIG: &str = r#"
client:
  api_url: ${IDP_URL:https://id.example.com/api/}
  timeout_secs: 15

session:
  backend: file
  path: state/session.json
  key: token

token:
  secret: ${WARDEN_TEST_SECRET}
  verify_signature: true
  leeway_secs: 5

guard:
  login_path: /account/login
  notice_duration_ms: 3000
  routes:
    - path: /roles
      roles: [Admin]
    - path: /admin/*
      roles: [Admin, Manager]
    - path: /profile

logging:
  level: debug
  format: json
"#;

fn loader_with(vars: &[(&str, &str)]) -> ConfigLoader {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    ConfigLoader::new().with_env_source(move |name: &str| vars.get(name).cloned())
}

#[test]
fn test_config_full_file() {
    let dir = temp_test_dir("warden-config");
    let path = dir.path().join("warden.yaml");
    std::fs::write(&path, FULL_CONFIG).unwrap();

    let config = loader_with(&[("WARDEN_TEST_SECRET", TEST_SECRET)])
        .load(&path)
        .unwrap();

    assert_eq!(config.client.api_url, "https://id.example.com/api/");
    assert_eq!(config.client.timeout_secs, 15);
    assert_eq!(config.session.backend, SessionBackend::File);
    assert_eq!(config.session.path, dir.path().join("state/session.json"));
    assert!(config.token.verify_signature);
    assert_eq!(config.token.secret, TEST_SECRET);
    assert_eq!(config.guard.login_path, "/account/login");
    assert_eq!(config.guard.routes.rules().len(), 3);
}

#[test]
fn test_config_env_overrides_win() {
    let config = loader_with(&[
        ("WARDEN_TEST_SECRET", TEST_SECRET),
        ("IDP_URL", "https://staging.example.com/api/"),
        ("WARDEN_SESSION_BACKEND", "memory"),
        ("WARDEN_TIMEOUT_SECS", "5"),
    ])
    .load_from_str(FULL_CONFIG, ConfigFormat::Yaml)
    .unwrap();

    assert_eq!(config.client.api_url, "https://staging.example.com/api/");
    assert_eq!(config.session.backend, SessionBackend::Memory);
    assert_eq!(config.client.timeout_secs, 5);
}

#[test]
fn test_config_verification_without_secret_rejected() {
    let content = "token:\n  verify_signature: true\n";
    let result = loader_with(&[]).load_from_str(content, ConfigFormat::Yaml);

    assert!(matches!(result, Err(ConfigError::Validation { .. })));
}

#[test]
fn test_config_bad_route_rejected() {
    let content = "guard:\n  routes:\n    - path: admin\n      roles: [Admin]\n";
    let result = loader_with(&[]).load_from_str(content, ConfigFormat::Yaml);

    assert!(matches!(result, Err(ConfigError::Validation { .. })));
}

#[test]
fn test_config_unknown_section_rejected() {
    let result = loader_with(&[]).load_from_str("gateway:\n  id: x\n", ConfigFormat::Yaml);
    assert!(result.is_err());
}

#[test]
fn test_config_toml_equivalent() {
    let content = r#"
[client]
api_url = "https://id.example.com/api/"

[session]
backend = "memory"

[[guard.routes]]
path = "/roles"
roles = ["Admin"]
"#;
    let config = loader_with(&[]).load_from_str(content, ConfigFormat::Toml).unwrap();

    assert_eq!(config.session.backend, SessionBackend::Memory);
    assert_eq!(config.guard.routes.lookup("/roles").unwrap().roles, vec!["Admin"]);
}

#[test]
fn test_config_drives_components() {
    let dir = temp_test_dir("warden-config");
    let path = dir.path().join("warden.yaml");
    std::fs::write(&path, FULL_CONFIG).unwrap();
    let config = loader_with(&[("WARDEN_TEST_SECRET", TEST_SECRET)])
        .load(&path)
        .unwrap();

    let store = FileSessionStore::with_key(&config.session.path, &config.session.key);
    store.save(&TokenFixtures::valid(&["Manager"])).unwrap();

    let codec = TokenCodec::new(config.token.clone()).unwrap();
    let resolver = IdentityResolver::new(Arc::new(store), codec);
    let guard = AccessGuard::new(resolver.clone()).with_config(config.guard.clone());

    assert_eq!(guard.check_route("/admin/users"), AuthorizationOutcome::Allowed);
    assert_eq!(guard.check_route("/roles"), AuthorizationOutcome::Denied);
    assert_eq!(guard.check_route("/profile"), AuthorizationOutcome::Allowed);

    // A token from another issuer is rejected by the verifying codec.
    resolver
        .store()
        .save(&TokenFixtures::foreign(&["Admin"]))
        .unwrap();
    assert_eq!(guard.check_route("/roles"), AuthorizationOutcome::RedirectToLogin);
    assert!(resolver.store().read().unwrap().is_none());
}

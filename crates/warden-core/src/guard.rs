// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Role-based access policy.
//!
//! The decision itself is the pure [`authorize`] function. [`AccessGuard`]
//! wires it to an [`IdentityResolver`] and performs the deny side effects
//! through the [`Navigator`] and [`Notifier`] collaborators, so any routing
//! or UI framework can bind to it with a thin adapter.
//!
//! # Policy
//!
//! - no valid session: [`AuthorizationOutcome::RedirectToLogin`]
//! - required role set empty, or sharing at least one role with the
//!   identity: [`AuthorizationOutcome::Allowed`]
//! - otherwise: [`AuthorizationOutcome::Denied`]
//!
//! Role names match exactly and case-sensitively. There is no hierarchy.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};
use crate::identity::{Identity, IdentityResolver};

// =============================================================================
// Policy
// =============================================================================

/// Result of a single authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationOutcome {
    /// Access granted.
    Allowed,
    /// No valid session; send the user to the login entry point.
    RedirectToLogin,
    /// Signed in but lacking every required role; send the user home.
    Denied,
}

impl AuthorizationOutcome {
    /// Returns `true` for [`Allowed`](Self::Allowed).
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Returns a short lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allowed => "allowed",
            Self::RedirectToLogin => "redirect_to_login",
            Self::Denied => "denied",
        }
    }
}

impl std::fmt::Display for AuthorizationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides access for `identity` against a required role set.
pub fn authorize<S: AsRef<str>>(required: &[S], identity: Option<&Identity>) -> AuthorizationOutcome {
    let Some(identity) = identity else {
        return AuthorizationOutcome::RedirectToLogin;
    };

    if required.is_empty() || identity.has_any_role(required) {
        AuthorizationOutcome::Allowed
    } else {
        AuthorizationOutcome::Denied
    }
}

// =============================================================================
// Collaborators
// =============================================================================

/// Moves the user to another location.
pub trait Navigator: Send + Sync {
    /// Navigates to `path`.
    fn navigate_to(&self, path: &str);
}

/// Shows a transient message to the user.
pub trait Notifier: Send + Sync {
    /// Shows `message` for `duration`.
    fn show_notice(&self, message: &str, duration: Duration);
}

impl<T: Navigator + ?Sized> Navigator for Arc<T> {
    fn navigate_to(&self, path: &str) {
        (**self).navigate_to(path)
    }
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn show_notice(&self, message: &str, duration: Duration) {
        (**self).show_notice(message, duration)
    }
}

/// Navigator that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate_to(&self, path: &str) {
        tracing::debug!(path, "Navigate");
    }
}

/// Notifier that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn show_notice(&self, message: &str, duration: Duration) {
        tracing::info!(duration_ms = duration.as_millis() as u64, "{}", message);
    }
}

// =============================================================================
// Route metadata
// =============================================================================

/// Required roles attached to a route.
///
/// `path` is either exact (`/admin`) or a prefix pattern (`/admin/*`). A
/// prefix pattern also covers the bare prefix itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRule {
    /// Route path or `prefix/*` pattern.
    pub path: String,
    /// Roles of which at least one is required. Empty means login only.
    #[serde(default)]
    pub roles: Vec<String>,
}

impl RouteRule {
    /// Creates a rule.
    pub fn new<I, S>(path: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    fn prefix(&self) -> Option<&str> {
        self.path.strip_suffix("/*")
    }

    fn matches(&self, path: &str) -> bool {
        match self.prefix() {
            Some(prefix) => {
                path == prefix
                    || path
                        .strip_prefix(prefix)
                        .is_some_and(|rest| rest.starts_with('/'))
            }
            None => self.path == path,
        }
    }
}

/// Lookup of route rules.
///
/// Exact rules win over prefix rules; among prefix rules the longest prefix
/// wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
}

impl RouteTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule.
    pub fn with_rule(mut self, rule: RouteRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds a rule in place.
    pub fn insert(&mut self, rule: RouteRule) {
        self.rules.push(rule);
    }

    /// Returns the rules.
    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    /// Returns `true` if the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the rule governing `path`, if any.
    pub fn lookup(&self, path: &str) -> Option<&RouteRule> {
        if let Some(exact) = self
            .rules
            .iter()
            .find(|rule| rule.prefix().is_none() && rule.path == path)
        {
            return Some(exact);
        }

        self.rules
            .iter()
            .filter(|rule| rule.prefix().is_some() && rule.matches(path))
            .max_by_key(|rule| rule.path.len())
    }

    /// Checks rule syntax.
    pub fn validate(&self) -> AuthResult<()> {
        for rule in &self.rules {
            if !rule.path.starts_with('/') {
                return Err(AuthError::configuration(format!(
                    "route '{}' must start with '/'",
                    rule.path
                )));
            }
            if rule.path.contains('*') && rule.prefix().is_none_or(|p| p.contains('*')) {
                return Err(AuthError::configuration(format!(
                    "route '{}': '*' is only allowed as a trailing '/*'",
                    rule.path
                )));
            }
            if rule.roles.iter().any(|r| r.trim().is_empty()) {
                return Err(AuthError::configuration(format!(
                    "route '{}' has a blank role name",
                    rule.path
                )));
            }
        }
        Ok(())
    }
}

impl FromIterator<RouteRule> for RouteTable {
    fn from_iter<T: IntoIterator<Item = RouteRule>>(iter: T) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

// =============================================================================
// GuardConfig
// =============================================================================

/// Guard destinations, notice texts, and route metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Login entry point.
    pub login_path: String,
    /// Default destination after a denial.
    pub home_path: String,
    /// How long notices stay visible, in milliseconds.
    pub notice_duration_ms: u64,
    /// Notice shown when no session exists.
    pub login_required_message: String,
    /// Notice shown when the roles do not match.
    pub forbidden_message: String,
    /// Protected routes.
    pub routes: RouteTable,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
            home_path: "/".to_string(),
            notice_duration_ms: 5000,
            login_required_message: "You must log in to view this page.".to_string(),
            forbidden_message: "You do not have permission to view this page".to_string(),
            routes: RouteTable::default(),
        }
    }
}

impl GuardConfig {
    /// Returns the notice duration.
    pub fn notice_duration(&self) -> Duration {
        Duration::from_millis(self.notice_duration_ms)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> AuthResult<()> {
        if self.login_path.is_empty() {
            return Err(AuthError::configuration("guard.login_path cannot be empty"));
        }
        if self.home_path.is_empty() {
            return Err(AuthError::configuration("guard.home_path cannot be empty"));
        }
        self.routes.validate()
    }
}

// =============================================================================
// AccessGuard
// =============================================================================

/// Authorizes actions against the current session.
///
/// Each check is independent: the session is re-read every time.
#[derive(Clone)]
pub struct AccessGuard {
    resolver: IdentityResolver,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    config: GuardConfig,
}

impl AccessGuard {
    /// Creates a guard with logging collaborators and default settings.
    pub fn new(resolver: IdentityResolver) -> Self {
        Self {
            resolver,
            navigator: Arc::new(LogNavigator),
            notifier: Arc::new(LogNotifier),
            config: GuardConfig::default(),
        }
    }

    /// Sets the navigator.
    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    /// Sets the notifier.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: GuardConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Returns the resolver.
    pub fn resolver(&self) -> &IdentityResolver {
        &self.resolver
    }

    /// Evaluates the policy for `required` without side effects.
    pub fn evaluate<S: AsRef<str>>(&self, required: &[S]) -> AuthorizationOutcome {
        let identity = self.resolver.current_identity();
        authorize(required, identity.as_ref())
    }

    /// Evaluates the policy and performs the side effects of a denial.
    pub fn check<S: AsRef<str>>(&self, required: &[S]) -> AuthorizationOutcome {
        let outcome = self.evaluate(required);
        self.apply(outcome);
        outcome
    }

    /// Returns `true` if access to an action requiring `required` is granted.
    pub fn can_activate<S: AsRef<str>>(&self, required: &[S]) -> bool {
        self.check(required).is_allowed()
    }

    /// Checks `path` against the route table.
    ///
    /// Paths without a rule are allowed without consulting the session.
    pub fn check_route(&self, path: &str) -> AuthorizationOutcome {
        match self.config.routes.lookup(path) {
            Some(rule) => {
                tracing::debug!(path, rule = %rule.path, "Route is protected");
                self.check(rule.roles.as_slice())
            }
            None => AuthorizationOutcome::Allowed,
        }
    }

    fn apply(&self, outcome: AuthorizationOutcome) {
        let duration = self.config.notice_duration();
        match outcome {
            AuthorizationOutcome::Allowed => {}
            AuthorizationOutcome::RedirectToLogin => {
                tracing::debug!("Access requires login");
                self.navigator.navigate_to(&self.config.login_path);
                self.notifier
                    .show_notice(&self.config.login_required_message, duration);
            }
            AuthorizationOutcome::Denied => {
                tracing::debug!("Access denied by role requirement");
                self.navigator.navigate_to(&self.config.home_path);
                self.notifier.show_notice(&self.config.forbidden_message, duration);
            }
        }
    }
}

impl std::fmt::Debug for AccessGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGuard")
            .field("resolver", &self.resolver)
            .field("config", &self.config)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

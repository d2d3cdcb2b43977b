// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Wiring of configuration into the client components.

use std::path::PathBuf;
use std::sync::Arc;

use warden_client::{AuthGateway, HttpTransport, RoleService, Transport};
use warden_config::{ConfigLoader, SessionBackend, SessionConfig, WardenConfig};
use warden_core::{
    AccessGuard, FileSessionStore, IdentityResolver, MemorySessionStore, SessionStore, TokenCodec,
};

use crate::cli::Cli;
use crate::error::BinResult;
use crate::terminal::{TerminalNavigator, TerminalNotifier};

/// Configuration file picked up from the working directory when `--config`
/// is not given.
pub const DEFAULT_CONFIG_FILE: &str = "warden.yaml";

// =============================================================================
// Configuration
// =============================================================================

/// Returns the configuration file to load, if any.
pub fn config_path(cli: &Cli) -> Option<PathBuf> {
    cli.config.clone().or_else(|| {
        let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
        fallback.exists().then_some(fallback)
    })
}

/// Loads the configuration for this invocation.
///
/// Without a configuration file, defaults plus environment overrides apply.
pub fn load_config(cli: &Cli) -> BinResult<WardenConfig> {
    let loader = ConfigLoader::new();
    let config = match config_path(cli) {
        Some(path) => loader.load(&path)?,
        None => loader.load_defaults()?,
    };
    Ok(config)
}

/// Builds the session store selected by the configuration.
pub fn build_store(config: &SessionConfig) -> Arc<dyn SessionStore> {
    match config.backend {
        SessionBackend::Memory => Arc::new(MemorySessionStore::new()),
        SessionBackend::File => Arc::new(FileSessionStore::with_key(&config.path, &config.key)),
    }
}

// =============================================================================
// AppContext
// =============================================================================

/// Client components built from one configuration.
pub struct AppContext {
    /// Effective configuration.
    pub config: WardenConfig,
    /// Session reader.
    pub resolver: IdentityResolver,
    /// Account endpoints.
    pub gateway: AuthGateway,
    /// Role endpoints.
    pub roles: RoleService,
    /// Access guard with terminal collaborators.
    pub guard: AccessGuard,
}

impl AppContext {
    /// Builds the context with an HTTP transport to the configured service.
    pub fn from_config(config: WardenConfig) -> BinResult<Self> {
        let transport =
            HttpTransport::with_timeout(config.client.api_url.clone(), config.client.timeout())?;
        let store = build_store(&config.session);
        Self::with_parts(config, store, Arc::new(transport))
    }

    /// Builds the context from explicit parts.
    pub fn with_parts(
        config: WardenConfig,
        store: Arc<dyn SessionStore>,
        transport: Arc<dyn Transport>,
    ) -> BinResult<Self> {
        let codec = TokenCodec::new(config.token.clone())?;
        let resolver = IdentityResolver::new(store, codec);

        let gateway = AuthGateway::new(Arc::clone(&transport), resolver.clone());
        let roles = RoleService::new(transport, resolver.clone());
        let guard = AccessGuard::new(resolver.clone())
            .with_navigator(Arc::new(TerminalNavigator))
            .with_notifier(Arc::new(TerminalNotifier))
            .with_config(config.guard.clone());

        tracing::debug!(
            api_url = %config.client.api_url,
            session = config.session.backend.as_str(),
            verify_signature = config.token.verify_signature,
            "Client context ready"
        );

        Ok(Self {
            config,
            resolver,
            gateway,
            roles,
            guard,
        })
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("api_url", &self.config.client.api_url)
            .field("session", &self.config.session.backend)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use warden_core::SessionToken;

    #[test]
    fn test_build_memory_store() {
        let config = SessionConfig {
            backend: SessionBackend::Memory,
            ..Default::default()
        };
        let store = build_store(&config);
        assert_eq!(store.name(), "memory");
        assert_eq!(store.read().unwrap(), None);
    }

    #[test]
    fn test_build_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = SessionConfig {
            backend: SessionBackend::File,
            path: dir.path().join("session.json"),
            key: "jwt".to_string(),
        };
        let store = build_store(&config);
        store.save(&SessionToken::new("a.b.c")).unwrap();

        let content = std::fs::read_to_string(dir.path().join("session.json")).unwrap();
        assert!(content.contains("\"jwt\""));
    }

    #[test]
    fn test_context_from_defaults() {
        let context = AppContext::from_config(WardenConfig::default()).unwrap();
        assert_eq!(context.config.session.backend, SessionBackend::File);
        assert_eq!(context.guard.config().login_path, "/login");
    }

    #[test]
    fn test_context_rejects_bad_url() {
        let mut config = WardenConfig::default();
        config.client.api_url = "ftp://example.com".to_string();
        assert!(AppContext::from_config(config).is_err());
    }
}

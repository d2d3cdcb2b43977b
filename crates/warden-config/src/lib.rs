// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # warden-config
//!
//! Configuration management for Warden.
//!
//! ## Features
//!
//! - **Schema Definition**: client, session, token, guard and logging sections
//!   with defaults and validation
//! - **Multi-Format Support**: YAML, TOML, and JSON configuration files
//! - **Environment Overrides**: `WARDEN_*` variables and `${VAR:default}`
//!   placeholders
//!
//! ## Quick Start
//!
//! ```no_run
//! use warden_config::loader::load_config;
//!
//! let config = load_config("warden.yaml").unwrap();
//! println!("API: {}", config.client.api_url);
//! ```
//!
//! ## Configuration Schema
//!
//! ```yaml
//! client:
//!   api_url: "http://localhost:5000/api/"
//!   timeout_secs: 30
//! session:
//!   backend: file          # or memory
//!   path: .warden/session.json
//!   key: token
//! token:
//!   verify_signature: false
//!   secret: "${WARDEN_SECRET:}"
//! guard:
//!   login_path: /login
//!   home_path: /
//!   routes:
//!     - path: /roles/*
//!       roles: [Admin]
//! logging:
//!   level: info
//!   format: text
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod error;
pub mod loader;
pub mod schema;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_config, load_config_str, ConfigFormat, ConfigLoader, EnvSource};
pub use schema::{
    ClientConfig, LogFormat, LogLevel, LoggingConfig, SessionBackend, SessionConfig, WardenConfig,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

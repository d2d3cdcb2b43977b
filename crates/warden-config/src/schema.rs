// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration schema definitions for Warden.
//!
//! # Schema Structure
//!
//! ```text
//! WardenConfig
//! ├── client: ClientConfig
//! ├── session: SessionConfig
//! ├── token: JwtConfig
//! ├── guard: GuardConfig
//! └── logging: LoggingConfig
//! ```
//!
//! Every section has defaults, so an empty file is a valid configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use warden_core::{GuardConfig, JwtConfig, DEFAULT_SESSION_KEY};

use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// Constants
// =============================================================================

/// Default identity service base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api/";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum request timeout in seconds.
pub const MAX_TIMEOUT_SECS: u64 = 600;

/// Default session file.
pub const DEFAULT_SESSION_PATH: &str = ".warden/session.json";

// =============================================================================
// Top-Level Configuration
// =============================================================================

/// The root configuration structure for Warden.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WardenConfig {
    /// Identity service client settings.
    #[serde(default)]
    pub client: ClientConfig,

    /// Session slot settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// Token codec settings.
    #[serde(default)]
    pub token: JwtConfig,

    /// Route guard settings.
    #[serde(default)]
    pub guard: GuardConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl WardenConfig {
    /// Validates the entire configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.client.validate()?;
        self.session.validate()?;
        self.token
            .validate()
            .map_err(|e| ConfigError::section("token", e))?;
        self.guard
            .validate()
            .map_err(|e| ConfigError::section("guard", e))?;
        self.logging.validate()?;
        Ok(())
    }
}

// =============================================================================
// Client Configuration
// =============================================================================

/// Identity service client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the identity service API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ClientConfig {
    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validates the client configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.api_url.is_empty() {
            return Err(ConfigError::validation("client.api_url", "cannot be empty"));
        }
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::validation(
                "client.api_url",
                "must start with http:// or https://",
            ));
        }
        if self.timeout_secs == 0 || self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::validation(
                "client.timeout_secs",
                format!("must be between 1 and {}", MAX_TIMEOUT_SECS),
            ));
        }
        Ok(())
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

// =============================================================================
// Session Configuration
// =============================================================================

/// Where the session token is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    /// Process memory; the session ends with the process.
    Memory,
    /// A JSON document on disk.
    #[default]
    File,
}

impl SessionBackend {
    /// Returns the backend name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionBackend::Memory => "memory",
            SessionBackend::File => "file",
        }
    }
}

impl std::str::FromStr for SessionBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(SessionBackend::Memory),
            "file" => Ok(SessionBackend::File),
            other => Err(format!("unknown session backend '{}'", other)),
        }
    }
}

/// Session slot settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Storage backend.
    #[serde(default)]
    pub backend: SessionBackend,

    /// Session file, for the file backend.
    #[serde(default = "default_session_path")]
    pub path: PathBuf,

    /// Key of the token inside the session document.
    #[serde(default = "default_session_key")]
    pub key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: SessionBackend::default(),
            path: default_session_path(),
            key: default_session_key(),
        }
    }
}

impl SessionConfig {
    /// Validates the session configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.key.trim().is_empty() {
            return Err(ConfigError::validation("session.key", "cannot be empty"));
        }
        if self.backend == SessionBackend::File && self.path.as_os_str().is_empty() {
            return Err(ConfigError::validation(
                "session.path",
                "is required for the file backend",
            ));
        }
        Ok(())
    }
}

fn default_session_path() -> PathBuf {
    PathBuf::from(DEFAULT_SESSION_PATH)
}

fn default_session_key() -> String {
    DEFAULT_SESSION_KEY.to_string()
}

// =============================================================================
// Logging Configuration
// =============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Log format.
    #[serde(default)]
    pub format: LogFormat,
}

impl LoggingConfig {
    /// Validates the logging configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        Ok(())
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Returns the level as an `EnvFilter` directive.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Parses a level name.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON for log aggregation.
    Json,
    /// Compact single-line output.
    Compact,
}

// =============================================================================
// Tests
// =============================================================================

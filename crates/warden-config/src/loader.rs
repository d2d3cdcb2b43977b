// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration loading for Warden.
//!
//! A file goes through these stages, in order:
//!
//! 1. `${VAR}` and `${VAR:default}` placeholders are expanded
//! 2. The text is parsed as YAML, TOML or JSON, picked by extension
//! 3. `WARDEN_*` variables override individual settings
//! 4. A relative session path is anchored at the config file's directory
//! 5. Every section is validated
//!
//! # Environment Overrides
//!
//! ```text
//! WARDEN_API_URL=https://id.example.com/api/
//! WARDEN_TIMEOUT_SECS=10
//! WARDEN_SESSION_BACKEND=memory
//! WARDEN_SESSION_PATH=/var/lib/warden/session.json
//! WARDEN_TOKEN_SECRET=...
//! WARDEN_LOG_LEVEL=debug
//! ```

use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::schema::{LogLevel, SessionBackend, WardenConfig};

/// Source of environment variable values.
pub type EnvSource = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::([^}]*))?\}")
        .expect("placeholder pattern is valid")
});

// =============================================================================
// ConfigLoader
// =============================================================================

/// Reads, expands and validates a [`WardenConfig`].
///
/// ```no_run
/// use warden_config::loader::ConfigLoader;
///
/// let config = ConfigLoader::new().load("warden.yaml").unwrap();
/// println!("{}", config.client.api_url);
/// ```
#[derive(Clone)]
pub struct ConfigLoader {
    prefix: String,
    expand_env: bool,
    env: EnvSource,
}

impl ConfigLoader {
    /// Creates a loader reading `WARDEN_*` from the process environment.
    pub fn new() -> Self {
        Self {
            prefix: "WARDEN".to_string(),
            expand_env: true,
            env: Arc::new(|name| std::env::var(name).ok()),
        }
    }

    /// Uses `prefix` instead of `WARDEN` for override variables.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Turns placeholder expansion and overrides on or off.
    pub fn with_env_vars(mut self, enabled: bool) -> Self {
        self.expand_env = enabled;
        self
    }

    /// Looks variables up through `source` instead of the process environment.
    pub fn with_env_source<F>(mut self, source: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env = Arc::new(source);
        self
    }

    /// Loads the file at `path`; `.yaml`/`.yml`, `.toml` and `.json` are accepted.
    pub fn load(&self, path: impl AsRef<Path>) -> ConfigResult<WardenConfig> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading configuration");

        let format = ConfigFormat::from_path(path)?;
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConfigError::file_not_found(path),
            _ => ConfigError::io(path, e),
        })?;

        let mut config = parse_str(&self.expand(&content), format).map_err(|e| match e {
            ConfigError::Serialization { message } => ConfigError::parse(path, message),
            other => other,
        })?;
        self.apply_env_overrides(&mut config)?;
        anchor_session_path(&mut config, path);
        config.validate()?;

        debug!(
            api_url = %config.client.api_url,
            session_backend = config.session.backend.as_str(),
            routes = config.guard.routes.rules().len(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Loads configuration text in the given format.
    ///
    /// Relative session paths are left as written.
    pub fn load_from_str(&self, content: &str, format: ConfigFormat) -> ConfigResult<WardenConfig> {
        let mut config = parse_str(&self.expand(content), format)?;
        self.apply_env_overrides(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    /// Builds the configuration from defaults and environment overrides only.
    pub fn load_defaults(&self) -> ConfigResult<WardenConfig> {
        let mut config = WardenConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    fn var(&self, name: &str) -> Option<String> {
        (self.env)(name)
    }

    /// Expands placeholders. Unset variables without a default stay verbatim.
    fn expand<'a>(&self, content: &'a str) -> Cow<'a, str> {
        if !self.expand_env {
            return Cow::Borrowed(content);
        }
        PLACEHOLDER.replace_all(content, |caps: &Captures<'_>| {
            let name = &caps[1];
            match (self.var(name), caps.get(2)) {
                (Some(value), _) => value,
                (None, Some(default)) => default.as_str().to_string(),
                (None, None) => {
                    warn!(variable = name, "Environment variable not set");
                    caps[0].to_string()
                }
            }
        })
    }

    fn apply_env_overrides(&self, config: &mut WardenConfig) -> ConfigResult<()> {
        if !self.expand_env {
            return Ok(());
        }
        let key = |suffix: &str| format!("{}_{}", self.prefix, suffix);

        if let Some(url) = self.var(&key("API_URL")) {
            config.client.api_url = url;
        }
        if let Some(raw) = self.var(&key("TIMEOUT_SECS")) {
            config.client.timeout_secs = raw.trim().parse().map_err(|_| {
                ConfigError::invalid_env_var(key("TIMEOUT_SECS"), "expected a number of seconds")
            })?;
        }
        if let Some(raw) = self.var(&key("SESSION_BACKEND")) {
            config.session.backend = raw
                .parse::<SessionBackend>()
                .map_err(|message| ConfigError::invalid_env_var(key("SESSION_BACKEND"), message))?;
        }
        if let Some(path) = self.var(&key("SESSION_PATH")) {
            config.session.path = PathBuf::from(path);
        }
        if let Some(secret) = self.var(&key("TOKEN_SECRET")) {
            config.token.secret = secret;
        }
        if let Some(raw) = self.var(&key("LOG_LEVEL")) {
            match LogLevel::parse(&raw) {
                Some(level) => config.logging.level = level,
                None => warn!(value = %raw, "Ignoring unknown log level"),
            }
        }

        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConfigLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigLoader")
            .field("prefix", &self.prefix)
            .field("expand_env", &self.expand_env)
            .finish_non_exhaustive()
    }
}

fn anchor_session_path(config: &mut WardenConfig, file: &Path) {
    let session = &mut config.session.path;
    if session.as_os_str().is_empty() || !session.is_relative() {
        return;
    }
    if let Some(dir) = file.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        *session = dir.join(&*session);
    }
}

// =============================================================================
// ConfigFormat
// =============================================================================

/// On-disk configuration syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.yaml` or `.yml`
    Yaml,
    /// `.toml`
    Toml,
    /// `.json`
    Json,
}

impl ConfigFormat {
    /// Picks the format from the file extension, case-insensitively.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return Err(ConfigError::unsupported_format("(no extension)"));
        };
        match ext.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::unsupported_format(other)),
        }
    }
}

fn parse_str(content: &str, format: ConfigFormat) -> ConfigResult<WardenConfig> {
    let parsed = match format {
        ConfigFormat::Yaml => from_yaml(content),
        ConfigFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        ConfigFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
    };
    parsed.map_err(ConfigError::serialization)
}

/// YAML goes through the `config` crate.
fn from_yaml<T: DeserializeOwned>(content: &str) -> Result<T, String> {
    config::Config::builder()
        .add_source(config::File::from_str(content, config::FileFormat::Yaml))
        .build()
        .and_then(|built| built.try_deserialize())
        .map_err(|e| e.to_string())
}

/// Loads configuration from a file with default settings.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<WardenConfig> {
    ConfigLoader::new().load(path)
}

/// Loads configuration text with default settings.
pub fn load_config_str(content: &str, format: ConfigFormat) -> ConfigResult<WardenConfig> {
    ConfigLoader::new().load_from_str(content, format)
}

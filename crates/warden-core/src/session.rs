// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Durable single-slot session storage.
//!
//! A session is nothing more than the one token currently held by the
//! client. Stores hold at most one token; the last write wins.
//!
//! - [`MemorySessionStore`]: process-local, for tests and short-lived tools
//! - [`FileSessionStore`]: a key/value document on disk, the equivalent of
//!   browser local storage

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::error::{AuthError, AuthResult};

/// Default storage key for the session token.
pub const DEFAULT_SESSION_KEY: &str = "token";

// =============================================================================
// SessionToken
// =============================================================================

/// An opaque signed token held as the current session.
///
/// `Debug` output never includes the token value.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wraps a raw token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the raw token.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SessionToken(<{} bytes>)", self.0.len())
    }
}

impl From<String> for SessionToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for SessionToken {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

// =============================================================================
// SessionStore Trait
// =============================================================================

/// Single-slot token storage.
///
/// Each operation is atomic on its own. A `save` that returns before a
/// `read` starts is visible to that read.
pub trait SessionStore: Send + Sync {
    /// Stores `token` as the current session, replacing any previous one.
    fn save(&self, token: &SessionToken) -> AuthResult<()>;

    /// Returns the current session token, if any.
    fn read(&self) -> AuthResult<Option<SessionToken>>;

    /// Removes the current session. Succeeds when there is none.
    fn clear(&self) -> AuthResult<()>;

    /// Removes the current session only if it is still `expected`.
    ///
    /// Returns `true` when the slot was cleared. A token saved since
    /// `expected` was read is left in place.
    fn clear_if(&self, expected: &SessionToken) -> AuthResult<bool> {
        if self.read()?.as_ref() != Some(expected) {
            return Ok(false);
        }
        self.clear()?;
        Ok(true)
    }

    /// Returns the name of this store for logging.
    fn name(&self) -> &str {
        "session"
    }
}

impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    fn save(&self, token: &SessionToken) -> AuthResult<()> {
        (**self).save(token)
    }

    fn read(&self) -> AuthResult<Option<SessionToken>> {
        (**self).read()
    }

    fn clear(&self) -> AuthResult<()> {
        (**self).clear()
    }

    fn clear_if(&self, expected: &SessionToken) -> AuthResult<bool> {
        (**self).clear_if(expected)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

// =============================================================================
// MemorySessionStore
// =============================================================================

/// In-memory session store.
///
/// Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    slot: Arc<RwLock<Option<SessionToken>>>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `token`.
    pub fn with_token(token: impl Into<SessionToken>) -> Self {
        Self {
            slot: Arc::new(RwLock::new(Some(token.into()))),
        }
    }

    /// Returns `true` if a token is stored.
    pub fn is_occupied(&self) -> bool {
        self.slot.read().is_some()
    }
}

impl SessionStore for MemorySessionStore {
    fn save(&self, token: &SessionToken) -> AuthResult<()> {
        *self.slot.write() = Some(token.clone());
        Ok(())
    }

    fn read(&self) -> AuthResult<Option<SessionToken>> {
        Ok(self.slot.read().clone())
    }

    fn clear(&self) -> AuthResult<()> {
        self.slot.write().take();
        Ok(())
    }

    fn clear_if(&self, expected: &SessionToken) -> AuthResult<bool> {
        let mut slot = self.slot.write();
        if slot.as_ref() != Some(expected) {
            return Ok(false);
        }
        *slot = None;
        Ok(true)
    }

    fn name(&self) -> &str {
        "memory"
    }
}

// =============================================================================
// FileSessionStore
// =============================================================================

/// File-backed session store.
///
/// The file is a flat JSON object of string keys to string values, so
/// several tools may share one file as long as they use different keys.
/// Writes go to a sibling temporary file that is then renamed over the
/// original.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    key: String,
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    /// Creates a store at `path` using the default key.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_key(path, DEFAULT_SESSION_KEY)
    }

    /// Creates a store at `path` using `key`.
    pub fn with_key(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the storage key.
    pub fn key(&self) -> &str {
        &self.key
    }

    fn load(&self) -> AuthResult<BTreeMap<String, String>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(AuthError::storage(format!(
                    "Failed to read '{}': {}",
                    self.path.display(),
                    e
                )));
            }
        };

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            AuthError::storage(format!(
                "Session file '{}' is corrupt: {}",
                self.path.display(),
                e
            ))
        })
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> AuthResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| AuthError::storage(e.to_string()))?;

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn save(&self, token: &SessionToken) -> AuthResult<()> {
        let _guard = self.write_lock.lock();
        let mut entries = self.load()?;
        entries.insert(self.key.clone(), token.as_str().to_string());
        self.persist(&entries)?;

        tracing::debug!(path = %self.path.display(), key = %self.key, "Session saved");
        Ok(())
    }

    fn read(&self) -> AuthResult<Option<SessionToken>> {
        let entries = self.load()?;
        Ok(entries
            .get(&self.key)
            .filter(|value| !value.is_empty())
            .map(|value| SessionToken::new(value.as_str())))
    }

    fn clear(&self) -> AuthResult<()> {
        let _guard = self.write_lock.lock();
        let mut entries = self.load()?;
        if entries.remove(&self.key).is_none() {
            return Ok(());
        }
        self.persist(&entries)?;

        tracing::debug!(path = %self.path.display(), key = %self.key, "Session cleared");
        Ok(())
    }

    fn clear_if(&self, expected: &SessionToken) -> AuthResult<bool> {
        let _guard = self.write_lock.lock();
        let mut entries = self.load()?;
        if entries.get(&self.key).map(String::as_str) != Some(expected.as_str()) {
            tracing::debug!(key = %self.key, "Session replaced since read, keeping it");
            return Ok(false);
        }
        entries.remove(&self.key);
        self.persist(&entries)?;

        tracing::debug!(path = %self.path.display(), key = %self.key, "Session cleared");
        Ok(true)
    }

    fn name(&self) -> &str {
        "file"
    }
}

// =============================================================================
// Tests
// =============================================================================

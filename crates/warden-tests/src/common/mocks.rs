// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Mock Implementations
//!
//! Mock collaborators for exercising the client components in isolation.
//! All mocks record their interactions and are safe to share across tasks.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use warden_client::{ApiRequest, ApiResponse, AuthGateway, Method, RoleService, Transport};
use warden_core::{
    AccessGuard, AuthError, AuthResult, IdentityResolver, MemorySessionStore, Navigator, Notifier,
    SessionStore, SessionToken, TokenCodec,
};

// =============================================================================
// Mock Transport
// =============================================================================

/// Transport answering from per-endpoint response queues.
///
/// Requests to an endpoint with no queued response fail with a transport
/// error, as does every request while [`go_offline`](Self::go_offline) is in
/// effect.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<HashMap<(Method, String), VecDeque<ApiResponse>>>,
    requests: Mutex<Vec<ApiRequest>>,
    offline: AtomicBool,
}

impl MockTransport {
    /// Creates a transport with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response for `method path`.
    pub fn respond(&self, method: Method, path: &str, response: ApiResponse) {
        self.responses
            .lock()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(response);
    }

    /// Makes every following request fail as if the service were unreachable.
    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    /// Returns all requests received so far.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().clone()
    }

    /// Returns the number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Returns the most recent request.
    pub fn last_request(&self) -> Option<ApiRequest> {
        self.requests.lock().last().cloned()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> AuthResult<ApiResponse> {
        self.requests.lock().push(request.clone());

        if self.offline.load(Ordering::SeqCst) {
            return Err(AuthError::transport("Unable to reach the identity service"));
        }

        self.responses
            .lock()
            .get_mut(&(request.method, request.path.clone()))
            .and_then(VecDeque::pop_front)
            .ok_or_else(|| {
                AuthError::transport(format!(
                    "no scripted response for {} {}",
                    request.method, request.path
                ))
            })
    }

    fn name(&self) -> &str {
        "mock"
    }
}

// =============================================================================
// Recording Guard Collaborators
// =============================================================================

/// Navigator that records every target path.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    paths: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    /// Returns the recorded paths.
    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate_to(&self, path: &str) {
        self.paths.lock().push(path.to_string());
    }
}

/// Notifier that records every notice.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<(String, Duration)>>,
}

impl RecordingNotifier {
    /// Returns the recorded notices.
    pub fn notices(&self) -> Vec<(String, Duration)> {
        self.notices.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn show_notice(&self, message: &str, duration: Duration) {
        self.notices.lock().push((message.to_string(), duration));
    }
}

// =============================================================================
// Failing Session Store
// =============================================================================

/// Session store whose operations can be made to fail.
#[derive(Debug, Default)]
pub struct FlakySessionStore {
    inner: MemorySessionStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    clear_count: AtomicU64,
    racing_save: Mutex<Option<SessionToken>>,
}

impl FlakySessionStore {
    /// Creates a healthy store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes reads fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes saves and clears fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Has another writer save `token` right after the next read returns.
    pub fn save_after_next_read(&self, token: SessionToken) {
        *self.racing_save.lock() = Some(token);
    }

    /// Returns how many times `clear` was called.
    pub fn clear_count(&self) -> u64 {
        self.clear_count.load(Ordering::SeqCst)
    }

    /// Reads the slot, bypassing failure injection.
    pub fn peek(&self) -> Option<SessionToken> {
        self.inner.read().ok().flatten()
    }
}

impl SessionStore for FlakySessionStore {
    fn save(&self, token: &SessionToken) -> AuthResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AuthError::storage("disk full"));
        }
        self.inner.save(token)
    }

    fn read(&self) -> AuthResult<Option<SessionToken>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AuthError::storage("storage unavailable"));
        }
        let current = self.inner.read();
        if let Some(token) = self.racing_save.lock().take() {
            self.inner.save(&token)?;
        }
        current
    }

    fn clear(&self) -> AuthResult<()> {
        self.clear_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AuthError::storage("disk full"));
        }
        self.inner.clear()
    }

    fn name(&self) -> &str {
        "flaky"
    }
}

// =============================================================================
// Client Harness
// =============================================================================

/// Client components wired to a memory store and a mock transport.
pub struct ClientHarness {
    /// Session slot shared by every component.
    pub store: MemorySessionStore,
    /// Scripted transport.
    pub transport: Arc<MockTransport>,
    /// Session reader.
    pub resolver: IdentityResolver,
    /// Account endpoints.
    pub gateway: AuthGateway,
    /// Role endpoints.
    pub roles: RoleService,
    /// Navigator observed by [`guard`](Self::guard).
    pub navigator: Arc<RecordingNavigator>,
    /// Notifier observed by [`guard`](Self::guard).
    pub notifier: Arc<RecordingNotifier>,
    /// Access guard with recording collaborators.
    pub guard: AccessGuard,
}

impl ClientHarness {
    /// Builds a harness with a shape-only codec.
    pub fn new() -> Self {
        Self::with_codec(TokenCodec::insecure())
    }

    /// Builds a harness with the given codec.
    pub fn with_codec(codec: TokenCodec) -> Self {
        let store = MemorySessionStore::new();
        let transport = Arc::new(MockTransport::new());
        let resolver = IdentityResolver::new(Arc::new(store.clone()), codec);
        let gateway = AuthGateway::new(transport.clone(), resolver.clone());
        let roles = RoleService::new(transport.clone(), resolver.clone());

        let navigator = Arc::new(RecordingNavigator::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let guard = AccessGuard::new(resolver.clone())
            .with_navigator(navigator.clone())
            .with_notifier(notifier.clone());

        Self {
            store,
            transport,
            resolver,
            gateway,
            roles,
            navigator,
            notifier,
            guard,
        }
    }
}

impl Default for ClientHarness {
    fn default() -> Self {
        Self::new()
    }
}

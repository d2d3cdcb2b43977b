// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # warden-core
//!
//! Authentication and authorization core for Warden.
//!
//! - **Codec**: `TokenCodec` decodes a signed token into a `ClaimSet` and
//!   reports expiry
//! - **Session**: `SessionStore` holds at most one token (memory and file
//!   backends)
//! - **Identity**: `IdentityResolver` derives the current identity from the
//!   session on every call
//! - **Guard**: the `authorize` policy and the `AccessGuard` that applies it
//! - **Models**: request and response bodies exchanged with the account service
//! - **Validation**: client-side checks run before any remote call
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use warden_core::{AccessGuard, IdentityResolver, MemorySessionStore, TokenCodec};
//!
//! let store = Arc::new(MemorySessionStore::new());
//! let resolver = IdentityResolver::new(store, TokenCodec::insecure());
//! let guard = AccessGuard::new(resolver);
//!
//! if guard.can_activate(&["Admin"]) {
//!     // ...
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Token & Session
// =============================================================================

pub mod claims;
pub mod codec;
pub mod session;

// =============================================================================
// Identity & Authorization
// =============================================================================

pub mod identity;
pub mod guard;

// =============================================================================
// Wire Models & Errors
// =============================================================================

pub mod error;
pub mod models;
pub mod validation;

// =============================================================================
// Re-exports for convenience
// =============================================================================

pub use claims::{ClaimSet, ClaimSetBuilder};
pub use codec::{DecodeError, JwtConfig, TokenCodec};
pub use error::{AuthError, AuthResult, FieldError, ValidationErrors};
pub use guard::{
    authorize, AccessGuard, AuthorizationOutcome, GuardConfig, LogNavigator, LogNotifier,
    Navigator, Notifier, RouteRule, RouteTable,
};
pub use identity::{Identity, IdentityResolver};
pub use models::{
    AssignRoleRequest, AuthOutcome, ChangePasswordRequest, CreateRoleRequest, Credentials,
    ForgotPasswordRequest, RegistrationRequest, ResetPasswordRequest, RoleInfo, UserDetail,
};
pub use session::{
    FileSessionStore, MemorySessionStore, SessionStore, SessionToken, DEFAULT_SESSION_KEY,
};
pub use validation::{confirmation_matches, is_valid_email, Validate};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

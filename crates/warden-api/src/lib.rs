// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # warden-api
//!
//! Server-side enforcement for Warden.
//!
//! Client-side guards are a convenience; the authoritative check happens
//! here, with signature verification. [`AuthLayer`] authenticates bearer
//! tokens and [`RoleLayer`] applies the same `authorize` policy the client
//! guard uses.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use axum::{routing::get, Router};
//! use warden_api::{AuthLayer, RoleLayer};
//! use warden_core::{JwtConfig, TokenCodec};
//!
//! let codec = Arc::new(TokenCodec::new(JwtConfig::new(secret))?);
//! let app = Router::new()
//!     .route("/api/roles", get(list_roles).layer(RoleLayer::require_any(["Admin"])))
//!     .layer(AuthLayer::new(codec).with_default_public_paths());
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod extractors;
pub mod middleware;

pub use error::{ApiError, ApiResult, ErrorDetails, ErrorResponseBody};
pub use extractors::{Auth, OptionalAuth};
pub use middleware::{AuthLayer, AuthMiddleware, RoleLayer, RoleMiddleware};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

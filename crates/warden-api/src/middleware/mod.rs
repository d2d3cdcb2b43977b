// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Middleware for protected endpoints.
//!
//! - [`AuthLayer`]: bearer token authentication
//! - [`RoleLayer`]: role requirement, using the same policy as client guards

mod auth;
mod roles;

pub use auth::{AuthLayer, AuthMiddleware};
pub use roles::{RoleLayer, RoleMiddleware};

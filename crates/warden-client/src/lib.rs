// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # warden-client
//!
//! Client for the remote identity service.
//!
//! - **Transport**: the [`Transport`] seam and its `reqwest` implementation
//! - **Gateway**: login, registration, profile and password flows
//! - **Roles**: role listing, creation, deletion and assignment

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod gateway;
pub mod roles;
pub mod transport;

mod response;

pub use gateway::AuthGateway;
pub use roles::RoleService;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

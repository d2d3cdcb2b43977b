// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Warden Integration Tests
//!
//! Cross-crate tests for the session lifecycle, the access guard, the
//! account gateway and the server-side adapter.
//!
//! ## Module Structure
//!
//! - [`common`]: Shared test utilities
//!   - `fixtures`: tokens and service responses
//!   - `mocks`: scripted transport, recording guard collaborators, failing store
//!   - `assertions`: session assertions
//!
//! ## Running Tests
//!
//! ```bash
//! # Run all integration tests
//! cargo test -p warden-tests
//!
//! # Run specific test suite
//! cargo test -p warden-tests --test integration_session
//! cargo test -p warden-tests --test integration_guard
//! cargo test -p warden-tests --test integration_gateway
//! cargo test -p warden-tests --test integration_config
//! cargo test -p warden-tests --test integration_api
//! ```
//!
//! ## Writing New Tests
//!
//! ```rust,ignore
//! use warden_tests::prelude::*;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let harness = ClientHarness::new();
//!     harness.transport.respond(Method::Post, "account/login", ResponseFixtures::login_success(&token));
//!     // ... test logic
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::assertions::*;
    pub use crate::common::fixtures::*;
    pub use crate::common::mocks::*;
    pub use crate::common::{init_test_logging, temp_test_dir};
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Common Test Utilities
//!
//! - `fixtures`: Pre-built tokens, claim sets and service responses
//! - `mocks`: Mock collaborators that record their interactions
//! - `assertions`: Assertion helpers for session state

pub mod assertions;
pub mod fixtures;
pub mod mocks;

pub use assertions::*;
pub use fixtures::*;
pub use mocks::*;

use tracing_subscriber::EnvFilter;

const TEST_LOG_FILTER: &str = "warn,warden_core=debug,warden_client=debug,warden_api=debug";

/// Installs a test-writer subscriber once per test binary.
///
/// Later calls are no-ops; `RUST_LOG` overrides the default filter.
pub fn init_test_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(TEST_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Creates a scratch directory removed when the guard drops.
pub fn temp_test_dir(prefix: &str) -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .expect("create scratch directory")
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Warden Binary
//!
//! Command line client for the identity service. It logs in, keeps the
//! issued token in a local session slot and evaluates access from the
//! token's claims.
//!
//! ## Usage
//!
//! ```bash
//! warden login --email ada@example.com --password '...'
//! warden whoami
//! warden check --route /admin/users
//! warden logout
//! ```
//!
//! ## Exit codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 1 | Configuration error |
//! | 2 | Input rejected by local validation |
//! | 3 | Runtime error |
//! | 4 | I/O or session storage error |
//! | 5 | The service reported an unsuccessful outcome |
//! | 6 | Not logged in |
//! | 7 | Logged in but not permitted |
//! | 8 | The service could not be reached |

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod runtime;
pub mod terminal;

pub use cli::Cli;
pub use error::{BinError, BinResult};
pub use logging::init_logging;

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Guard collaborators for a terminal session.

use std::time::Duration;

use warden_core::{Navigator, Notifier};

/// Reports redirects on stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate_to(&self, path: &str) {
        eprintln!("-> {}", path);
    }
}

/// Prints notices on stderr. The duration has no meaning on a terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn show_notice(&self, message: &str, _duration: Duration) {
        eprintln!("{}", message);
    }
}

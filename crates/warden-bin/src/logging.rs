// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Logging and tracing initialization.
//!
//! Logs go to stderr so command output on stdout stays machine-readable.

use std::io::IsTerminal;

use tracing::Level;
use tracing_subscriber::{
    filter::Directive, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
    Registry,
};

use crate::cli::LogFormat;

/// HTTP stack crates that are noisy below `warn`.
const QUIET_TARGETS: [&str; 3] = ["hyper", "reqwest", "rustls"];

/// Initializes the global subscriber.
///
/// `RUST_LOG` takes precedence over `level` when set.
pub fn init_logging(level: &str, format: LogFormat) {
    let ansi = std::io::stderr().is_terminal();

    let layer: Box<dyn Layer<Registry> + Send + Sync> = match format {
        LogFormat::Text => fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_ansi(ansi)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_current_span(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_ansi(ansi)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(layer.with_filter(build_filter(level)))
        .init();
}

fn build_filter(level: &str) -> EnvFilter {
    QUIET_TARGETS.iter().fold(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        |filter, target| filter.add_directive(quiet(target)),
    )
}

fn quiet(target: &str) -> Directive {
    format!("{}=warn", target)
        .parse()
        .unwrap_or_else(|_| Level::WARN.into())
}

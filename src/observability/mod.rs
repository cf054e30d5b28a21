// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability: structured log messages and subscriber setup.
//!
//! Library code only emits `tracing` events; installing a subscriber is left to
//! the binary (see [`init_tracing`]) or to whatever application embeds the crate.

pub mod messages;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a compact `fmt` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Logs go to stderr so stdout stays free for call results.
pub fn init_tracing() -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .try_init()
}

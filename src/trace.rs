//! Tracing initialisation for the demo binaries.
//!
//! The library only emits events: `debug` for allocations and releases,
//! `trace` for copies and moves. Nothing is printed unless a subscriber is
//! installed here.

use tracing_subscriber::EnvFilter;

use crate::config::OutputConfig;

/// Installs the global subscriber. `RUST_LOG` takes precedence over
/// `output.log_filter`. Calling this more than once is a no-op.
pub fn init(output: &OutputConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&output.log_filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    let installed = if output.json_logs {
        builder.json().try_init()
    } else {
        builder.with_ansi(output.color).try_init()
    };

    // A subscriber from an earlier call (or the host program) stays in place.
    if let Err(err) = installed {
        tracing::debug!(%err, "tracing subscriber already installed");
    }
}

//! Logging setup for binaries embedding the client.

use std::sync::Once;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter used when `RUST_LOG` is unset: client events at `info`, the rest
/// (hyper, connectors) at `warn`.
pub const DEFAULT_FILTER: &str = "warn,tezrpc=info";

static INIT: Once = Once::new();

/// Installs a global fmt subscriber filtered by `RUST_LOG`, falling back to
/// [`DEFAULT_FILTER`]. Only the first call has an effect, and a subscriber
/// installed by the host application is left alone.
pub fn init_tracing() {
    init_tracing_with(DEFAULT_FILTER);
}

/// Same as [`init_tracing`] with a caller-chosen fallback, e.g.
/// `"tezrpc=trace"` to log every request URL and latency.
pub fn init_tracing_with(default_filter: &str) {
    INIT.call_once(|| {
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true))
            .with(env_filter(default_filter))
            .try_init();
    });
}

fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

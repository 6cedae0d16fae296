//! Tracing subscriber setup.
//!
//! The library only emits `tracing` events; binaries and tests that want
//! to see them call [`init`].

use std::sync::OnceLock;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static INIT: OnceLock<()> = OnceLock::new();

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_DIRECTIVE: &str = "itinerary_planner=info";

/// Installs a formatted subscriber filtered by `RUST_LOG`.
///
/// Safe to call multiple times - only the first call has effect, and an
/// already installed global subscriber is left alone.
pub fn init() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .try_init();
    });
}

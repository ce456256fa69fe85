//! Diagnostic logging for the shelvr binary
//!
//! Library code emits `tracing` events; this installs the subscriber that
//! prints them to stderr, leaving stdout to command results.

use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "shelvr=warn";
const VERBOSE_LOG_FILTER: &str = "shelvr=info";

/// Filter used when `RUST_LOG` is not set
#[must_use]
pub const fn default_filter(verbose: bool) -> &'static str {
    if verbose { VERBOSE_LOG_FILTER } else { DEFAULT_LOG_FILTER }
}

/// Install the stderr subscriber
///
/// `RUST_LOG` takes precedence over `verbose`. Calling this twice is
/// harmless; the second subscriber is ignored.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(filter),
        )
        .try_init();
}

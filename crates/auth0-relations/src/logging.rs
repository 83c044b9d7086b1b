//! Tracing subscriber setup.
//!
//! Output goes to stderr; stdout belongs to the host process.

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Fallback filter when `RUST_LOG` is unset.
#[must_use]
pub fn default_filter(debug: bool) -> &'static str {
    if debug {
        "info,auth0_relations=debug,auth0_management=debug"
    } else {
        "warn,auth0_relations=info"
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `filter`. Fails if a subscriber is
/// already installed.
pub fn init_logging(filter: &str) -> Result<(), TryInitError> {
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter_layer)
        .try_init()?;

    tracing::debug!(filter = %filter, "Logging initialized");
    Ok(())
}

/// Initialize logging for tests (with simpler output).
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("debug")
        .try_init();
}

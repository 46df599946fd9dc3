//! Log sink for the language bindings

use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directive
pub const LOG_ENV: &str = "MSI_NATIVE_LOG";

/// Filter used when `MSI_NATIVE_LOG` is unset or unparsable
pub const DEFAULT_FILTER: &str = "warn";

fn build_env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a global stderr subscriber.
///
/// Returns `false` if the host process already installed one, which is left
/// in place.
pub fn init() -> bool {
    tracing_subscriber::registry()
        .with(build_env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .try_init()
        .is_ok()
}

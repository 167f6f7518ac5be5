#![forbid(unsafe_code)]

//! Logging and tracing support.
//!
//! All trellis crates log through the `tracing` facade. The macros are
//! re-exported here so downstream code can use `trellis_core::logging::debug!`
//! without naming `tracing` directly.
//!
//! With the `tracing-json` feature, [`install_json_subscriber`] installs a
//! JSON formatter filtered by the `TRELLIS_LOG` environment variable
//! (same syntax as `RUST_LOG`).

pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

/// Environment variable holding the log filter directive.
pub const LOG_ENV_VAR: &str = "TRELLIS_LOG";

/// Default filter used when [`LOG_ENV_VAR`] is unset or invalid.
pub const DEFAULT_FILTER: &str = "warn";

/// Install a global JSON subscriber.
///
/// Returns `false` if a global subscriber was already set.
#[cfg(feature = "tracing-json")]
pub fn install_json_subscriber() -> bool {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}

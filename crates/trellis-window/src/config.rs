#![forbid(unsafe_code)]

//! Native window configuration.

use std::env;
use std::time::Duration;

use tracing::warn;

/// Environment variable overriding [`NativeWindowConfig::non_client_poll_interval`],
/// in milliseconds.
pub const NON_CLIENT_POLL_ENV_VAR: &str = "TRELLIS_NON_CLIENT_POLL_MS";

/// Configuration for a [`NativeWindow`](crate::NativeWindow).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeWindowConfig {
    /// How often the pointer is re-checked while it is over the non-client
    /// area, to catch leaves the platform never reported.
    pub non_client_poll_interval: Duration,
    /// Keep only the latest queued `Resized`/`SizeChanged` event.
    pub coalesce_resize_events: bool,
}

impl Default for NativeWindowConfig {
    fn default() -> Self {
        Self {
            non_client_poll_interval: Duration::from_millis(10),
            coalesce_resize_events: true,
        }
    }
}

impl NativeWindowConfig {
    #[must_use]
    pub fn with_non_client_poll_interval(mut self, interval: Duration) -> Self {
        self.non_client_poll_interval = interval;
        self
    }

    #[must_use]
    pub fn with_coalesce_resize_events(mut self, coalesce: bool) -> Self {
        self.coalesce_resize_events = coalesce;
        self
    }

    /// Defaults, overridden from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults, overridden through `lookup`.
    ///
    /// Unparseable values are ignored with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(raw) = lookup(NON_CLIENT_POLL_ENV_VAR) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => config.non_client_poll_interval = Duration::from_millis(ms),
                Err(err) => warn!(
                    var = NON_CLIENT_POLL_ENV_VAR,
                    value = %raw,
                    error = %err,
                    "ignoring invalid poll interval"
                ),
            }
        }
        config
    }
}

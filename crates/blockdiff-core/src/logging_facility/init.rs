//! Subscriber installation
//!
//! The comparison report owns stdout, so every profile writes diagnostics to
//! stderr. `RUST_LOG` overrides the default filter.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

/// Output format of the diagnostic log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable lines
    Development,
    /// One JSON object per event
    Production,
}

/// Warnings only, so a normal run prints nothing but the report.
const DEFAULT_FILTER: &str = "blockdiff=warn";

static INIT_ONCE: Once = Once::new();

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber for `profile`.
///
/// Only the first call has an effect. Tests install the capture layer with
/// [`super::init_test_capture`] instead.
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(std::io::stderr);
        match profile {
            Profile::Development => builder.init(),
            Profile::Production => builder.json().init(),
        }
    });
}

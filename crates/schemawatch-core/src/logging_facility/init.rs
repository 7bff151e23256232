//! Logging initialization module
//!
//! Provides a single initialization point for the logging facility.

use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Environment variable consulted before `RUST_LOG`.
pub const LOG_ENV_VAR: &str = "SCHEMAWATCH_LOG";

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output for interactive use
    Development,
    /// JSON structured output for CI and schedulers
    Production,
    /// Test capture mode for deterministic testing
    Test,
}

static INIT_ONCE: Once = Once::new();

fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Initialize the logging facility
///
/// Call once at startup. Logs always go to stderr so that stdout stays
/// reserved for rendered reports.
///
/// # Profiles
///
/// - **Development**: Human-readable logs at info level
/// - **Production**: JSON structured logs at info level
/// - **Test**: Bare registry; use `test_capture::init_test_capture()` for assertions
///
/// # Example
///
/// ```
/// use schemawatch_core::logging_facility::{init, Profile};
///
/// init(Profile::Development);
/// ```
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| match profile {
        Profile::Development => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(env_filter("schemawatch=info"))
                .init();
        }
        Profile::Production => {
            tracing_subscriber::fmt()
                .json()
                .with_writer(std::io::stderr)
                .with_env_filter(env_filter("schemawatch=info"))
                .init();
        }
        Profile::Test => {
            // A capture layer may already own the global slot.
            let _ = tracing_subscriber::registry().try_init();
        }
    });
}

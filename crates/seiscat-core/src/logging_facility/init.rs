//! Subscriber installation

use std::sync::Once;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Output profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable lines on stderr, debug level for seiscat crates
    Development,
    /// One JSON object per line on stderr, info level
    Production,
    /// Nothing is printed; tests attach `init_test_capture()` instead
    Test,
}

impl Profile {
    /// Filter used when `RUST_LOG` is unset
    pub fn default_directive(&self) -> &'static str {
        match self {
            Profile::Development => "seiscat=debug",
            Profile::Production => "seiscat=info",
            Profile::Test => "off",
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.default_directive()))
    }
}

static INSTALLED: Once = Once::new();

/// Install the global subscriber for `profile`
///
/// Only the first call in a process has an effect. A subscriber installed
/// elsewhere beforehand (for instance by a test harness) is left in place.
///
/// ```
/// use seiscat_core::logging_facility::{init, Profile};
///
/// init(Profile::Production);
/// ```
pub fn init(profile: Profile) {
    INSTALLED.call_once(|| {
        let registry = tracing_subscriber::registry().with(profile.filter());
        let _ = match profile {
            Profile::Development => registry
                .with(fmt::layer().with_writer(std::io::stderr))
                .try_init(),
            Profile::Production => registry
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .try_init(),
            Profile::Test => registry.try_init(),
        };
    });
}

//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! All diagnostics go to stderr so that command output on stdout stays
//! machine-friendly.
//!
//! # Log Levels
//!
//! - `warn` (default): unexpected failures
//! - `info` (`-v`): components that could not be installed
//! - `debug` (`-vv`): phase claims, waits and dependency discovery
//! - `trace` (`-vvv`): everything
//!
//! The `CINSTALL_LOG` environment variable overrides the verbosity with an
//! `EnvFilter` directive such as `cinstall::installer=debug`.

use std::io;

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding a filter directive
pub const LOG_ENV: &str = "CINSTALL_LOG";

/// Configuration for logging behavior.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Level used when no filter directive is given
    pub level: Level,
    /// Whether to use ANSI colors in output
    pub with_ansi: bool,
    /// Filter directive that takes precedence over `level`
    pub directive: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            with_ansi: console::colors_enabled_stderr(),
            directive: std::env::var(LOG_ENV).ok().filter(|d| !d.trim().is_empty()),
        }
    }
}

impl LogConfig {
    /// Create a `LogConfig` from the number of `-v` flags
    #[must_use]
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };
        Self {
            level,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_directive(mut self, directive: Option<String>) -> Self {
        self.directive = directive;
        self
    }

    /// The filter this configuration installs.
    ///
    /// An unparsable directive falls back to the verbosity level.
    pub fn filter(&self) -> EnvFilter {
        self.directive
            .as_deref()
            .and_then(|directive| EnvFilter::try_new(directive).ok())
            .unwrap_or_else(|| EnvFilter::new(self.level.as_str().to_lowercase()))
    }
}

/// Install the global subscriber.
///
/// Does nothing if a subscriber is already installed, so tests may call it
/// repeatedly.
pub fn init(config: &LogConfig) {
    let layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(config.with_ansi)
        .with_target(false)
        .without_time();

    let _ = tracing_subscriber::registry()
        .with(config.filter())
        .with(layer)
        .try_init();
}

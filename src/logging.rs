//! Diagnostic logging: `LEVEL message` lines on stderr.
//!
//! Program output goes to stdout, so logging never mixes with it.
//!
//! ```rust
//! use tacvm::logging::{self, LogLevel};
//!
//! logging::init(LogLevel::Debug);
//! tracing::debug!("created block_{}", 3);
//! ```

use clap::ValueEnum;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

impl LogLevel {
    /// Level selected by repeating `-v`. Warnings are always shown.
    pub fn from_verbosity(count: u8) -> Self {
        match count {
            0 => LogLevel::Warn,
            1 => LogLevel::Info,
            2 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(level: LogLevel) {
    let filter = LevelFilter::from_level(level.into());

    let layer = tracing_subscriber::fmt::layer()
        .without_time()
        .with_target(false)
        .with_level(true)
        .with_ansi(false)
        .compact()
        .with_writer(std::io::stderr)
        .with_filter(filter);

    let _ = Registry::default().with(layer).try_init();
}

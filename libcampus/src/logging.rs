//! Diagnostics for the Campus front ends
//!
//! Store operations log through `tracing`; a front end installs one
//! subscriber at startup with [`LoggingConfig::init`]. Diagnostics go to
//! stderr, leaving stdout to command output.
//!
//! ```no_run
//! use libcampus::logging::{LogFormat, LoggingConfig};
//!
//! LoggingConfig::from_env(LogFormat::Json, false).init();
//! ```

use std::str::FromStr;

use tracing_subscriber::EnvFilter;

/// Variable holding the fallback filter when `RUST_LOG` is unset
pub const LEVEL_ENV: &str = "CAMPUS_LOG_LEVEL";

/// Filter used when neither `RUST_LOG` nor [`LEVEL_ENV`] is set
pub const DEFAULT_LEVEL: &str = "warn";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Plain lines without colour
    Text,
    /// One JSON object per event
    Json,
    /// Multi-line, coloured, with source locations
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            _ => Err(format!(
                "Unknown log format '{}' (expected text, json or pretty)",
                s
            )),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
            LogFormat::Pretty => "pretty",
        };
        f.write_str(name)
    }
}

pub struct LoggingConfig {
    pub format: LogFormat,
    pub level: String,
    pub verbose: bool,
}

impl LoggingConfig {
    /// `verbose` selects `debug` over `level`; `RUST_LOG` overrides both.
    pub fn new(format: LogFormat, level: String, verbose: bool) -> Self {
        Self {
            format,
            level,
            verbose,
        }
    }

    /// Take the level from `CAMPUS_LOG_LEVEL`, defaulting to `warn`
    pub fn from_env(format: LogFormat, verbose: bool) -> Self {
        let level = std::env::var(LEVEL_ENV).unwrap_or_else(|_| DEFAULT_LEVEL.to_string());
        Self::new(format, level, verbose)
    }

    /// Filter directive applied when `RUST_LOG` is absent
    pub fn directive(&self) -> &str {
        if self.verbose {
            "debug"
        } else {
            self.level.as_str()
        }
    }

    /// Install the global subscriber
    ///
    /// # Panics
    ///
    /// If a global subscriber is already installed.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.directive()));
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr);

        match self.format {
            LogFormat::Json => builder.json().flatten_event(true).init(),
            LogFormat::Pretty => builder.pretty().with_file(true).with_line_number(true).init(),
            LogFormat::Text => builder.with_target(false).with_ansi(false).init(),
        }
    }
}

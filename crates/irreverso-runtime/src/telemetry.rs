//! Tracing setup
//!
//! Installs the global `tracing` subscriber. `RUST_LOG` wins over the
//! default directive. Output goes to stderr so a terminal UI can own stdout.

use std::str::FromStr;
use std::sync::OnceLock;

use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

static INSTALLED: OnceLock<()> = OnceLock::new();

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_DIRECTIVE: &str = "irreverso=info";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(TelemetryError::UnknownFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("tracing has already been initialised")]
    AlreadyInitialised,

    #[error("unknown log format: {0}")]
    UnknownFormat(String),

    #[error("failed to install subscriber: {0}")]
    Install(String),
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Install the global subscriber. Fails on a second call.
pub fn init_tracing(format: LogFormat) -> Result<(), TelemetryError> {
    INSTALLED
        .set(())
        .map_err(|_| TelemetryError::AlreadyInitialised)?;

    let registry = Registry::default().with(filter());
    let installed = match format {
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };
    installed.map_err(|e| TelemetryError::Install(e.to_string()))
}

//! Global `tracing` subscriber setup.
//!
//! `RUST_LOG` takes precedence over `logging.level`. Output goes to stderr so
//! that stdout stays clean for command results.

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LogFormat, LoggingConfig};

#[derive(thiserror::Error, Debug)]
pub enum LoggingError {
    #[error("invalid log filter: {0}")]
    InvalidFilter(#[from] ParseError),

    #[error("global subscriber already installed: {0}")]
    AlreadyInitialized(#[from] TryInitError),
}

/// Build the filter for `cfg`, preferring `RUST_LOG` when it is set and valid.
///
/// # Errors
/// Returns `LoggingError::InvalidFilter` if `cfg.level` is not a valid directive.
pub fn build_filter(cfg: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    Ok(EnvFilter::try_new(&cfg.level)?)
}

/// Install the global subscriber.
///
/// # Errors
/// Fails on an invalid filter or if a subscriber is already installed.
pub fn init_logging(cfg: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = build_filter(cfg)?;
    let registry = tracing_subscriber::registry().with(filter);

    match cfg.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?,
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_ansi(cfg.ansi)
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?,
    }

    Ok(())
}

//! Bootstrap helpers shared by the calculator binaries.
//!
//! - [`config`]: layered `AppConfig` (defaults, YAML, `CALC__*` env, CLI)
//! - [`logging`]: global `tracing` subscriber setup
//! - [`signals`]: graceful shutdown on Ctrl+C / SIGTERM

pub mod config;
pub mod logging;
pub mod signals;

pub use config::{
    AppConfig, CliOverrides, ClientConfig, ClientMode, ConfigError, ENV_PREFIX, LogFormat,
    LoggingConfig, ServerConfig,
};
pub use logging::{LoggingError, init_logging};
pub use signals::{ShutdownSignal, wait_for_shutdown};

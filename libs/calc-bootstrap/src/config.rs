//! Application configuration.
//!
//! Layering order, later layers win:
//! 1. compiled defaults
//! 2. YAML file passed with `--config`
//! 3. environment variables prefixed with `CALC__` (`__` separates nesting,
//!    e.g. `CALC__SERVER__BIND_ADDR=0.0.0.0:50051`)
//! 4. command-line overrides

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "CALC__";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("config file does not exist: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("invalid configuration value for '{field}': {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },

    #[error("failed to render configuration: {0}")]
    Render(#[from] serde_json::Error),
}

impl ConfigError {
    fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }
}

/// Server-side settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the gRPC listener binds to.
    pub bind_addr: String,
    /// Capacity of the worker's request queue.
    pub queue_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:50051".to_owned(),
            queue_capacity: 1024,
        }
    }
}

impl ServerConfig {
    /// Parsed bind address.
    ///
    /// # Errors
    /// Returns `ConfigError::Invalid` if `bind_addr` is not a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind_addr
            .parse()
            .map_err(|e| ConfigError::invalid("server.bind_addr", format!("{e}")))
    }
}

/// Where `calculator-client` evaluates calculations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientMode {
    /// Remote when a config layer sets `client.endpoint`, in-process otherwise.
    #[default]
    Auto,
    Local,
    Remote,
}

impl ClientMode {
    #[must_use]
    pub fn resolve(self, endpoint_configured: bool) -> Self {
        match self {
            Self::Auto if endpoint_configured => Self::Remote,
            Self::Auto => Self::Local,
            mode => mode,
        }
    }
}

/// Client-side settings used by `calculator-client` and SDK consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub endpoint: String,
    pub mode: ClientMode,
    pub connect_timeout_ms: u64,
    pub rpc_timeout_ms: u64,
    pub max_retries: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:50051".to_owned(),
            mode: ClientMode::Auto,
            connect_timeout_ms: 10_000,
            rpc_timeout_ms: 30_000,
            max_retries: 3,
        }
    }
}

impl ClientConfig {
    #[must_use]
    pub fn is_remote(&self) -> bool {
        self.mode == ClientMode::Remote
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    #[must_use]
    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_millis(self.rpc_timeout_ms)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is not set.
    pub level: String,
    pub format: LogFormat,
    /// Colored output for the text format.
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
            ansi: true,
        }
    }
}

/// Values coming from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub bind_addr: Option<String>,
    /// Implies `ClientMode::Remote` unless `client_mode` says otherwise.
    pub endpoint: Option<String>,
    pub client_mode: Option<ClientMode>,
    /// Count of `-v` flags.
    pub verbose: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub client: ClientConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load the layered configuration and validate it.
    ///
    /// # Errors
    /// Returns an error if an explicit config file is missing, a layer fails to
    /// parse, or the merged values are invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_defaults(path, Self::default())
    }

    /// Like [`AppConfig::load`], with `defaults` as the lowest layer.
    ///
    /// An `Auto` client mode is resolved here: remote if the file or the
    /// environment sets `client.endpoint`.
    ///
    /// # Errors
    /// Same as [`AppConfig::load`].
    pub fn load_with_defaults(path: Option<&Path>, defaults: Self) -> Result<Self, ConfigError> {
        let mut layers = Figment::new();

        if let Some(path) = path {
            if !path.is_file() {
                return Err(ConfigError::NotFound {
                    path: path.to_path_buf(),
                });
            }
            layers = layers.merge(Yaml::file(path));
        }

        layers = layers.merge(Env::prefixed(ENV_PREFIX).split("__"));
        let endpoint_configured = layers.contains("client.endpoint");

        let mut config: Self = Figment::from(Serialized::defaults(defaults))
            .merge(layers)
            .extract()
            .map_err(Box::new)?;
        config.client.mode = config.client.mode.resolve(endpoint_configured);
        config.validate()?;
        tracing::debug!(path = ?path, "configuration loaded");
        Ok(config)
    }

    /// Apply command-line overrides on top of the loaded layers.
    ///
    /// # Errors
    /// Returns `ConfigError::Invalid` if the overridden values are invalid.
    pub fn apply_cli_overrides(&mut self, overrides: &CliOverrides) -> Result<(), ConfigError> {
        if let Some(bind_addr) = &overrides.bind_addr {
            self.server.bind_addr.clone_from(bind_addr);
        }
        if let Some(endpoint) = &overrides.endpoint {
            self.client.endpoint.clone_from(endpoint);
            self.client.mode = ClientMode::Remote;
        }
        if let Some(mode) = overrides.client_mode {
            self.client.mode = mode;
        }
        if let Some(level) = level_for_verbosity(overrides.verbose) {
            self.logging.level = level.to_owned();
        }
        self.validate()
    }

    /// # Errors
    /// Returns `ConfigError::Invalid` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.socket_addr()?;
        if self.server.queue_capacity == 0 {
            return Err(ConfigError::invalid(
                "server.queue_capacity",
                "must be greater than zero",
            ));
        }
        if self.client.endpoint.trim().is_empty() {
            return Err(ConfigError::invalid("client.endpoint", "must not be empty"));
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::invalid("logging.level", "must not be empty"));
        }
        Ok(())
    }

    /// Effective configuration as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns `ConfigError::Render` if serialization fails.
    pub fn to_pretty_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// `-v` info, `-vv` debug, `-vvv` trace.
#[must_use]
pub fn level_for_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

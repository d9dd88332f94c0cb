use std::{num::NonZeroU32, path::Path, time::Duration};

use crate::communication::RetryPolicy;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Usage: {0}")]
    Usage(String),
}

/// Runtime settings, read from a toml file. Every key is optional.
///
/// ```toml
/// uart = "/dev/ttyS1"
/// baudrate = 115200
/// log_path = "log"
/// open_retry_interval_ms = 100
/// open_attempts = 5
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub uart: String,
    pub baudrate: u32,
    pub log_path: String,
    pub open_retry_interval_ms: u64,
    /// Absent means the port is opened with unlimited retries
    pub open_attempts: Option<NonZeroU32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            uart: "/dev/ttyS1".into(),
            baudrate: 115200,
            log_path: "log".into(),
            open_retry_interval_ms: 100,
            open_attempts: None,
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Reads the config at `path`. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(content) => Self::from_toml(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Applies the command line arguments (without the program name). A single positional
    /// argument replaces the port.
    pub fn with_args<I>(mut self, args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        match args.as_slice() {
            [] => (),
            [port] => self.uart = port.clone(),
            _ => return Err(ConfigError::Usage("uart_responder [PORT]".into())),
        }
        Ok(self)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            interval: Duration::from_millis(self.open_retry_interval_ms),
            max_attempts: self.open_attempts,
        }
    }
}

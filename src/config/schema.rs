//! Settings file schema.
//!
//! Serial values are kept in their raw file form and validated when they
//! are turned into a port [`Config`](crate::port::Config), so a bad parity
//! or stop-bit count is reported with the same error kinds as the API.

use super::error::{ConfigError, ConfigResult};
use crate::port::{Config, Parity, StopBits};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root settings structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Serial line settings
    pub serial: SerialSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Line speed used when neither a flag nor the settings file names one.
pub const DEFAULT_BAUD: u32 = 115_200;

/// Read timeout used when none is configured. Positive, so a reader
/// loop waits for data instead of spinning.
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 1000;

/// `[serial]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialSettings {
    /// Device path
    pub name: Option<String>,
    pub baud: u32,
    pub data_bits: u8,
    /// "none", "odd" or "even"
    pub parity: String,
    pub stop_bits: u8,
    pub read_timeout_ms: u64,
}

impl Default for SerialSettings {
    fn default() -> Self {
        let defaults = Config::default();
        Self {
            name: None,
            baud: DEFAULT_BAUD,
            data_bits: defaults.data_bits,
            parity: defaults.parity.to_string(),
            stop_bits: defaults.stop_bits.into(),
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
        }
    }
}

impl SerialSettings {
    /// Read timeout as a Duration
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Build a port configuration.
    ///
    /// Data bits are validated when the port is opened; parity and stop
    /// bits are validated here.
    pub fn to_port_config(&self) -> ConfigResult<Config> {
        let name = self
            .name
            .as_deref()
            .ok_or_else(|| ConfigError::MissingRequired("serial.name".to_string()))?;
        let parity: Parity = self.parity.parse()?;
        let stop_bits = StopBits::try_from(self.stop_bits)?;

        Ok(Config::new(name, self.baud)
            .data_bits(self.data_bits)
            .parity(parity)
            .stop_bits(stop_bits)
            .read_timeout(self.read_timeout()))
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

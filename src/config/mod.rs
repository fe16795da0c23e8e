//! Settings file support.
//!
//! Port settings can come from a TOML file instead of code. The file is
//! resolved from the following locations (in order of priority):
//!
//! 1. `SERIAL_LINE_CONFIG` environment variable (explicit path)
//! 2. `./serial-line.toml` (current directory)
//! 3. `~/.config/serial-line/serial-line.toml` (or under `$XDG_CONFIG_HOME`)
//! 4. Built-in defaults (no file required)
//!
//! `SERIAL_LINE_PORT`, `SERIAL_LINE_BAUD`, `SERIAL_LINE_TIMEOUT_MS` and
//! `SERIAL_LINE_LOG_LEVEL` override the file.
//!
//! ```toml
//! [serial]
//! name = "/dev/ttyUSB0"
//! baud = 115200
//! data_bits = 8
//! parity = "none"
//! stop_bits = 1
//! read_timeout_ms = 500
//!
//! [logging]
//! level = "info"
//! ```

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{get_default_config_path, resolve_config_path, ConfigLoader};
pub use schema::{LoggingSettings, SerialSettings, Settings};

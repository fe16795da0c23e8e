//! Serial Line Library
//!
//! Opens a serial device, programs its line-control attributes (speed,
//! framing, raw mode, read timeout) and exposes the configured link as a
//! byte stream.
//!
//! # Modules
//!
//! - `port`: configuration, attribute translation, device backends and the
//!   [`Port`] handle
//! - `config`: TOML settings files with environment overrides
//!
//! # Example
//!
//! ```no_run
//! use serial_line::{open_port, Config};
//!
//! let mut port = open_port(&Config::new("/dev/ttyUSB0", 115200))?;
//! let mut buffer = [0u8; 128];
//! let n = port.read(&mut buffer)?;
//! println!("{:?}", String::from_utf8_lossy(&buffer[..n]));
//! port.close()?;
//! # Ok::<(), serial_line::PortError>(())
//! ```

pub mod config;
pub mod port;

// Re-export commonly used types for convenience
pub use port::{
    open_port_with, BaudRate, CharSize, Config, LineAttributes, LineBackend, LineDevice,
    MockBackend, Parity, Port, PortError, ReadTimeout, StopBits,
};

#[cfg(unix)]
pub use port::{open_port, TtyBackend, TtyPort};

pub use config::{ConfigError, ConfigLoader, ConfigResult, Settings};

//! Core types and traits for serial port access.
//!
//! `Config` is what callers hand to the configurator. `LineBackend` and
//! `LineDevice` are the narrow OS capability interface the configurator and
//! [`Port`](super::Port) drive, so the same logic runs against a real
//! terminal or the in-memory mock.

use super::attributes::LineAttributes;
use super::error::PortError;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Configuration parameters for opening a serial port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Device path (e.g. `/dev/ttyUSB0`).
    pub name: PathBuf,

    /// Requested baud rate. Unsupported values fall back to 9600.
    pub baud: u32,

    /// Bits per character: 5, 6, 7 or 8.
    pub data_bits: u8,

    /// Parity checking mode.
    pub parity: Parity,

    /// Number of stop bits.
    pub stop_bits: StopBits,

    /// Bound on a blocking read. Zero returns immediately.
    pub read_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: PathBuf::new(),
            baud: 9600,
            data_bits: 8,
            parity: Parity::None,
            stop_bits: StopBits::One,
            read_timeout: Duration::ZERO,
        }
    }
}

impl Config {
    /// Configuration for `name` at `baud`, 8N1, no read timeout.
    pub fn new(name: impl Into<PathBuf>, baud: u32) -> Self {
        Self {
            name: name.into(),
            baud,
            ..Default::default()
        }
    }

    pub fn data_bits(mut self, data_bits: u8) -> Self {
        self.data_bits = data_bits;
        self
    }

    pub fn parity(mut self, parity: Parity) -> Self {
        self.parity = parity;
        self
    }

    pub fn stop_bits(mut self, stop_bits: StopBits) -> Self {
        self.stop_bits = stop_bits;
        self
    }

    pub fn read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }
}

/// Parity checking modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parity {
    #[default]
    None,
    Odd,
    Even,
}

impl FromStr for Parity {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "n" => Ok(Parity::None),
            "odd" | "o" => Ok(Parity::Odd),
            "even" | "e" => Ok(Parity::Even),
            _ => Err(PortError::BadParity(s.to_string())),
        }
    }
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Parity::None => "none",
            Parity::Odd => "odd",
            Parity::Even => "even",
        };
        f.write_str(s)
    }
}

/// Number of stop bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopBits {
    #[default]
    One,
    Two,
}

impl TryFrom<u8> for StopBits {
    type Error = PortError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        match bits {
            1 => Ok(StopBits::One),
            2 => Ok(StopBits::Two),
            other => Err(PortError::BadStopBits(other.to_string())),
        }
    }
}

impl FromStr for StopBits {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(StopBits::One),
            "2" => Ok(StopBits::Two),
            _ => Err(PortError::BadStopBits(s.to_string())),
        }
    }
}

impl From<StopBits> for u8 {
    fn from(bits: StopBits) -> Self {
        match bits {
            StopBits::One => 1,
            StopBits::Two => 2,
        }
    }
}

/// One open descriptor that supports line-control attributes.
///
/// Reads and writes follow the OS contract: a short count is not an error.
pub trait LineDevice: fmt::Debug + Sized {
    /// Platform encoding of the line-control attributes.
    type Raw;

    /// Whether the descriptor is a terminal-class device.
    fn is_terminal(&self) -> bool;

    /// Fetch the current attributes.
    fn fetch_attributes(&self) -> io::Result<Self::Raw>;

    /// Encode `attrs` onto `raw`, switching the line to raw mode.
    fn encode_attributes(attrs: &LineAttributes, raw: &mut Self::Raw) -> io::Result<()>;

    /// Commit attributes to the descriptor, taking effect immediately.
    fn commit_attributes(&mut self, raw: &Self::Raw) -> io::Result<()>;

    /// Clear non-blocking mode so reads honour the configured timeout.
    fn set_blocking(&mut self) -> io::Result<()>;

    fn read(&mut self, buffer: &mut [u8]) -> io::Result<usize>;

    fn write(&mut self, data: &[u8]) -> io::Result<usize>;

    /// Block until queued output has been transmitted.
    fn drain(&mut self) -> io::Result<()>;

    /// Release the descriptor.
    fn close(self) -> io::Result<()>;
}

/// Opens devices for the configurator.
pub trait LineBackend {
    type Device: LineDevice;

    /// Open `path` read/write, without making it the controlling terminal
    /// and without blocking on open.
    fn open(&self, path: &Path) -> io::Result<Self::Device>;
}

//! Port-specific error types.
//!
//! Every stage of opening and driving a port fails with its own variant so
//! callers can tell a missing device from a rejected configuration or a
//! runtime fault on the line.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while opening or using a serial port.
#[derive(Debug, Error)]
pub enum PortError {
    /// The OS refused to open the device path (missing, permission, busy).
    #[error("Failed to open '{path}': {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The path opened but does not support line-control attributes.
    #[error("'{}' is not a terminal device", .0.display())]
    NotATerminal(PathBuf),

    /// Reading the current line-control attributes failed.
    #[error("Failed to read line attributes: {0}")]
    AttributeFetchFailed(#[source] io::Error),

    /// Committing the computed line-control attributes failed.
    #[error("Failed to apply line attributes: {0}")]
    AttributeCommitFailed(#[source] io::Error),

    /// Data bits outside {5, 6, 7, 8}.
    #[error("Bad character size: {0} (expected 5, 6, 7 or 8)")]
    BadCharacterSize(u8),

    /// Parity value outside {none, odd, even}.
    #[error("Bad parity: {0:?} (expected none, odd or even)")]
    BadParity(String),

    /// Stop bits value outside {1, 2}.
    #[error("Bad stop bits: {0:?} (expected 1 or 2)")]
    BadStopBits(String),

    /// Switching the descriptor back to blocking mode failed.
    #[error("Failed to set blocking mode: {0}")]
    BlockingModeFailed(#[source] io::Error),

    /// An I/O fault during read, write or flush.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The port was already closed.
    #[error("Port is closed")]
    UseAfterClose,
}

impl PortError {
    /// Create an `OpenFailed` error for a path.
    pub fn open_failed(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::OpenFailed {
            path: path.into(),
            source,
        }
    }

    /// True for errors caused by a configuration value rather than the OS.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::BadCharacterSize(_) | Self::BadParity(_) | Self::BadStopBits(_)
        )
    }
}

impl From<PortError> for io::Error {
    fn from(err: PortError) -> Self {
        match err {
            PortError::Io(e) => e,
            PortError::OpenFailed { source, .. } => source,
            PortError::UseAfterClose => {
                io::Error::new(io::ErrorKind::NotConnected, PortError::UseAfterClose)
            }
            e if e.is_validation() => io::Error::new(io::ErrorKind::InvalidInput, e),
            e => io::Error::new(io::ErrorKind::Other, e),
        }
    }
}

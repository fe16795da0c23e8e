//! Port configuration and transport layer.
//!
//! A [`Config`] is validated into [`LineAttributes`], applied to a device
//! opened through a [`LineBackend`], and handed back as a [`Port`] with
//! byte-stream read/write/flush/close. The terminal backend lives in `tty`
//! (unix only); `mock` provides an in-memory backend for tests.

pub mod attributes;
pub mod baud;
pub mod configurator;
pub mod error;
pub mod handle;
pub mod mock;
pub mod timeout;
pub mod traits;

#[cfg(unix)]
pub mod tty;

pub use attributes::{CharSize, LineAttributes};
pub use baud::{BaudRate, SUPPORTED_BAUD_RATES};
pub use configurator::open_port_with;
pub use error::PortError;
pub use handle::Port;
pub use mock::{MockBackend, MockDevice, MockFailure};
pub use timeout::ReadTimeout;
pub use traits::*;

#[cfg(unix)]
pub use configurator::open_port;
#[cfg(unix)]
pub use tty::{TtyBackend, TtyDevice};

/// A port on a real terminal device.
#[cfg(unix)]
pub type TtyPort = Port<TtyDevice>;

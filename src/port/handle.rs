//! Byte-stream handle over an open, configured line device.

use super::attributes::LineAttributes;
use super::error::PortError;
use super::traits::LineDevice;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// An open serial port.
///
/// The port exclusively owns its device. Every operation takes `&mut self`,
/// so a port is driven by one reader/writer at a time; share it across
/// threads only behind a lock. After [`close`](Port::close) every operation
/// fails with [`PortError::UseAfterClose`]. Dropping an open port closes it.
#[derive(Debug)]
pub struct Port<D: LineDevice> {
    device: Option<D>,
    name: PathBuf,
    attributes: LineAttributes,
}

impl<D: LineDevice> Port<D> {
    pub(crate) fn new(device: D, name: PathBuf, attributes: LineAttributes) -> Self {
        Self {
            device: Some(device),
            name,
            attributes,
        }
    }

    fn device(&mut self) -> Result<&mut D, PortError> {
        self.device.as_mut().ok_or(PortError::UseAfterClose)
    }

    /// Device path this port was opened from.
    pub fn name(&self) -> &Path {
        &self.name
    }

    /// Line settings applied when the port was opened.
    pub fn attributes(&self) -> &LineAttributes {
        &self.attributes
    }

    pub fn is_open(&self) -> bool {
        self.device.is_some()
    }

    /// Read up to `buffer.len()` bytes.
    ///
    /// How long this blocks is governed by the read timeout the port was
    /// opened with. A read that times out with nothing available returns
    /// `Ok(0)`; only a fault on the descriptor is an error. A read
    /// interrupted by a signal is retried.
    pub fn read(&mut self, buffer: &mut [u8]) -> Result<usize, PortError> {
        let device = self.device()?;
        loop {
            match device.read(buffer) {
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(0),
                Err(e) => return Err(PortError::Io(e)),
            }
        }
    }

    /// Write bytes, returning how many the OS accepted.
    ///
    /// The count may be short; callers wanting all-or-error use
    /// [`std::io::Write::write_all`].
    pub fn write(&mut self, data: &[u8]) -> Result<usize, PortError> {
        Ok(self.device()?.write(data)?)
    }

    /// Block until everything written so far has been transmitted.
    pub fn flush(&mut self) -> Result<(), PortError> {
        Ok(self.device()?.drain()?)
    }

    /// Release the device.
    ///
    /// The descriptor is gone after this call even if the OS reports an
    /// error closing it.
    pub fn close(&mut self) -> Result<(), PortError> {
        let device = self.device.take().ok_or(PortError::UseAfterClose)?;
        debug!("Closing {}", self.name.display());
        device.close().map_err(PortError::Io)
    }
}

/// A read that times out with nothing received returns `Ok(0)`, which
/// `std::io` treats as end of stream: `read_exact` fails with
/// `UnexpectedEof` and `read_to_end` stops. Use a timeout long enough for
/// the expected data, or loop on [`Port::read`] directly.
impl<D: LineDevice> io::Read for Port<D> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Port::read(self, buf).map_err(io::Error::from)
    }
}

impl<D: LineDevice> io::Write for Port<D> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Port::write(self, buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        Port::flush(self).map_err(io::Error::from)
    }
}

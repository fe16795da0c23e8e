//! Mock line device for testing.
//!
//! `MockBackend` opens in-memory devices that share one state block, so a
//! test can drive a [`Port`](super::Port) and then inspect what the
//! configurator committed, what was written, and how many handles are still
//! open. Any combination of stages can be told to fail.

use super::attributes::LineAttributes;
use super::traits::{LineBackend, LineDevice};
use std::collections::{HashSet, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Stage at which the mock should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockFailure {
    Open,
    NotATerminal,
    FetchAttributes,
    CommitAttributes,
    SetBlocking,
    Read,
    /// The next read is interrupted by a signal, once.
    Interrupted,
    Write,
    Drain,
    Close,
}

/// Raw attribute block of a mock device.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockLine {
    pub attributes: Option<LineAttributes>,
}

#[derive(Debug, Default)]
struct MockState {
    /// Bytes returned by reads.
    read_queue: VecDeque<u8>,
    /// Every accepted write, in order.
    write_log: Vec<Vec<u8>>,
    /// Written bytes are fed back into the read queue.
    loopback: bool,
    /// Cap on bytes accepted per write call.
    write_limit: Option<usize>,
    failures: HashSet<MockFailure>,
    /// Last committed attributes.
    line: MockLine,
    blocking: bool,
    opened: usize,
    open_handles: usize,
    drains: usize,
    last_path: Option<PathBuf>,
}

/// Backend producing [`MockDevice`]s that share state with it.
///
/// # Example
/// ```
/// use serial_line::port::{open_port_with, Config, MockBackend};
///
/// let backend = MockBackend::loopback();
/// let mut port = open_port_with(&backend, &Config::new("/dev/mock0", 115200))?;
///
/// port.write(b"ping")?;
/// let mut buffer = [0u8; 4];
/// let n = port.read(&mut buffer)?;
/// assert_eq!(&buffer[..n], b"ping");
///
/// port.close()?;
/// assert_eq!(backend.open_handles(), 0);
/// # Ok::<(), serial_line::PortError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose devices read back what they were written.
    pub fn loopback() -> Self {
        let backend = Self::default();
        backend.state().loopback = true;
        backend
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fail at `stage` from now on, in addition to any stages already set.
    pub fn fail_at(&self, stage: MockFailure) {
        self.state().failures.insert(stage);
    }

    /// Stop failing at `stage`.
    pub fn clear_failure(&self, stage: MockFailure) {
        self.state().failures.remove(&stage);
    }

    /// Accept at most `limit` bytes per write call.
    pub fn set_write_limit(&self, limit: Option<usize>) {
        self.state().write_limit = limit;
    }

    /// Enqueue bytes to be returned by subsequent reads.
    pub fn enqueue_read(&self, data: &[u8]) {
        self.state().read_queue.extend(data);
    }

    /// Copy of all data written so far.
    pub fn get_write_log(&self) -> Vec<Vec<u8>> {
        self.state().write_log.clone()
    }

    /// Attributes committed by the most recent open.
    pub fn committed(&self) -> Option<LineAttributes> {
        self.state().line.attributes
    }

    /// Whether the last device was switched to blocking mode.
    pub fn is_blocking(&self) -> bool {
        self.state().blocking
    }

    /// Number of successful device opens.
    pub fn opened(&self) -> usize {
        self.state().opened
    }

    /// Devices opened and not yet closed or dropped.
    pub fn open_handles(&self) -> usize {
        self.state().open_handles
    }

    /// Number of drain requests.
    pub fn drains(&self) -> usize {
        self.state().drains
    }

    /// Path passed to the most recent open.
    pub fn last_path(&self) -> Option<PathBuf> {
        self.state().last_path.clone()
    }
}

impl LineBackend for MockBackend {
    type Device = MockDevice;

    fn open(&self, path: &Path) -> io::Result<MockDevice> {
        let mut state = self.state();
        state.last_path = Some(path.to_path_buf());
        if state.failures.contains(&MockFailure::Open) {
            return Err(io::Error::new(io::ErrorKind::NotFound, "mock open failure"));
        }
        state.opened += 1;
        state.open_handles += 1;
        state.blocking = false;

        Ok(MockDevice {
            state: Arc::clone(&self.state),
            released: false,
        })
    }
}

/// One open mock device.
#[derive(Debug)]
pub struct MockDevice {
    state: Arc<Mutex<MockState>>,
    released: bool,
}

impl MockDevice {
    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check(&self, stage: MockFailure) -> io::Result<()> {
        if self.state().failures.contains(&stage) {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("mock {stage:?} failure"),
            ));
        }
        Ok(())
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            let mut state = self.state();
            state.open_handles = state.open_handles.saturating_sub(1);
        }
    }
}

impl LineDevice for MockDevice {
    type Raw = MockLine;

    fn is_terminal(&self) -> bool {
        !self.state().failures.contains(&MockFailure::NotATerminal)
    }

    fn fetch_attributes(&self) -> io::Result<MockLine> {
        self.check(MockFailure::FetchAttributes)?;
        Ok(self.state().line.clone())
    }

    fn encode_attributes(attrs: &LineAttributes, raw: &mut MockLine) -> io::Result<()> {
        raw.attributes = Some(*attrs);
        Ok(())
    }

    fn commit_attributes(&mut self, raw: &MockLine) -> io::Result<()> {
        self.check(MockFailure::CommitAttributes)?;
        self.state().line = raw.clone();
        Ok(())
    }

    fn set_blocking(&mut self) -> io::Result<()> {
        self.check(MockFailure::SetBlocking)?;
        self.state().blocking = true;
        Ok(())
    }

    fn read(&mut self, buffer: &mut [u8]) -> io::Result<usize> {
        self.check(MockFailure::Read)?;
        let mut state = self.state();
        if state.failures.remove(&MockFailure::Interrupted) {
            return Err(io::Error::from(io::ErrorKind::Interrupted));
        }
        let n = buffer.len().min(state.read_queue.len());
        for (slot, byte) in buffer.iter_mut().zip(state.read_queue.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.check(MockFailure::Write)?;
        let mut state = self.state();
        let n = state.write_limit.map_or(data.len(), |limit| limit.min(data.len()));
        let accepted = &data[..n];
        state.write_log.push(accepted.to_vec());
        if state.loopback {
            state.read_queue.extend(accepted);
        }
        Ok(n)
    }

    fn drain(&mut self) -> io::Result<()> {
        self.check(MockFailure::Drain)?;
        self.state().drains += 1;
        Ok(())
    }

    fn close(mut self) -> io::Result<()> {
        // The handle is released even when close reports an error.
        self.release();
        self.check(MockFailure::Close)
    }
}

impl Drop for MockDevice {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loopback_device() {
        let backend = MockBackend::loopback();
        let mut device = backend.open(Path::new("/dev/mock0")).unwrap();

        assert_eq!(device.write(b"hello").unwrap(), 5);
        let mut buffer = [0u8; 8];
        let n = device.read(&mut buffer).unwrap();
        assert_eq!(&buffer[..n], b"hello");
        assert_eq!(backend.get_write_log(), vec![b"hello".to_vec()]);
    }

    #[test]
    fn test_enqueued_reads_and_empty_queue() {
        let backend = MockBackend::new();
        backend.enqueue_read(b"abc");
        let mut device = backend.open(Path::new("/dev/mock0")).unwrap();

        let mut buffer = [0u8; 2];
        assert_eq!(device.read(&mut buffer).unwrap(), 2);
        assert_eq!(&buffer, b"ab");
        assert_eq!(device.read(&mut buffer).unwrap(), 1);
        assert_eq!(device.read(&mut buffer).unwrap(), 0);
    }

    #[test]
    fn test_write_limit() {
        let backend = MockBackend::new();
        backend.set_write_limit(Some(3));
        let mut device = backend.open(Path::new("/dev/mock0")).unwrap();
        assert_eq!(device.write(b"abcdef").unwrap(), 3);
        assert_eq!(backend.get_write_log(), vec![b"abc".to_vec()]);
    }

    #[test]
    fn test_handle_accounting() {
        let backend = MockBackend::new();
        let first = backend.open(Path::new("/dev/mock0")).unwrap();
        let second = backend.open(Path::new("/dev/mock0")).unwrap();
        assert_eq!(backend.open_handles(), 2);

        first.close().unwrap();
        assert_eq!(backend.open_handles(), 1);
        drop(second);
        assert_eq!(backend.open_handles(), 0);
        assert_eq!(backend.opened(), 2);
    }

    #[test]
    fn test_failure_injection() {
        let backend = MockBackend::new();
        backend.fail_at(MockFailure::Open);
        assert!(backend.open(Path::new("/dev/mock0")).is_err());
        assert_eq!(backend.last_path(), Some(PathBuf::from("/dev/mock0")));

        backend.clear_failure(MockFailure::Open);
        backend.fail_at(MockFailure::Read);
        let mut device = backend.open(Path::new("/dev/mock0")).unwrap();
        assert!(device.read(&mut [0u8; 4]).is_err());
        assert!(device.write(b"ok").is_ok());

        backend.clear_failure(MockFailure::Read);
        assert_eq!(device.read(&mut [0u8; 4]).unwrap(), 2);
    }

    #[test]
    fn test_combined_failures() {
        let backend = MockBackend::new();
        backend.fail_at(MockFailure::NotATerminal);
        backend.fail_at(MockFailure::Close);

        let device = backend.open(Path::new("/dev/mock0")).unwrap();
        assert!(!device.is_terminal());
        assert!(device.close().is_err());
        assert_eq!(backend.open_handles(), 0);
    }

    #[test]
    fn test_interrupt_fires_once() {
        let backend = MockBackend::new();
        backend.enqueue_read(b"x");
        backend.fail_at(MockFailure::Interrupted);
        let mut device = backend.open(Path::new("/dev/mock0")).unwrap();

        let err = device.read(&mut [0u8; 4]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Interrupted);
        assert_eq!(device.read(&mut [0u8; 4]).unwrap(), 1);
    }
}

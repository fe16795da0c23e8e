//! Shared test utilities for serial_line tests.
//!
//! - Pseudo-terminal pairs standing in for a loopback-wired serial device
//! - Reading helpers that tolerate short reads

#![allow(dead_code)]

use serial_line::{LineDevice, Port};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Open a pseudo-terminal and return its master side plus the slave path.
///
/// The slave path behaves like a serial device: it accepts line-control
/// attributes, and whatever the master writes arrives on it.
#[cfg(target_os = "linux")]
pub fn open_pty() -> (nix::pty::PtyMaster, PathBuf) {
    use nix::fcntl::OFlag;
    use nix::pty::{grantpt, posix_openpt, ptsname_r, unlockpt};

    let master = posix_openpt(OFlag::O_RDWR | OFlag::O_NOCTTY).expect("posix_openpt");
    grantpt(&master).expect("grantpt");
    unlockpt(&master).expect("unlockpt");
    let name = ptsname_r(&master).expect("ptsname_r");
    (master, PathBuf::from(name))
}

/// Read from `port` until `len` bytes arrive or `deadline` passes.
pub fn read_at_least<D: LineDevice>(port: &mut Port<D>, len: usize, deadline: Duration) -> Vec<u8> {
    let start = Instant::now();
    let mut collected = Vec::with_capacity(len);
    let mut buffer = [0u8; 64];

    while collected.len() < len && start.elapsed() < deadline {
        let n = port.read(&mut buffer).expect("read from port");
        collected.extend_from_slice(&buffer[..n]);
    }
    collected
}

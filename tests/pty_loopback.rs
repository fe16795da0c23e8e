//! End-to-end tests against pseudo-terminals.
//!
//! A pty slave is a real terminal device, so these exercise the termios
//! backend without serial hardware: the master side plays the remote end
//! of the wire. The pty driver always forces CS8 and no parity, so
//! character size and parity encoding are covered by the unit tests.

#![cfg(target_os = "linux")]

mod common;

use common::{open_pty, read_at_least};
use nix::sys::termios::{self, ControlFlags, LocalFlags, SpecialCharacterIndices};
use serial_line::{open_port, BaudRate, Config, Parity, PortError, StopBits};
use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;
use std::time::{Duration, Instant};

fn current_termios(path: &Path) -> termios::Termios {
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .custom_flags(libc::O_NOCTTY)
        .open(path)
        .unwrap();
    termios::tcgetattr(&file).unwrap()
}

#[test]
fn test_write_reaches_remote_end() {
    let (mut master, slave) = open_pty();
    let mut port = open_port(&Config::new(&slave, 115200)).unwrap();

    let n = port.write(b"hello pty").unwrap();
    assert_eq!(n, 9);
    port.flush().unwrap();

    let mut received = [0u8; 9];
    master.read_exact(&mut received).unwrap();
    assert_eq!(&received, b"hello pty");
}

#[test]
fn test_remote_bytes_arrive_in_order() {
    let (mut master, slave) = open_pty();
    let config = Config::new(&slave, 115200).read_timeout(Duration::from_secs(1));
    let mut port = open_port(&config).unwrap();

    // Raw mode: no CR/NL translation, no line buffering.
    let payload = b"line one\rline two\n\x03\x00\xff";
    master.write_all(payload).unwrap();

    let received = read_at_least(&mut port, payload.len(), Duration::from_secs(5));
    assert_eq!(received, payload);
}

#[test]
fn test_zero_timeout_returns_immediately() {
    let (_master, slave) = open_pty();
    let mut port = open_port(&Config::new(&slave, 9600)).unwrap();

    let start = Instant::now();
    let n = port.read(&mut [0u8; 32]).unwrap();
    assert_eq!(n, 0);
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[test]
fn test_positive_timeout_waits_then_returns_empty() {
    let (_master, slave) = open_pty();
    let config = Config::new(&slave, 9600).read_timeout(Duration::from_millis(200));
    let mut port = open_port(&config).unwrap();

    let start = Instant::now();
    let n = port.read(&mut [0u8; 32]).unwrap();
    let elapsed = start.elapsed();

    assert_eq!(n, 0);
    assert!(elapsed >= Duration::from_millis(150), "returned after {elapsed:?}");
    assert!(elapsed < Duration::from_secs(5));
}

#[test]
fn test_attributes_reach_the_device() {
    let (_master, slave) = open_pty();
    let config = Config::new(&slave, 57600)
        .data_bits(7)
        .parity(Parity::Even)
        .stop_bits(StopBits::Two)
        .read_timeout(Duration::from_millis(500));
    let _port = open_port(&config).unwrap();

    let raw = current_termios(&slave);
    assert!(raw.control_flags.contains(ControlFlags::CSTOPB));
    assert!(raw.control_flags.contains(ControlFlags::CLOCAL | ControlFlags::CREAD));
    assert!(!raw.local_flags.intersects(LocalFlags::ICANON | LocalFlags::ECHO | LocalFlags::ISIG));
    assert_eq!(raw.control_chars[SpecialCharacterIndices::VMIN as usize], 0);
    assert_eq!(raw.control_chars[SpecialCharacterIndices::VTIME as usize], 5);
    assert_eq!(termios::cfgetospeed(&raw), termios::BaudRate::B57600);
    assert_eq!(termios::cfgetispeed(&raw), termios::BaudRate::B57600);
}

#[test]
fn test_unknown_baud_falls_back_to_9600() {
    let (_master, slave) = open_pty();
    let port = open_port(&Config::new(&slave, 999_999)).unwrap();

    assert_eq!(port.attributes().speed, BaudRate::B9600);
    assert_eq!(termios::cfgetospeed(&current_termios(&slave)), termios::BaudRate::B9600);
}

#[test]
fn test_reopen_after_close_with_new_config() {
    let (mut master, slave) = open_pty();

    let mut port = open_port(&Config::new(&slave, 9600).stop_bits(StopBits::Two)).unwrap();
    port.close().unwrap();
    assert!(matches!(port.write(b"x"), Err(PortError::UseAfterClose)));

    let mut port = open_port(&Config::new(&slave, 115200).parity(Parity::Odd)).unwrap();
    assert!(!current_termios(&slave).control_flags.contains(ControlFlags::CSTOPB));

    port.write(b"ok").unwrap();
    let mut received = [0u8; 2];
    master.read_exact(&mut received).unwrap();
    assert_eq!(&received, b"ok");
}

#[test]
fn test_bad_character_size_gives_no_port() {
    let (_master, slave) = open_pty();
    let result = open_port(&Config::new(&slave, 115200).data_bits(9));
    assert!(matches!(result, Err(PortError::BadCharacterSize(9))));
}

#[test]
fn test_regular_file_is_rejected() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let result = open_port(&Config::new(file.path(), 9600));
    assert!(matches!(result, Err(PortError::NotATerminal(p)) if p == file.path()));
}

#[test]
fn test_missing_device_fails_to_open() {
    let result = open_port(&Config::new("/dev/serial_line_missing_device", 9600));
    match result {
        Err(PortError::OpenFailed { source, .. }) => {
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound)
        }
        other => panic!("Expected OpenFailed, got: {:?}", other.map(|_| ())),
    }
}

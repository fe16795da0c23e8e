//! Terminal device backend for unix hosts.
//!
//! Opens character devices with `O_NOCTTY | O_NONBLOCK` and programs them
//! through termios.

use super::attributes::{CharSize, LineAttributes};
use super::baud::BaudRate;
use super::traits::{LineBackend, LineDevice, Parity, StopBits};
use nix::fcntl::{fcntl, FcntlArg, OFlag};
use nix::sys::termios::{
    self, ControlFlags, InputFlags, LocalFlags, OutputFlags, SetArg, SpecialCharacterIndices,
    Termios,
};
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::{AsRawFd, IntoRawFd};
use std::path::Path;

/// Backend that opens real terminal devices.
#[derive(Debug, Clone, Copy, Default)]
pub struct TtyBackend;

impl LineBackend for TtyBackend {
    type Device = TtyDevice;

    fn open(&self, path: &Path) -> io::Result<TtyDevice> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_NOCTTY | libc::O_NONBLOCK)
            .open(path)?;

        Ok(TtyDevice { file })
    }
}

/// An open terminal descriptor.
#[derive(Debug)]
pub struct TtyDevice {
    file: File,
}

impl LineDevice for TtyDevice {
    type Raw = Termios;

    fn is_terminal(&self) -> bool {
        termios::tcgetattr(&self.file).is_ok()
    }

    fn fetch_attributes(&self) -> io::Result<Termios> {
        termios::tcgetattr(&self.file).map_err(io::Error::from)
    }

    fn encode_attributes(attrs: &LineAttributes, raw: &mut Termios) -> io::Result<()> {
        encode(attrs, raw)
    }

    fn commit_attributes(&mut self, raw: &Termios) -> io::Result<()> {
        termios::tcsetattr(&self.file, SetArg::TCSANOW, raw).map_err(io::Error::from)
    }

    fn set_blocking(&mut self) -> io::Result<()> {
        let fd = self.file.as_raw_fd();
        let flags = fcntl(fd, FcntlArg::F_GETFL)?;
        let mut flags = OFlag::from_bits_truncate(flags);
        flags.remove(OFlag::O_NONBLOCK);
        fcntl(fd, FcntlArg::F_SETFL(flags))?;
        Ok(())
    }

    fn read(&mut self, buffer: &mut [u8]) -> io::Result<usize> {
        self.file.read(buffer)
    }

    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.file.write(data)
    }

    fn drain(&mut self) -> io::Result<()> {
        termios::tcdrain(&self.file).map_err(io::Error::from)
    }

    fn close(self) -> io::Result<()> {
        let fd = self.file.into_raw_fd();
        nix::unistd::close(fd).map_err(io::Error::from)
    }
}

/// Program `raw` for a raw-mode line described by `attrs`.
pub fn encode(attrs: &LineAttributes, raw: &mut Termios) -> io::Result<()> {
    raw.input_flags.remove(
        InputFlags::BRKINT
            | InputFlags::ICRNL
            | InputFlags::INPCK
            | InputFlags::ISTRIP
            | InputFlags::IXOFF
            | InputFlags::IXON
            | InputFlags::PARMRK,
    );
    raw.control_flags
        .remove(ControlFlags::CSIZE | ControlFlags::PARENB);
    raw.control_flags
        .insert(ControlFlags::CLOCAL | ControlFlags::CREAD);

    let speed = termios_speed(attrs.speed);
    termios::cfsetispeed(raw, speed)?;
    termios::cfsetospeed(raw, speed)?;

    raw.control_flags.insert(match attrs.char_size {
        CharSize::Five => ControlFlags::CS5,
        CharSize::Six => ControlFlags::CS6,
        CharSize::Seven => ControlFlags::CS7,
        CharSize::Eight => ControlFlags::CS8,
    });

    match attrs.parity {
        Parity::None => {}
        Parity::Odd => raw
            .control_flags
            .insert(ControlFlags::PARENB | ControlFlags::PARODD),
        Parity::Even => {
            raw.control_flags.insert(ControlFlags::PARENB);
            raw.control_flags.remove(ControlFlags::PARODD);
        }
    }

    // CSTOPB may survive from whoever configured the line last.
    match attrs.stop_bits {
        StopBits::One => raw.control_flags.remove(ControlFlags::CSTOPB),
        StopBits::Two => raw.control_flags.insert(ControlFlags::CSTOPB),
    }

    raw.local_flags
        .remove(LocalFlags::ICANON | LocalFlags::ECHO | LocalFlags::ECHOE | LocalFlags::ISIG);
    raw.output_flags.remove(OutputFlags::OPOST);

    raw.control_chars[SpecialCharacterIndices::VMIN as usize] = attrs.read_timeout.min_bytes;
    raw.control_chars[SpecialCharacterIndices::VTIME as usize] = attrs.read_timeout.ticks;

    Ok(())
}

fn termios_speed(rate: BaudRate) -> termios::BaudRate {
    use termios::BaudRate as B;

    match rate {
        BaudRate::B50 => B::B50,
        BaudRate::B75 => B::B75,
        BaudRate::B110 => B::B110,
        BaudRate::B134 => B::B134,
        BaudRate::B150 => B::B150,
        BaudRate::B200 => B::B200,
        BaudRate::B300 => B::B300,
        BaudRate::B600 => B::B600,
        BaudRate::B1200 => B::B1200,
        BaudRate::B2400 => B::B2400,
        BaudRate::B4800 => B::B4800,
        BaudRate::B9600 => B::B9600,
        BaudRate::B19200 => B::B19200,
        BaudRate::B38400 => B::B38400,
        BaudRate::B57600 => B::B57600,
        BaudRate::B115200 => B::B115200,
        BaudRate::B230400 => B::B230400,
    }
}

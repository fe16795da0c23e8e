//! `serial-read`: open a serial port and log everything it receives.
//!
//! ```bash
//! serial-read --serial /dev/ttyUSB0 --baud 115200
//! RUST_LOG=debug serial-read --serial /dev/ttyACM0 --parity even --send "AT\r\n"
//! ```
//!
//! Any error from opening, writing or reading ends the process.

use clap::Parser;
use serial_line::config::{ConfigLoader, Settings};
use serial_line::{Config, StopBits};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Size of each read request.
const READ_CHUNK: usize = 128;

// Command-line arguments
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Read from a serial port and log the received bytes.",
    long_about = "Opens a serial device in raw mode and loops issuing fixed-size reads, logging each chunk. Settings not given on the command line come from the settings file and SERIAL_LINE_* environment variables."
)]
struct Args {
    /// Serial port to use.
    #[arg(long)]
    serial: Option<String>,

    /// Baud rate [default: 115200].
    #[arg(long)]
    baud: Option<u32>,

    /// Bits per character (5-8).
    #[arg(long)]
    data_bits: Option<u8>,

    /// Parity: none, odd or even.
    #[arg(long)]
    parity: Option<String>,

    /// Stop bits: 1 or 2.
    #[arg(long)]
    stop_bits: Option<String>,

    /// Read timeout in milliseconds (0 returns immediately) [default: 1000].
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Settings file to load instead of the default search path.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Text to write once after opening.
    #[arg(long)]
    send: Option<String>,
}

impl Args {
    /// Merge command-line flags over the loaded settings.
    fn port_config(&self, settings: &Settings) -> Result<Config, Box<dyn std::error::Error>> {
        let mut serial = settings.serial.clone();
        if let Some(name) = &self.serial {
            serial.name = Some(name.clone());
        }
        if let Some(baud) = self.baud {
            serial.baud = baud;
        }
        if let Some(data_bits) = self.data_bits {
            serial.data_bits = data_bits;
        }
        if let Some(parity) = &self.parity {
            serial.parity = parity.clone();
        }
        if let Some(stop_bits) = &self.stop_bits {
            serial.stop_bits = stop_bits.parse::<StopBits>()?.into();
        }
        if let Some(timeout_ms) = self.timeout_ms {
            serial.read_timeout_ms = timeout_ms;
        }
        Ok(serial.to_port_config()?)
    }
}

#[cfg(unix)]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let settings = match &args.config {
        Some(path) => ConfigLoader::load_from(path)?,
        None => ConfigLoader::load()?,
    }
    .into_settings();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = args.port_config(&settings)?;
    let mut port = serial_line::open_port(&config)?;
    info!(
        "Reading from {} at {} baud",
        port.name().display(),
        port.attributes().speed
    );

    if let Some(text) = &args.send {
        let n = port.write(text.as_bytes())?;
        info!("Wrote {} of {} bytes", n, text.len());
    }

    let mut buffer = [0u8; READ_CHUNK];
    loop {
        let n = port.read(&mut buffer)?;
        if n == 0 {
            continue;
        }
        info!("{:?}", String::from_utf8_lossy(&buffer[..n]));
    }
}

#[cfg(not(unix))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = Args::parse();
    Err("serial-read needs a unix terminal device".into())
}

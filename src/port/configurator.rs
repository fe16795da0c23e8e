//! Opening and configuring ports.

use super::attributes::LineAttributes;
use super::baud::BaudRate;
use super::error::PortError;
use super::handle::Port;
use super::traits::{Config, LineBackend, LineDevice};
use tracing::{debug, warn};

/// Open `config.name` on a real terminal and configure it.
///
/// # Example
/// ```no_run
/// use serial_line::{open_port, Config};
/// use std::time::Duration;
///
/// let config = Config::new("/dev/ttyUSB0", 115200).read_timeout(Duration::from_secs(1));
/// let mut port = open_port(&config)?;
/// port.write(b"AT\r\n")?;
/// # Ok::<(), serial_line::PortError>(())
/// ```
#[cfg(unix)]
pub fn open_port(config: &Config) -> Result<Port<super::tty::TtyDevice>, PortError> {
    open_port_with(&super::tty::TtyBackend, config)
}

/// Open and configure a port through `backend`.
///
/// The configuration is validated before anything is opened. Once the
/// device is open, any failure closes it again before returning, so an
/// error never leaves a descriptor behind.
pub fn open_port_with<B: LineBackend>(
    backend: &B,
    config: &Config,
) -> Result<Port<B::Device>, PortError> {
    debug!(
        "Opening {} (baud {}, data bits {}, parity {}, stop bits {}, read timeout {:?})",
        config.name.display(),
        config.baud,
        config.data_bits,
        config.parity,
        u8::from(config.stop_bits),
        config.read_timeout
    );

    let attributes = LineAttributes::from_config(config)?;
    if BaudRate::lookup(config.baud).is_none() {
        warn!(
            "Unsupported baud rate {} for {}, using {}",
            config.baud,
            config.name.display(),
            attributes.speed
        );
    }

    let mut device = backend.open(&config.name).map_err(|e| {
        warn!("Failed to open {}: {}", config.name.display(), e);
        PortError::open_failed(&config.name, e)
    })?;

    if let Err(e) = configure(&mut device, config, &attributes) {
        warn!("Failed to configure {}: {}", config.name.display(), e);
        if let Err(close_err) = device.close() {
            debug!("Close after failed configure also failed: {}", close_err);
        }
        return Err(e);
    }

    debug!("Opened {} at {} baud", config.name.display(), attributes.speed);
    Ok(Port::new(device, config.name.clone(), attributes))
}

fn configure<D: LineDevice>(
    device: &mut D,
    config: &Config,
    attributes: &LineAttributes,
) -> Result<(), PortError> {
    if !device.is_terminal() {
        return Err(PortError::NotATerminal(config.name.clone()));
    }

    let mut raw = device
        .fetch_attributes()
        .map_err(PortError::AttributeFetchFailed)?;
    D::encode_attributes(attributes, &mut raw).map_err(PortError::AttributeCommitFailed)?;
    device
        .commit_attributes(&raw)
        .map_err(PortError::AttributeCommitFailed)?;

    device.set_blocking().map_err(PortError::BlockingModeFailed)
}

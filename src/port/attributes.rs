//! Portable line-control attributes.
//!
//! `LineAttributes` is the validated form of a [`Config`]. Every value
//! describes a raw-mode line with the receiver enabled and modem control
//! lines ignored; only speed, framing and the read timeout vary.

use super::baud::BaudRate;
use super::error::PortError;
use super::timeout::ReadTimeout;
use super::traits::{Config, Parity, StopBits};

/// Bits per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharSize {
    Five,
    Six,
    Seven,
    Eight,
}

impl TryFrom<u8> for CharSize {
    type Error = PortError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        match bits {
            5 => Ok(CharSize::Five),
            6 => Ok(CharSize::Six),
            7 => Ok(CharSize::Seven),
            8 => Ok(CharSize::Eight),
            other => Err(PortError::BadCharacterSize(other)),
        }
    }
}

impl From<CharSize> for u8 {
    fn from(size: CharSize) -> Self {
        match size {
            CharSize::Five => 5,
            CharSize::Six => 6,
            CharSize::Seven => 7,
            CharSize::Eight => 8,
        }
    }
}

/// Line settings derived from a [`Config`], computed fresh for every open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineAttributes {
    pub speed: BaudRate,
    pub char_size: CharSize,
    pub parity: Parity,
    pub stop_bits: StopBits,
    pub read_timeout: ReadTimeout,
}

impl LineAttributes {
    /// Validate `config` and translate it.
    ///
    /// Fails with [`PortError::BadCharacterSize`] for data bits outside
    /// 5..=8. Unsupported baud rates resolve to 9600.
    pub fn from_config(config: &Config) -> Result<Self, PortError> {
        Ok(Self {
            speed: BaudRate::resolve(config.baud),
            char_size: CharSize::try_from(config.data_bits)?,
            parity: config.parity,
            stop_bits: config.stop_bits,
            read_timeout: ReadTimeout::from_duration(config.read_timeout),
        })
    }
}

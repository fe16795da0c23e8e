//! Supported line speeds.
//!
//! Requests that are not in the table resolve to 9600 instead of failing.

use std::fmt;

/// A line speed from the fixed table of supported rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaudRate {
    B50,
    B75,
    B110,
    B134,
    B150,
    B200,
    B300,
    B600,
    B1200,
    B2400,
    B4800,
    B9600,
    B19200,
    B38400,
    B57600,
    B115200,
    B230400,
}

/// Every supported rate paired with its bits-per-second value.
pub const SUPPORTED_BAUD_RATES: &[(u32, BaudRate)] = &[
    (50, BaudRate::B50),
    (75, BaudRate::B75),
    (110, BaudRate::B110),
    (134, BaudRate::B134),
    (150, BaudRate::B150),
    (200, BaudRate::B200),
    (300, BaudRate::B300),
    (600, BaudRate::B600),
    (1200, BaudRate::B1200),
    (2400, BaudRate::B2400),
    (4800, BaudRate::B4800),
    (9600, BaudRate::B9600),
    (19200, BaudRate::B19200),
    (38400, BaudRate::B38400),
    (57600, BaudRate::B57600),
    (115200, BaudRate::B115200),
    (230400, BaudRate::B230400),
];

impl BaudRate {
    /// Rate used when a request is not in the table.
    pub const FALLBACK: BaudRate = BaudRate::B9600;

    /// Look up `baud` in the table, returning `None` for unsupported values.
    pub fn lookup(baud: u32) -> Option<BaudRate> {
        SUPPORTED_BAUD_RATES
            .iter()
            .find(|(bps, _)| *bps == baud)
            .map(|(_, rate)| *rate)
    }

    /// Resolve `baud`, falling back to 9600 for unsupported values.
    pub fn resolve(baud: u32) -> BaudRate {
        Self::lookup(baud).unwrap_or(Self::FALLBACK)
    }

    /// Bits per second.
    pub fn bits_per_second(self) -> u32 {
        SUPPORTED_BAUD_RATES
            .iter()
            .find(|(_, rate)| *rate == self)
            .map(|(bps, _)| *bps)
            .unwrap_or(9600)
    }
}

impl Default for BaudRate {
    fn default() -> Self {
        Self::FALLBACK
    }
}

impl From<u32> for BaudRate {
    fn from(baud: u32) -> Self {
        Self::resolve(baud)
    }
}

impl From<BaudRate> for u32 {
    fn from(rate: BaudRate) -> Self {
        rate.bits_per_second()
    }
}

impl fmt::Display for BaudRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits_per_second())
    }
}

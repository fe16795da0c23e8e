//! Read-timeout translation.
//!
//! Terminal drivers bound a blocking read with two control characters: the
//! minimum number of bytes that satisfies a read (VMIN) and a timer counted
//! in tenths of a second (VTIME).

use std::time::Duration;

/// Length of one timer tick.
pub const TICK: Duration = Duration::from_millis(100);

/// Largest tick count the timer field can hold.
pub const MAX_TICKS: u8 = u8::MAX;

/// Minimum-bytes/timer pair controlling blocking reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadTimeout {
    /// Bytes required before a read returns (VMIN).
    pub min_bytes: u8,
    /// Timer in ticks of [`TICK`] (VTIME).
    pub ticks: u8,
}

impl ReadTimeout {
    /// Translate a requested read timeout.
    ///
    /// A zero duration gives `(0, 0)`: reads return at once with whatever is
    /// buffered, possibly nothing. A positive duration waits up to that long,
    /// truncated to whole ticks but never below one tick and never above
    /// [`MAX_TICKS`].
    pub fn from_duration(timeout: Duration) -> Self {
        if timeout.is_zero() {
            return Self::default();
        }

        let ticks = timeout.as_millis() / TICK.as_millis();
        let ticks = ticks.clamp(1, MAX_TICKS as u128) as u8;

        Self {
            min_bytes: 0,
            ticks,
        }
    }

    /// True when reads never wait.
    pub fn is_immediate(&self) -> bool {
        self.min_bytes == 0 && self.ticks == 0
    }

    /// The wait bound this encoding actually gives.
    pub fn as_duration(&self) -> Duration {
        TICK * u32::from(self.ticks)
    }
}

impl From<Duration> for ReadTimeout {
    fn from(timeout: Duration) -> Self {
        Self::from_duration(timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero_is_immediate() {
        let t = ReadTimeout::from_duration(Duration::ZERO);
        assert_eq!(t, ReadTimeout { min_bytes: 0, ticks: 0 });
        assert!(t.is_immediate());
    }

    #[test]
    fn test_one_tick() {
        let t = ReadTimeout::from_duration(TICK);
        assert_eq!(t, ReadTimeout { min_bytes: 0, ticks: 1 });
        assert_eq!(t.as_duration(), TICK);
    }

    #[test]
    fn test_sub_tick_rounds_up_to_one() {
        let t = ReadTimeout::from_duration(Duration::from_millis(1));
        assert_eq!(t.ticks, 1);
        assert!(!t.is_immediate());
    }

    #[test]
    fn test_truncates_to_whole_ticks() {
        assert_eq!(ReadTimeout::from_duration(Duration::from_millis(1_250)).ticks, 12);
        assert_eq!(ReadTimeout::from_duration(Duration::from_secs(2)).ticks, 20);
    }

    #[test]
    fn test_clamps_at_maximum() {
        assert_eq!(ReadTimeout::from_duration(Duration::from_millis(25_500)).ticks, 255);
        assert_eq!(ReadTimeout::from_duration(Duration::from_secs(60)).ticks, 255);
        assert_eq!(ReadTimeout::from_duration(Duration::MAX).ticks, 255);
    }

    proptest! {
        #[test]
        fn translation_never_wraps(millis in 1u64..u64::MAX / 2) {
            let t = ReadTimeout::from_duration(Duration::from_millis(millis));
            prop_assert_eq!(t.min_bytes, 0);
            prop_assert!(t.ticks >= 1);
            let expected = (millis / 100).clamp(1, 255) as u8;
            prop_assert_eq!(t.ticks, expected);
        }
    }
}

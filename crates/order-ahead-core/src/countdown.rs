//! Remaining-time value shown next to each order.

use std::fmt;

const MILLIS_PER_SECOND: i64 = 1_000;
const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;

/// Minutes and seconds left before an order's arrival.
///
/// Minutes are counted within the current hour window and seconds within
/// the current minute window, so a 75 minute wait shows as `15:00`.
/// Seconds are only zero-padded when rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Countdown {
    pub minutes: u32,
    pub seconds: u32,
}

impl Countdown {
    pub fn new(minutes: u32, seconds: u32) -> Self {
        Countdown { minutes, seconds }
    }

    /// Split a positive remaining duration (milliseconds) into a countdown.
    ///
    /// Returns `None` once there is no time left.
    pub fn from_millis(time_left: i64) -> Option<Self> {
        if time_left <= 0 {
            return None;
        }

        let minutes = (time_left % MILLIS_PER_HOUR) / MILLIS_PER_MINUTE;
        let seconds = (time_left % MILLIS_PER_MINUTE) / MILLIS_PER_SECOND;

        Some(Countdown {
            minutes: minutes as u32,
            seconds: seconds as u32,
        })
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.minutes, self.seconds)
    }
}

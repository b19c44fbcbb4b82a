//! Clock implementations.

use crate::infrastructure::ports::ClockPort;
use chrono::{DateTime, Utc};

/// System clock - uses real time.
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed clock for testing.
#[cfg(test)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(test)]
impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockClockPort;
    use chrono::TimeZone;

    #[test]
    fn fixed_clock_returns_its_instant() {
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        assert_eq!(FixedClock(at).now(), at);
    }

    #[test]
    fn mock_clock_is_queried() {
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let mut clock = MockClockPort::new();
        clock.expect_now().times(1).return_const(at);
        assert_eq!(clock.now(), at);
    }
}

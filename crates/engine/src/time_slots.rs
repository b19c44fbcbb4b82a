//! Time-of-day slot list for the time picker.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use pickerkit_domain::{DisplayFormat, DomainError, TimeSlot};

use crate::error::EngineError;

pub struct TimeSlotBuilder {
    format: DisplayFormat,
}

impl TimeSlotBuilder {
    pub fn new(format: DisplayFormat) -> Self {
        Self { format }
    }

    /// One slot every `interval_minutes` within each hour, for all 24 hours.
    ///
    /// The step restarts at :00 each hour: an interval of 40 gives :00 and
    /// :40. Display strings are rendered against 1990-01-01 UTC.
    pub fn build(&self, interval_minutes: u32) -> Result<Vec<TimeSlot>, EngineError> {
        if interval_minutes == 0 || interval_minutes > 60 {
            return Err(DomainError::validation(format!(
                "slot interval must be between 1 and 60 minutes, got {}",
                interval_minutes
            ))
            .into());
        }

        let neutral_date = NaiveDate::from_ymd_opt(1990, 1, 1)
            .ok_or_else(|| DomainError::out_of_range("year", 1990))?;
        let per_hour = 60_u32.div_ceil(interval_minutes) as usize;
        let mut slots = Vec::with_capacity(24 * per_hour);

        for hour in 0..24 {
            for minute in (0..60).step_by(interval_minutes as usize) {
                let time = NaiveTime::from_hms_opt(hour, minute, 0)
                    .ok_or_else(|| DomainError::out_of_range("minute", minute))?;
                let at = NaiveDateTime::new(neutral_date, time).and_utc().fixed_offset();
                slots.push(TimeSlot {
                    hour,
                    minute,
                    display: self.format.render(&at),
                });
            }
        }

        Ok(slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> TimeSlotBuilder {
        TimeSlotBuilder::new(DisplayFormat::new("h:mm a").unwrap())
    }

    #[test]
    fn half_hour_interval() {
        let slots = builder().build(30).unwrap();
        assert_eq!(slots.len(), 48);
        assert_eq!(slots[0].display, "12:00 am");
        assert_eq!(slots[1].display, "12:30 am");
        assert_eq!(slots[47].display, "11:30 pm");
        assert_eq!((slots[47].hour, slots[47].minute), (23, 30));
    }

    #[test]
    fn hourly_by_default_interval() {
        let slots = builder().build(60).unwrap();
        assert_eq!(slots.len(), 24);
        assert_eq!(slots[12].display, "12:00 pm");
    }

    #[test]
    fn step_restarts_each_hour() {
        let slots = builder().build(40).unwrap();
        assert_eq!(slots.len(), 48);
        let minutes: Vec<u32> = slots.iter().take(4).map(|s| s.minute).collect();
        assert_eq!(minutes, vec![0, 40, 0, 40]);
        assert_eq!(slots[3].hour, 1);
    }

    #[test]
    fn every_minute() {
        let slots = builder().build(1).unwrap();
        assert_eq!(slots.len(), 24 * 60);
        assert_eq!(slots.last().map(|s| s.display.as_str()), Some("11:59 pm"));
    }

    #[test]
    fn uses_configured_format() {
        let slots = TimeSlotBuilder::new(DisplayFormat::new("HH:mm").unwrap())
            .build(15)
            .unwrap();
        assert_eq!(slots[0].display, "00:00");
        assert_eq!(slots[95].display, "23:45");
    }

    #[test]
    fn rejects_out_of_contract_intervals() {
        assert!(builder().build(0).is_err());
        assert!(builder().build(61).is_err());
    }
}

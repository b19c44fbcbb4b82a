//! Month grid construction.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};

use pickerkit_domain::{
    Bounds, CalendarCell, DisplayFormat, DomainError, MonthGrid, MonthRef, TemporalValue, TimeUnit,
    Zone,
};

use crate::error::EngineError;

const MONTH_LABEL_FORMAT: &str = "MMMM";

pub struct CalendarGridBuilder {
    week_start: Weekday,
    month_label: DisplayFormat,
}

impl CalendarGridBuilder {
    pub fn new(week_start: Weekday) -> Result<Self, EngineError> {
        Ok(Self {
            week_start,
            month_label: DisplayFormat::new(MONTH_LABEL_FORMAT)?,
        })
    }

    pub fn week_start(&self) -> Weekday {
        self.week_start
    }

    /// Short weekday names for the header row, starting at the week start.
    pub fn day_names(&self) -> Vec<String> {
        std::iter::successors(Some(self.week_start), |day| Some(day.succ()))
            .take(7)
            .map(|day| day.to_string())
            .collect()
    }

    /// Blank cells needed before a month whose first day is `first`.
    pub fn filler_count(&self, first: Weekday) -> u32 {
        (first.num_days_from_monday() + 7 - self.week_start.num_days_from_monday()) % 7
    }

    /// Lay out `(year, month)` with `month` 0-based.
    ///
    /// Each day spans midnight to its last instant in `zone`, and is enabled
    /// when any instant of that span satisfies both bounds, whatever zone the
    /// bounds carry. The selected value is read on `zone`'s wall clock too.
    /// `today` is the caller's cached snapshot; every cell is compared
    /// against the same date.
    ///
    /// # Errors
    ///
    /// `DomainError::OutOfRange` for a month outside `0..=11` or an
    /// unrepresentable year. No partial grid is returned.
    pub fn build(
        &self,
        year: i32,
        month: u32,
        zone: Zone,
        bounds: &Bounds,
        selected: Option<&TemporalValue>,
        today: NaiveDate,
    ) -> Result<MonthGrid, EngineError> {
        let month_ref = MonthRef::new(year, month)?;
        let first = month_ref.first_day()?;
        let days = month_ref.days_in_month()?;
        let selected = selected.filter(|s| s.is_valid());

        let mut cells = Vec::with_capacity(days as usize);
        for number in 1..=days {
            let date = first
                .with_day(number)
                .ok_or_else(|| DomainError::out_of_range("day", number))?;
            let day_start = TemporalValue::from_naive(date.and_time(NaiveTime::MIN), zone);
            let day_end = day_start.end_of(TimeUnit::Day);

            cells.push(CalendarCell {
                number,
                disabled: !bounds.admits_span(&day_start, &day_end),
                is_today: date == today,
                is_selected: selected.map_or(false, |s| day_start.is_same_day(s)),
            });
        }

        let filler_count = self.filler_count(first.weekday());
        let month_label = self
            .month_label
            .render(&first.and_time(NaiveTime::MIN).and_utc().fixed_offset());
        let prev = month_ref.prev();
        let next = month_ref.next();

        tracing::debug!(year, month, zone = %zone, filler_count, "Built month grid");

        Ok(MonthGrid {
            year,
            month,
            month_label,
            filler_count,
            cells,
            prev_year: prev.year,
            prev_month: prev.month,
            next_year: next.year,
            next_month: next.month,
        })
    }
}

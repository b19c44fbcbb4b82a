//! Calendar grid and time slot value objects
//!
//! These are the render-ready shapes handed to the host: a month of day
//! cells with their leading fillers, and a day's worth of selectable time
//! slots. They are rebuilt wholesale, never edited in place.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

// ============================================================================
// MonthRef
// ============================================================================

/// A calendar month addressed by year and 0-based month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonthRef {
    pub year: i32,
    /// 0-based (January = 0)
    pub month: u32,
}

impl MonthRef {
    /// Create a validated month reference.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::OutOfRange` if `month` is not in `0..=11` or the
    /// year is outside the representable calendar.
    pub fn new(year: i32, month: u32) -> Result<Self, DomainError> {
        if month > 11 {
            return Err(DomainError::out_of_range("month", month));
        }
        if NaiveDate::from_ymd_opt(year, month + 1, 1).is_none() {
            return Err(DomainError::out_of_range("year", year));
        }
        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month0(),
        }
    }

    /// The first day of this month.
    pub fn first_day(&self) -> Result<NaiveDate, DomainError> {
        NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
            .ok_or_else(|| DomainError::out_of_range("year", self.year))
    }

    /// Number of days in this month.
    pub fn days_in_month(&self) -> Result<u32, DomainError> {
        let first = self.first_day()?;
        crate::temporal::last_day_of_month(first)
            .map(|last| last.day())
            .ok_or_else(|| DomainError::out_of_range("year", self.year))
    }

    /// The month before, wrapping January into the previous December.
    pub fn prev(&self) -> Self {
        if self.month == 0 {
            Self {
                year: self.year - 1,
                month: 11,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// The month after, wrapping December into the next January.
    pub fn next(&self) -> Self {
        if self.month == 11 {
            Self {
                year: self.year + 1,
                month: 0,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

// ============================================================================
// CalendarCell / MonthGrid
// ============================================================================

/// One selectable day in a month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarCell {
    /// Day of month, 1-based
    pub number: u32,
    pub disabled: bool,
    pub is_today: bool,
    pub is_selected: bool,
}

/// A month laid out for a seven-column week grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthGrid {
    pub year: i32,
    /// 0-based (January = 0)
    pub month: u32,
    /// Long month name, e.g. "January"
    pub month_label: String,
    /// Blank cells before day 1 (0..=6)
    pub filler_count: u32,
    pub cells: Vec<CalendarCell>,
    pub prev_year: i32,
    pub prev_month: u32,
    pub next_year: i32,
    pub next_month: u32,
}

impl MonthGrid {
    /// Look up the cell for a day of this month.
    pub fn cell(&self, day: u32) -> Option<&CalendarCell> {
        self.cells.iter().find(|c| c.number == day)
    }

    pub fn prev(&self) -> MonthRef {
        MonthRef {
            year: self.prev_year,
            month: self.prev_month,
        }
    }

    pub fn next(&self) -> MonthRef {
        MonthRef {
            year: self.next_year,
            month: self.next_month,
        }
    }
}

// ============================================================================
// TimeSlot
// ============================================================================

/// A selectable time of day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    pub hour: u32,
    pub minute: u32,
    /// Time of day rendered with the configured format
    pub display: String,
}

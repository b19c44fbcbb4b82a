//! Temporal values: a point in time carried together with its zone.
//!
//! Every operation returns a new value. A value is either resolved to a real
//! instant or explicitly invalid; invalid values never take part in
//! comparisons (see [`crate::bounds`]).

use std::cmp::Ordering;
use std::fmt;

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc,
};

use crate::error::DomainError;
use crate::format::DisplayFormat;
use crate::zone::Zone;

// =============================================================================
// Field scopes and units
// =============================================================================

/// Which fields a widget owns when merging one value into another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldScope {
    /// Year, month and day.
    Date,
    /// Hour, minute and second.
    Time,
    /// Both of the above.
    DateTime,
}

impl FieldScope {
    pub fn includes_date(&self) -> bool {
        matches!(self, FieldScope::Date | FieldScope::DateTime)
    }

    pub fn includes_time(&self) -> bool {
        matches!(self, FieldScope::Time | FieldScope::DateTime)
    }
}

/// Truncation granularity for [`TemporalValue::start_of`] and [`TemporalValue::end_of`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
    Month,
}

// =============================================================================
// Temporal Value
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Resolved {
    at: DateTime<FixedOffset>,
    zone: Zone,
}

/// A timezone-aware point in time, or an explicitly invalid marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemporalValue {
    inner: Option<Resolved>,
}

impl TemporalValue {
    /// A value that failed to resolve.
    pub fn invalid() -> Self {
        Self { inner: None }
    }

    /// Attach `zone` to a wall-clock reading.
    pub fn from_naive(naive: NaiveDateTime, zone: Zone) -> Self {
        Self {
            inner: zone.from_local(&naive).map(|at| Resolved { at, zone }),
        }
    }

    /// Build from calendar fields. `month0` is 0-based (January = 0).
    ///
    /// Any component that does not name a real date or time yields an
    /// invalid value rather than an error.
    pub fn from_parts(
        year: i32,
        month0: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        zone: Zone,
    ) -> Self {
        month0
            .checked_add(1)
            .and_then(|month| NaiveDate::from_ymd_opt(year, month, day))
            .and_then(|date| date.and_hms_opt(hour, minute, second))
            .map(|naive| Self::from_naive(naive, zone))
            .unwrap_or_else(Self::invalid)
    }

    /// The wall-clock reading of `instant` in `zone`.
    pub fn from_instant(instant: DateTime<Utc>, zone: Zone) -> Self {
        Self {
            inner: Some(Resolved {
                at: zone.from_utc(&instant),
                zone,
            }),
        }
    }

    /// Parse a machine-readable timestamp supplied by a host.
    ///
    /// Accepts RFC 3339 (`2024-01-10T08:00:00-05:00`, zone becomes the fixed
    /// offset), naive `YYYY-MM-DDTHH:MM:SS` and plain `YYYY-MM-DD` (both read
    /// as wall-clock time in `zone`).
    pub fn parse_iso(input: &str, zone: Zone) -> Result<Self, DomainError> {
        let trimmed = input.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            let zone = Zone::Fixed(*dt.offset());
            return Ok(Self {
                inner: Some(Resolved { at: dt, zone }),
            });
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
            return Self::from_naive(naive, zone).validated(trimmed);
        }
        let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map_err(|_| DomainError::parse(format!("not an ISO timestamp: '{}'", trimmed)))?;
        Self::from_naive(date.and_time(NaiveTime::MIN), zone).validated(trimmed)
    }

    fn validated(self, input: &str) -> Result<Self, DomainError> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(DomainError::parse(format!("unrepresentable timestamp: '{}'", input)))
        }
    }

    // Accessors

    pub fn is_valid(&self) -> bool {
        self.inner.is_some()
    }

    /// The zone this value is expressed in.
    pub fn zone(&self) -> Option<Zone> {
        self.inner.map(|r| r.zone)
    }

    pub fn offset_datetime(&self) -> Option<DateTime<FixedOffset>> {
        self.inner.map(|r| r.at)
    }

    pub fn instant(&self) -> Option<DateTime<Utc>> {
        self.inner.map(|r| r.at.with_timezone(&Utc))
    }

    /// Wall-clock reading in the value's own zone.
    pub fn naive_local(&self) -> Option<NaiveDateTime> {
        self.inner.map(|r| r.at.naive_local())
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.naive_local().map(|n| n.date())
    }

    pub fn time(&self) -> Option<NaiveTime> {
        self.naive_local().map(|n| n.time())
    }

    pub fn year(&self) -> Option<i32> {
        self.date().map(|d| d.year())
    }

    /// 0-based month (January = 0).
    pub fn month0(&self) -> Option<u32> {
        self.date().map(|d| d.month0())
    }

    pub fn day(&self) -> Option<u32> {
        self.date().map(|d| d.day())
    }

    pub fn hour(&self) -> Option<u32> {
        self.time().map(|t| t.hour())
    }

    pub fn minute(&self) -> Option<u32> {
        self.time().map(|t| t.minute())
    }

    pub fn second(&self) -> Option<u32> {
        self.time().map(|t| t.second())
    }

    // Field-wise construction

    /// Replace the calendar date, keeping time of day and zone.
    pub fn with_date(&self, date: NaiveDate) -> Self {
        self.with_fields(Some(date), None)
    }

    /// Replace the time of day, keeping date and zone.
    pub fn with_time(&self, time: NaiveTime) -> Self {
        self.with_fields(None, Some(time))
    }

    /// Replace whichever of date and time are given.
    pub fn with_fields(&self, date: Option<NaiveDate>, time: Option<NaiveTime>) -> Self {
        match self.inner {
            Some(r) => {
                let current = r.at.naive_local();
                let naive = NaiveDateTime::new(
                    date.unwrap_or_else(|| current.date()),
                    time.unwrap_or_else(|| current.time()),
                );
                Self::from_naive(naive, r.zone)
            }
            None => *self,
        }
    }

    /// Copy the fields in `scope` from `source` onto this value.
    ///
    /// Fields are read off `source`'s wall clock and written onto this
    /// value's wall clock; this value keeps its zone. Sub-second precision of
    /// `source` is dropped. If either side is invalid, this value is returned
    /// unchanged.
    pub fn merge(&self, source: &TemporalValue, scope: FieldScope) -> Self {
        let Some(src) = source.naive_local() else {
            return *self;
        };
        let date = scope.includes_date().then(|| src.date());
        let time = scope
            .includes_time()
            .then(|| src.time().with_nanosecond(0).unwrap_or(src.time()));
        self.with_fields(date, time)
    }

    // Truncation

    /// Truncate down to the start of `unit`.
    pub fn start_of(&self, unit: TimeUnit) -> Self {
        let Some(naive) = self.naive_local() else {
            return *self;
        };
        let date = naive.date();
        let time = naive.time();
        let truncated = match unit {
            TimeUnit::Second => NaiveTime::from_hms_opt(time.hour(), time.minute(), time.second()),
            TimeUnit::Minute => NaiveTime::from_hms_opt(time.hour(), time.minute(), 0),
            TimeUnit::Hour => NaiveTime::from_hms_opt(time.hour(), 0, 0),
            TimeUnit::Day => Some(NaiveTime::MIN),
            TimeUnit::Month => {
                return date
                    .with_day(1)
                    .map(|first| self.with_fields(Some(first), Some(NaiveTime::MIN)))
                    .unwrap_or(*self);
            }
        };
        match truncated {
            Some(t) => self.with_time(t),
            None => *self,
        }
    }

    /// Advance to the last representable instant of `unit`.
    pub fn end_of(&self, unit: TimeUnit) -> Self {
        const LAST_NANO: u32 = 999_999_999;
        let Some(naive) = self.naive_local() else {
            return *self;
        };
        let time = naive.time();
        let last = match unit {
            TimeUnit::Second => {
                NaiveTime::from_hms_nano_opt(time.hour(), time.minute(), time.second(), LAST_NANO)
            }
            TimeUnit::Minute => NaiveTime::from_hms_nano_opt(time.hour(), time.minute(), 59, LAST_NANO),
            TimeUnit::Hour => NaiveTime::from_hms_nano_opt(time.hour(), 59, 59, LAST_NANO),
            TimeUnit::Day => NaiveTime::from_hms_nano_opt(23, 59, 59, LAST_NANO),
            TimeUnit::Month => {
                let last_day = last_day_of_month(naive.date());
                return match (last_day, NaiveTime::from_hms_nano_opt(23, 59, 59, LAST_NANO)) {
                    (Some(d), Some(t)) => self.with_fields(Some(d), Some(t)),
                    _ => *self,
                };
            }
        };
        match last {
            Some(t) => self.with_time(t),
            None => *self,
        }
    }

    // Zone changes

    /// Keep the wall-clock reading and attach a different zone.
    ///
    /// The instant moves; `09:00 UTC` becomes `09:00 America/New_York`.
    pub fn reinterpret_in(&self, zone: Zone) -> Self {
        match self.naive_local() {
            Some(naive) => Self::from_naive(naive, zone),
            None => *self,
        }
    }

    /// Keep the instant and read it off a different zone's wall clock.
    pub fn convert_to(&self, zone: Zone) -> Self {
        match self.instant() {
            Some(instant) => Self::from_instant(instant, zone),
            None => *self,
        }
    }

    // Comparison

    /// Compare instants, ignoring anything below whole seconds.
    ///
    /// Returns `None` if either side is invalid.
    pub fn cmp_seconds(&self, other: &TemporalValue) -> Option<Ordering> {
        let a = self.inner?.at.timestamp();
        let b = other.inner?.at.timestamp();
        Some(a.cmp(&b))
    }

    /// Whether `other` falls on the same calendar day as this value, judged
    /// on this value's wall clock.
    pub fn is_same_day(&self, other: &TemporalValue) -> bool {
        match (self.zone(), self.date()) {
            (Some(zone), Some(date)) => other.convert_to(zone).date() == Some(date),
            _ => false,
        }
    }

    // Rendering

    /// Render with `format`, or an empty string for an invalid value.
    pub fn format(&self, format: &DisplayFormat) -> String {
        self.inner
            .map(|r| format.render(&r.at))
            .unwrap_or_default()
    }
}

impl fmt::Display for TemporalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner {
            Some(r) => write!(f, "{} [{}]", r.at.to_rfc3339(), r.zone),
            None => write!(f, "Invalid date"),
        }
    }
}

/// Last calendar day of the month containing `date`.
pub(crate) fn last_day_of_month(date: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).and_then(|first| first.pred_opt())
}

//! Timezone attachment for temporal values.
//!
//! A [`Zone`] answers two questions: which offset applies to a wall-clock
//! reading, and what wall-clock reading an instant has. Named IANA zones are
//! only available with the `tz` feature; without it the process's local zone
//! and fixed offsets still work.

use std::fmt;

use chrono::{DateTime, Duration, FixedOffset, Local, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};
#[cfg(feature = "tz")]
use chrono_tz::Tz;

use crate::error::DomainError;

/// Timezone a temporal value is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    /// Whatever the host process considers local time.
    Local,
    /// A constant offset from UTC (`UTC`, `+05:30`, ...).
    Fixed(FixedOffset),
    /// An IANA zone with DST rules.
    #[cfg(feature = "tz")]
    Named(Tz),
}

impl Zone {
    /// The UTC zone as a fixed zero offset.
    pub fn utc() -> Self {
        Zone::Fixed(Utc.fix())
    }

    /// Whether IANA zone names can be resolved in this build.
    pub const fn named_zones_supported() -> bool {
        cfg!(feature = "tz")
    }

    /// Parse a timezone identifier.
    ///
    /// Accepts `local`, `UTC`/`Z`, numeric offsets (`+05:30`, `-0800`, `+05`)
    /// and, with the `tz` feature, IANA names such as `America/New_York`.
    ///
    /// # Errors
    ///
    /// - `DomainError::UnknownTimezone` if the identifier names no zone
    /// - `DomainError::TimezoneUnsupported` if it looks like an IANA name but
    ///   the timezone database is not compiled in
    pub fn parse(id: &str) -> Result<Self, DomainError> {
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(DomainError::unknown_timezone(id));
        }
        if trimmed.eq_ignore_ascii_case("local") {
            return Ok(Zone::Local);
        }
        if trimmed.eq_ignore_ascii_case("utc") || trimmed == "Z" {
            return Ok(Self::utc());
        }
        if let Some(offset) = parse_offset(trimmed) {
            return Ok(Zone::Fixed(offset));
        }
        Self::parse_named(trimmed)
    }

    #[cfg(feature = "tz")]
    fn parse_named(id: &str) -> Result<Self, DomainError> {
        id.parse::<Tz>()
            .map(Zone::Named)
            .map_err(|_| DomainError::unknown_timezone(id))
    }

    #[cfg(not(feature = "tz"))]
    fn parse_named(id: &str) -> Result<Self, DomainError> {
        let looks_named = id.contains('/')
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '-' | '+'));
        if looks_named {
            Err(DomainError::timezone_unsupported(id))
        } else {
            Err(DomainError::unknown_timezone(id))
        }
    }

    /// Identifier of this zone, or `None` for local time.
    pub fn identifier(&self) -> Option<String> {
        match self {
            Zone::Local => None,
            Zone::Fixed(offset) if offset.local_minus_utc() == 0 => Some("UTC".to_string()),
            Zone::Fixed(offset) => Some(offset.to_string()),
            #[cfg(feature = "tz")]
            Zone::Named(tz) => Some(tz.name().to_string()),
        }
    }

    /// Attach this zone to a wall-clock reading.
    ///
    /// Ambiguous readings (DST fall-back) take the earliest instant. Readings
    /// inside a DST gap move forward by the gap length. Returns `None` only
    /// when the reading is outside chrono's representable range.
    pub fn from_local(&self, naive: &NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        match self {
            Zone::Local => resolve_local(&Local, naive),
            Zone::Fixed(offset) => resolve_local(offset, naive),
            #[cfg(feature = "tz")]
            Zone::Named(tz) => resolve_local(tz, naive),
        }
    }

    /// The wall-clock reading of `instant` in this zone.
    pub fn from_utc(&self, instant: &DateTime<Utc>) -> DateTime<FixedOffset> {
        match self {
            Zone::Local => instant.with_timezone(&Local).fixed_offset(),
            Zone::Fixed(offset) => instant.with_timezone(offset),
            #[cfg(feature = "tz")]
            Zone::Named(tz) => instant.with_timezone(tz).fixed_offset(),
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.identifier() {
            Some(id) => write!(f, "{}", id),
            None => write!(f, "local"),
        }
    }
}

fn resolve_local<T: TimeZone>(tz: &T, naive: &NaiveDateTime) -> Option<DateTime<FixedOffset>> {
    match tz.from_local_datetime(naive) {
        LocalResult::Single(dt) => Some(dt.fixed_offset()),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.fixed_offset()),
        LocalResult::None => {
            // DST gap: move forward by the offset jump across it
            let before = tz
                .offset_from_utc_datetime(&naive.checked_sub_signed(Duration::days(1))?)
                .fix();
            let after = tz
                .offset_from_utc_datetime(&naive.checked_add_signed(Duration::days(1))?)
                .fix();
            let gap = after.local_minus_utc() - before.local_minus_utc();
            let shifted = naive.checked_add_signed(Duration::seconds(i64::from(gap.max(0))))?;
            tz.from_local_datetime(&shifted)
                .earliest()
                .map(|dt| dt.fixed_offset())
        }
    }
}

/// Parse `+HH:MM`, `+HHMM` or `+HH` (and the `-` forms).
fn parse_offset(s: &str) -> Option<FixedOffset> {
    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if !(digits.len() == 2 || digits.len() == 4) || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = if digits.len() == 4 {
        digits[2..].parse().ok()?
    } else {
        0
    };
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn naive(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn parses_fixed_offsets() {
        assert_eq!(Zone::parse("UTC").unwrap(), Zone::utc());
        assert_eq!(Zone::parse("Z").unwrap(), Zone::utc());
        let plus = Zone::parse("+05:30").unwrap();
        assert_eq!(plus, Zone::Fixed(FixedOffset::east_opt(19_800).unwrap()));
        let minus = Zone::parse("-0800").unwrap();
        assert_eq!(minus, Zone::Fixed(FixedOffset::west_opt(28_800).unwrap()));
        assert_eq!(Zone::parse("local").unwrap(), Zone::Local);
    }

    #[test]
    fn rejects_garbage() {
        assert!(Zone::parse("").is_err());
        assert!(Zone::parse("+25:00").is_err());
        assert!(Zone::parse("not a zone").is_err());
    }

    #[test]
    fn fixed_zone_identifier() {
        assert_eq!(Zone::utc().identifier().as_deref(), Some("UTC"));
        assert_eq!(Zone::Local.identifier(), None);
        assert_eq!(Zone::Local.to_string(), "local");
    }

    #[test]
    fn fixed_zone_resolves_wall_clock() {
        let zone = Zone::parse("+02:00").unwrap();
        let dt = zone.from_local(&naive(2024, 3, 1, 10, 0)).unwrap();
        assert_eq!(dt.naive_local(), naive(2024, 3, 1, 10, 0));
        assert_eq!(dt.naive_utc(), naive(2024, 3, 1, 8, 0));
    }

    #[cfg(feature = "tz")]
    #[test]
    fn named_zone_round_trip() {
        let zone = Zone::parse("America/New_York").unwrap();
        assert_eq!(zone.identifier().as_deref(), Some("America/New_York"));
        let dt = zone.from_local(&naive(2024, 1, 15, 9, 0)).unwrap();
        assert_eq!(dt.offset().local_minus_utc(), -5 * 3600);
    }

    #[cfg(feature = "tz")]
    #[test]
    fn dst_gap_moves_forward() {
        let zone = Zone::parse("America/New_York").unwrap();
        // 2024-03-10 02:30 does not exist in New York
        let dt = zone.from_local(&naive(2024, 3, 10, 2, 30)).unwrap();
        assert_eq!(dt.naive_local(), naive(2024, 3, 10, 3, 30));
    }

    #[cfg(feature = "tz")]
    #[test]
    fn half_hour_dst_gap_moves_by_half_an_hour() {
        // Lord Howe springs from +10:30 to +11:00 at 02:00 on 2024-10-06
        let zone = Zone::parse("Australia/Lord_Howe").unwrap();
        let dt = zone.from_local(&naive(2024, 10, 6, 2, 10)).unwrap();
        assert_eq!(dt.naive_local(), naive(2024, 10, 6, 2, 40));
        assert_eq!(dt.offset().local_minus_utc(), 11 * 3600);
    }

    #[cfg(feature = "tz")]
    #[test]
    fn dst_overlap_takes_earliest() {
        let zone = Zone::parse("America/New_York").unwrap();
        let dt = zone.from_local(&naive(2024, 11, 3, 1, 30)).unwrap();
        assert_eq!(dt.offset().local_minus_utc(), -4 * 3600);
    }

    #[cfg(not(feature = "tz"))]
    #[test]
    fn named_zone_without_database_is_unsupported() {
        assert!(matches!(
            Zone::parse("America/New_York"),
            Err(DomainError::TimezoneUnsupported(_))
        ));
    }
}

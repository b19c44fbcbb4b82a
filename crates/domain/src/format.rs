//! Display formats written with moment-style tokens.
//!
//! A pattern such as `M/D/YYYY` or `h:mm a` is compiled once into chrono
//! format items. The same items drive rendering and strict parsing, so a
//! string produced by [`DisplayFormat::render`] always parses back.
//!
//! Supported tokens:
//!
//! | Token | Meaning |
//! |-------|---------|
//! | `YYYY`, `YY` | year, two-digit year |
//! | `M`, `MM`, `MMM`, `MMMM` | month number, padded, short name, long name |
//! | `D`, `DD` | day of month, padded |
//! | `ddd`, `dddd` | short / long weekday name |
//! | `H`, `HH`, `h`, `hh` | 24-hour and 12-hour clock hours |
//! | `m`, `mm`, `s`, `ss` | minutes, seconds |
//! | `a`, `A` | `am`/`pm`, `AM`/`PM` |
//! | `Z` | UTC offset as `+05:00` |
//!
//! Text inside `[...]` is literal, whitespace matches any whitespace and any
//! other character is a literal.

use std::fmt;
use std::str::FromStr;

use chrono::format::{self, Fixed, Item, Numeric, Pad, Parsed};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};

use crate::error::DomainError;

/// Default pattern for the date picker.
pub const DEFAULT_DATE_FORMAT: &str = "M/D/YYYY";
/// Default pattern for the time picker.
pub const DEFAULT_TIME_FORMAT: &str = "h:mm a";

const TOKEN_CHARS: [char; 11] = ['Y', 'M', 'D', 'd', 'H', 'h', 'm', 's', 'a', 'A', 'Z'];

/// Which calendar/clock fields a pattern carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Encoded {
    year: bool,
    month: bool,
    day: bool,
    hour: bool,
    hour12: bool,
    meridiem: bool,
    minute: bool,
    second: bool,
    offset: bool,
    weekday: bool,
}

impl Encoded {
    fn date(&self) -> bool {
        self.year || self.month || self.day
    }

    fn time(&self) -> bool {
        self.hour || self.minute || self.second
    }

    fn any(&self) -> bool {
        self.date() || self.time() || self.offset || self.weekday || self.meridiem
    }
}

/// Fields recovered from a string by [`DisplayFormat::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedFields {
    /// Present when the pattern encodes a date.
    pub date: Option<NaiveDate>,
    /// Present when the pattern encodes a time of day.
    pub time: Option<NaiveTime>,
    /// Present when the pattern encodes an offset (`Z`).
    pub offset: Option<FixedOffset>,
}

/// A compiled display pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFormat {
    pattern: String,
    items: Vec<Item<'static>>,
    encoded: Encoded,
}

impl DisplayFormat {
    /// Compile a pattern.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for unknown token runs (`YYY`,
    /// `MMMMM`, ...), an unterminated `[` escape, or a pattern containing no
    /// tokens at all.
    pub fn new(pattern: &str) -> Result<Self, DomainError> {
        let chars: Vec<char> = pattern.chars().collect();
        let mut items = Vec::new();
        let mut encoded = Encoded::default();
        let mut literal = String::new();
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];

            if c == '[' {
                let close = chars[i + 1..]
                    .iter()
                    .position(|&ch| ch == ']')
                    .ok_or_else(|| {
                        DomainError::validation(format!("unterminated '[' in format '{}'", pattern))
                    })?;
                literal.extend(&chars[i + 1..i + 1 + close]);
                i += close + 2;
                continue;
            }

            if c.is_whitespace() {
                flush_literal(&mut items, &mut literal);
                let run = chars[i..].iter().take_while(|ch| ch.is_whitespace()).count();
                let space: String = chars[i..i + run].iter().collect();
                items.push(Item::OwnedSpace(space.into_boxed_str()));
                i += run;
                continue;
            }

            if TOKEN_CHARS.contains(&c) {
                flush_literal(&mut items, &mut literal);
                let run = chars[i..].iter().take_while(|&&ch| ch == c).count();
                let item = token_item(c, run, &mut encoded).ok_or_else(|| {
                    DomainError::validation(format!(
                        "unsupported token '{}' in format '{}'",
                        c.to_string().repeat(run),
                        pattern
                    ))
                })?;
                items.push(item);
                i += run;
                continue;
            }

            literal.push(c);
            i += 1;
        }
        flush_literal(&mut items, &mut literal);

        if !encoded.any() {
            return Err(DomainError::validation(format!(
                "format '{}' contains no date or time tokens",
                pattern
            )));
        }

        Ok(Self {
            pattern: pattern.to_string(),
            items,
            encoded,
        })
    }

    /// The source pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether the pattern carries a full or partial calendar date.
    pub fn encodes_date(&self) -> bool {
        self.encoded.date()
    }

    /// Whether the pattern carries a time of day.
    pub fn encodes_time(&self) -> bool {
        self.encoded.time()
    }

    /// Render a resolved point in time.
    pub fn render(&self, at: &DateTime<FixedOffset>) -> String {
        at.format_with_items(self.items.iter()).to_string()
    }

    /// Strictly parse `input` against this pattern.
    ///
    /// The whole input must match; there is no lenient fallback. Numeric
    /// fields take exactly their token's digit count (`YYYY` four, `YY` two,
    /// the rest one or two) with no sign and no surrounding whitespace, so a
    /// half-typed `1/5/202` is rejected. A 12-hour pattern without `a`/`A`
    /// reads as morning, and an hour without minutes reads as the top of the
    /// hour.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Parse` when the input does not match or names a
    /// date that does not exist (`2/30/2020`).
    pub fn parse(&self, input: &str) -> Result<ParsedFields, DomainError> {
        let mut parsed = Parsed::new();
        let mut rest = input;
        for item in &self.items {
            rest = match item {
                Item::Numeric(numeric, _) => {
                    let (min, max) = digit_widths(numeric);
                    let run = rest.bytes().take_while(u8::is_ascii_digit).count();
                    if run < min {
                        return Err(self.mismatch(input));
                    }
                    let (digits, tail) = rest.split_at(run.min(max));
                    format::parse(&mut parsed, digits, std::iter::once(item))?;
                    tail
                }
                _ => format::parse_and_remainder(&mut parsed, rest, std::iter::once(item))?,
            };
        }
        if !rest.is_empty() {
            return Err(self.mismatch(input));
        }

        if self.encoded.hour12 && !self.encoded.meridiem {
            parsed.set_ampm(false)?;
        }
        if self.encoded.hour && !self.encoded.minute {
            parsed.set_minute(0)?;
        }

        let date = if self.encoded.date() {
            Some(parsed.to_naive_date()?)
        } else {
            None
        };
        let time = if self.encoded.time() {
            Some(parsed.to_naive_time()?)
        } else {
            None
        };
        let offset = if self.encoded.offset {
            Some(parsed.to_fixed_offset()?)
        } else {
            None
        };

        Ok(ParsedFields { date, time, offset })
    }
}

impl DisplayFormat {
    fn mismatch(&self, input: &str) -> DomainError {
        DomainError::parse(format!("'{}' does not match format '{}'", input, self.pattern))
    }
}

impl FromStr for DisplayFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for DisplayFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pattern)
    }
}

fn flush_literal(items: &mut Vec<Item<'static>>, literal: &mut String) {
    if !literal.is_empty() {
        items.push(Item::OwnedLiteral(std::mem::take(literal).into_boxed_str()));
    }
}

fn token_item(c: char, run: usize, encoded: &mut Encoded) -> Option<Item<'static>> {
    let item = match (c, run) {
        ('Y', 4) => {
            encoded.year = true;
            Item::Numeric(Numeric::Year, Pad::Zero)
        }
        ('Y', 2) => {
            encoded.year = true;
            Item::Numeric(Numeric::YearMod100, Pad::Zero)
        }
        ('M', 1 | 2) => {
            encoded.month = true;
            Item::Numeric(Numeric::Month, pad_for(run))
        }
        ('M', 3) => {
            encoded.month = true;
            Item::Fixed(Fixed::ShortMonthName)
        }
        ('M', 4) => {
            encoded.month = true;
            Item::Fixed(Fixed::LongMonthName)
        }
        ('D', 1 | 2) => {
            encoded.day = true;
            Item::Numeric(Numeric::Day, pad_for(run))
        }
        ('d', 3) => {
            encoded.weekday = true;
            Item::Fixed(Fixed::ShortWeekdayName)
        }
        ('d', 4) => {
            encoded.weekday = true;
            Item::Fixed(Fixed::LongWeekdayName)
        }
        ('H', 1 | 2) => {
            encoded.hour = true;
            Item::Numeric(Numeric::Hour, pad_for(run))
        }
        ('h', 1 | 2) => {
            encoded.hour = true;
            encoded.hour12 = true;
            Item::Numeric(Numeric::Hour12, pad_for(run))
        }
        ('m', 1 | 2) => {
            encoded.minute = true;
            Item::Numeric(Numeric::Minute, pad_for(run))
        }
        ('s', 1 | 2) => {
            encoded.second = true;
            Item::Numeric(Numeric::Second, pad_for(run))
        }
        ('a', 1) => {
            encoded.meridiem = true;
            Item::Fixed(Fixed::LowerAmPm)
        }
        ('A', 1) => {
            encoded.meridiem = true;
            Item::Fixed(Fixed::UpperAmPm)
        }
        ('Z', 1) => {
            encoded.offset = true;
            Item::Fixed(Fixed::TimezoneOffsetColon)
        }
        _ => return None,
    };
    Some(item)
}

/// Minimum and maximum digit count accepted for a numeric token.
fn digit_widths(numeric: &Numeric) -> (usize, usize) {
    match numeric {
        Numeric::Year => (4, 4),
        Numeric::YearMod100 => (2, 2),
        _ => (1, 2),
    }
}

fn pad_for(run: usize) -> Pad {
    if run >= 2 {
        Pad::Zero
    } else {
        Pad::None
    }
}

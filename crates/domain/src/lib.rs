//! pickerkit Domain - value types for the date/time picker engine.
//!
//! Pure types only: no clock access, no logging, no I/O. The engine crate
//! supplies "now" and decides when values are committed.

pub mod bounds;
pub mod calendar;
pub mod error;
pub mod format;
pub mod temporal;
pub mod validity;
pub mod zone;

pub use bounds::{validate_max, validate_min, Bounds, BoundsReport};
pub use calendar::{CalendarCell, MonthGrid, MonthRef, TimeSlot};
pub use error::DomainError;
pub use format::{DisplayFormat, ParsedFields, DEFAULT_DATE_FORMAT, DEFAULT_TIME_FORMAT};
pub use temporal::{FieldScope, TemporalValue, TimeUnit};
pub use validity::{Validity, ValidityFlag};
pub use zone::Zone;

#[cfg(feature = "tz")]
pub use chrono_tz::Tz;

//! pickerkit engine.
//!
//! Everything a date or time input widget needs apart from drawing:
//! string/value normalization, bound validation, month grids, time slot
//! lists, timezone resolution and deferred change notification.
//!
//! ## Structure
//!
//! - `picker/` - Date and time picker controllers
//! - `normalizer` - Format/parse passes around a private working copy
//! - `calendar_grid`, `time_slots` - Selectable cells and slots
//! - `timezone` - Zone resolution with a capability check
//! - `infrastructure/` - Clock port and its implementations
//! - `config` - `PICKER_*` environment configuration

pub mod calendar_grid;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod normalizer;
pub mod notifier;
pub mod picker;
pub mod time_slots;
pub mod timezone;

pub use calendar_grid::CalendarGridBuilder;
pub use config::PickerConfig;
pub use error::EngineError;
pub use infrastructure::{ClockPort, SystemClock};
pub use normalizer::{Commit, Normalizer, Rendered};
pub use notifier::{ChangeNotifier, ValueChanged};
pub use picker::{DatePicker, PickerKind, TimePicker};
pub use time_slots::TimeSlotBuilder;
pub use timezone::TimezoneResolver;

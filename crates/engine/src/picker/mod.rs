//! Date and time picker controllers.
//!
//! Each controller owns its working copy, bounds and timezone state and
//! exposes the operations a rendering layer needs: format the model, parse
//! typed input, list selectable cells/slots and commit a selection.

use std::fmt;

use serde::{Deserialize, Serialize};

use pickerkit_domain::{FieldScope, TimeUnit, ValidityFlag};

pub mod date;
pub mod time;

pub use date::DatePicker;
pub use time::TimePicker;

/// Which widget a normalizer or notification belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickerKind {
    Date,
    Time,
}

impl PickerKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            PickerKind::Date => "date",
            PickerKind::Time => "time",
        }
    }

    /// The parse flag this widget reports.
    pub fn validity_flag(&self) -> ValidityFlag {
        match self {
            PickerKind::Date => ValidityFlag::Date,
            PickerKind::Time => ValidityFlag::Time,
        }
    }

    /// Fields copied from an external model into the working copy.
    ///
    /// The time widget also takes the date so the day it renders against
    /// follows the model.
    pub fn model_scope(&self) -> FieldScope {
        match self {
            PickerKind::Date => FieldScope::Date,
            PickerKind::Time => FieldScope::DateTime,
        }
    }

    /// Granularity the initial working copy is truncated to.
    pub fn working_unit(&self) -> TimeUnit {
        match self {
            PickerKind::Date => TimeUnit::Day,
            PickerKind::Time => TimeUnit::Minute,
        }
    }
}

impl fmt::Display for PickerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

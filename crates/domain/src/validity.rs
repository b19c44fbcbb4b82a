//! Validity flags reported to the host form.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One independently settable validity condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidityFlag {
    /// The date input parses.
    Date,
    /// The value satisfies the lower bound.
    MinDate,
    /// The value satisfies the upper bound.
    MaxDate,
    /// The time input parses.
    Time,
}

impl ValidityFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidityFlag::Date => "date",
            ValidityFlag::MinDate => "minDate",
            ValidityFlag::MaxDate => "maxDate",
            ValidityFlag::Time => "time",
        }
    }

    pub fn all() -> [ValidityFlag; 4] {
        [
            ValidityFlag::Date,
            ValidityFlag::MinDate,
            ValidityFlag::MaxDate,
            ValidityFlag::Time,
        ]
    }
}

impl fmt::Display for ValidityFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// All validity flags. Every flag starts out valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validity {
    pub date: bool,
    pub min_date: bool,
    pub max_date: bool,
    pub time: bool,
}

impl Default for Validity {
    fn default() -> Self {
        Self {
            date: true,
            min_date: true,
            max_date: true,
            time: true,
        }
    }
}

impl Validity {
    pub fn get(&self, flag: ValidityFlag) -> bool {
        match flag {
            ValidityFlag::Date => self.date,
            ValidityFlag::MinDate => self.min_date,
            ValidityFlag::MaxDate => self.max_date,
            ValidityFlag::Time => self.time,
        }
    }

    pub fn set(&mut self, flag: ValidityFlag, valid: bool) {
        match flag {
            ValidityFlag::Date => self.date = valid,
            ValidityFlag::MinDate => self.min_date = valid,
            ValidityFlag::MaxDate => self.max_date = valid,
            ValidityFlag::Time => self.time = valid,
        }
    }

    /// Whether every flag is set.
    pub fn is_valid(&self) -> bool {
        ValidityFlag::all().iter().all(|f| self.get(*f))
    }

    /// Flags that are currently cleared, in declaration order.
    pub fn failing(&self) -> Vec<ValidityFlag> {
        ValidityFlag::all()
            .into_iter()
            .filter(|f| !self.get(*f))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_fully_valid() {
        let v = Validity::default();
        assert!(v.is_valid());
        assert!(v.failing().is_empty());
    }

    #[test]
    fn flags_are_independent() {
        let mut v = Validity::default();
        v.set(ValidityFlag::MaxDate, false);
        assert!(v.date);
        assert!(!v.max_date);
        assert_eq!(v.failing(), vec![ValidityFlag::MaxDate]);
        v.set(ValidityFlag::MaxDate, true);
        assert!(v.is_valid());
    }

    #[test]
    fn serializes_with_form_flag_names() {
        let mut v = Validity::default();
        v.set(ValidityFlag::MinDate, false);
        let json = serde_json::to_value(v).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "date": true, "minDate": false, "maxDate": true, "time": true })
        );
        assert_eq!(
            serde_json::to_string(&ValidityFlag::MaxDate).unwrap(),
            "\"maxDate\""
        );
    }
}

//! Picker configuration.
//!
//! All options have defaults matching the stock widgets: `M/D/YYYY` dates,
//! `h:mm a` times, hourly slots and ISO (Monday) week start. Hosts can build
//! a [`PickerConfig`] directly, deserialize one, or read it from the
//! environment:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `PICKER_DATE_FORMAT` | `date_format` |
//! | `PICKER_TIME_FORMAT` | `time_format` |
//! | `PICKER_INTERVAL_MINUTES` | `interval_minutes` |
//! | `PICKER_WEEK_START` | `week_start` (`mon`, `Sunday`, ...) |
//! | `PICKER_TIMEZONE` | `timezone` |
//! | `PICKER_WATCH_TIMEZONE` | `watch_timezone` (`true`/`false`/`1`/`0`) |

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use pickerkit_domain::{DisplayFormat, DEFAULT_DATE_FORMAT, DEFAULT_TIME_FORMAT};

use crate::error::EngineError;

/// Slots per hour are stepped by this many minutes unless configured.
pub const DEFAULT_INTERVAL_MINUTES: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PickerConfig {
    /// Display/parse pattern for the date picker
    pub date_format: String,
    /// Display/parse pattern for the time picker
    pub time_format: String,
    /// Minutes between time slots within an hour (1..=60)
    pub interval_minutes: u32,
    /// First column of the calendar grid
    pub week_start: Weekday,
    /// Explicit timezone; `None` uses the detected default
    pub timezone: Option<String>,
    /// Whether timezone changes after construction are honoured
    pub watch_timezone: bool,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            interval_minutes: DEFAULT_INTERVAL_MINUTES,
            week_start: Weekday::Mon,
            timezone: None,
            watch_timezone: false,
        }
    }
}

impl PickerConfig {
    /// Read configuration from `PICKER_*` environment variables.
    pub fn from_env() -> Result<Self, EngineError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, EngineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let date_format = lookup("PICKER_DATE_FORMAT").unwrap_or(defaults.date_format);
        let time_format = lookup("PICKER_TIME_FORMAT").unwrap_or(defaults.time_format);

        let interval_minutes = match lookup("PICKER_INTERVAL_MINUTES") {
            Some(raw) => raw.trim().parse::<u32>().map_err(|_| {
                EngineError::config(format!("PICKER_INTERVAL_MINUTES is not a number: '{}'", raw))
            })?,
            None => defaults.interval_minutes,
        };

        let week_start = match lookup("PICKER_WEEK_START") {
            Some(raw) => raw.trim().parse::<Weekday>().map_err(|_| {
                EngineError::config(format!("PICKER_WEEK_START is not a weekday: '{}'", raw))
            })?,
            None => defaults.week_start,
        };

        let timezone = lookup("PICKER_TIMEZONE")
            .map(|tz| tz.trim().to_string())
            .filter(|tz| !tz.is_empty());

        let watch_timezone = match lookup("PICKER_WATCH_TIMEZONE") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                EngineError::config(format!("PICKER_WATCH_TIMEZONE is not a boolean: '{}'", raw))
            })?,
            None => defaults.watch_timezone,
        };

        let config = Self {
            date_format,
            time_format,
            interval_minutes,
            week_start,
            timezone,
            watch_timezone,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check every option; formats must compile and the interval must be 1..=60.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.interval_minutes == 0 || self.interval_minutes > 60 {
            return Err(EngineError::config(format!(
                "interval_minutes must be between 1 and 60, got {}",
                self.interval_minutes
            )));
        }
        DisplayFormat::new(&self.date_format)?;
        DisplayFormat::new(&self.time_format)?;
        Ok(())
    }

    /// Whether any timezone handling was asked for.
    pub fn wants_timezone(&self) -> bool {
        self.watch_timezone || self.timezone.is_some()
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_stock_widgets() {
        let config = PickerConfig::default();
        assert_eq!(config.date_format, "M/D/YYYY");
        assert_eq!(config.time_format, "h:mm a");
        assert_eq!(config.interval_minutes, 60);
        assert_eq!(config.week_start, Weekday::Mon);
        assert!(config.timezone.is_none());
        assert!(!config.wants_timezone());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = PickerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, PickerConfig::default());
    }

    #[test]
    fn reads_every_variable() {
        let config = PickerConfig::from_lookup(lookup_from(&[
            ("PICKER_DATE_FORMAT", "YYYY-MM-DD"),
            ("PICKER_TIME_FORMAT", "HH:mm"),
            ("PICKER_INTERVAL_MINUTES", "15"),
            ("PICKER_WEEK_START", "sunday"),
            ("PICKER_TIMEZONE", "UTC"),
            ("PICKER_WATCH_TIMEZONE", "yes"),
        ]))
        .unwrap();
        assert_eq!(config.date_format, "YYYY-MM-DD");
        assert_eq!(config.time_format, "HH:mm");
        assert_eq!(config.interval_minutes, 15);
        assert_eq!(config.week_start, Weekday::Sun);
        assert_eq!(config.timezone.as_deref(), Some("UTC"));
        assert!(config.watch_timezone);
    }

    #[test]
    fn blank_timezone_is_absent() {
        let config = PickerConfig::from_lookup(lookup_from(&[("PICKER_TIMEZONE", "  ")])).unwrap();
        assert!(config.timezone.is_none());
    }

    #[test]
    fn rejects_bad_values() {
        for pairs in [
            [("PICKER_INTERVAL_MINUTES", "0")],
            [("PICKER_INTERVAL_MINUTES", "61")],
            [("PICKER_INTERVAL_MINUTES", "ten")],
            [("PICKER_WEEK_START", "someday")],
            [("PICKER_WATCH_TIMEZONE", "maybe")],
            [("PICKER_DATE_FORMAT", "YYY")],
        ] {
            assert!(
                PickerConfig::from_lookup(lookup_from(&pairs)).is_err(),
                "{:?} should be rejected",
                pairs
            );
        }
    }

    #[test]
    fn deserializes_partial_json() {
        let config: PickerConfig =
            serde_json::from_str(r#"{ "intervalMinutes": 30, "watchTimezone": true }"#).unwrap();
        assert_eq!(config.interval_minutes, 30);
        assert!(config.watch_timezone);
        assert_eq!(config.date_format, "M/D/YYYY");
    }
}

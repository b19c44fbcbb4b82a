//! Date picker controller.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Weekday};

use pickerkit_domain::{
    validate_max, validate_min, Bounds, DisplayFormat, DomainError, MonthGrid, TemporalValue,
    Validity, ValidityFlag, Zone,
};

use crate::calendar_grid::CalendarGridBuilder;
use crate::config::PickerConfig;
use crate::error::EngineError;
use crate::infrastructure::ClockPort;
use crate::normalizer::{Commit, Normalizer, Rendered};
use crate::notifier::ChangeNotifier;
use crate::picker::PickerKind;
use crate::timezone::TimezoneResolver;

/// Tracks which malformed bound inputs have already been reported.
#[derive(Debug, Default)]
struct BoundWarnings {
    min: bool,
    max: bool,
}

/// Engine behind a date input with a pop-up month calendar.
///
/// The external model is never stored here. Every operation that needs it
/// takes it as an argument, and every commit hands the new value back to the
/// caller (and queues a [`crate::ValueChanged`]) instead of writing it.
pub struct DatePicker {
    clock: Arc<dyn ClockPort>,
    notifier: ChangeNotifier,
    resolver: TimezoneResolver,
    normalizer: Normalizer,
    grid: CalendarGridBuilder,
    watch_timezone: bool,
    timezone: Option<String>,
    zone: Zone,
    /// "Today" in `zone`, captured when the zone was resolved
    today: NaiveDate,
    bounds: Bounds,
    validity: Validity,
    bound_warnings: BoundWarnings,
}

impl DatePicker {
    pub fn new(
        config: &PickerConfig,
        model: Option<&TemporalValue>,
        clock: Arc<dyn ClockPort>,
        notifier: ChangeNotifier,
    ) -> Result<Self, EngineError> {
        let resolver = TimezoneResolver::new(config.wants_timezone());
        Self::with_resolver(config, model, clock, notifier, resolver)
    }

    /// Build with a caller-supplied timezone resolver.
    pub fn with_resolver(
        config: &PickerConfig,
        model: Option<&TemporalValue>,
        clock: Arc<dyn ClockPort>,
        notifier: ChangeNotifier,
        resolver: TimezoneResolver,
    ) -> Result<Self, EngineError> {
        let format = DisplayFormat::new(&config.date_format)?;
        let grid = CalendarGridBuilder::new(config.week_start)?;
        let timezone = config.timezone.clone();
        let zone = resolver.resolve(timezone.as_deref());

        let now = clock.now();
        let working = model
            .filter(|m| m.is_valid())
            .copied()
            .unwrap_or_else(|| TemporalValue::from_instant(now, zone))
            .start_of(PickerKind::Date.working_unit());

        tracing::debug!(
            format = %format,
            zone = %zone,
            week_start = %config.week_start,
            "Date picker ready"
        );

        Ok(Self {
            notifier,
            resolver,
            normalizer: Normalizer::new(PickerKind::Date, format, working),
            grid,
            watch_timezone: config.watch_timezone,
            timezone,
            zone,
            today: zone.from_utc(&now).date_naive(),
            bounds: Bounds::none(),
            validity: Validity::default(),
            bound_warnings: BoundWarnings::default(),
            clock,
        })
    }

    // Accessors

    pub fn validity(&self) -> Validity {
        self.validity
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    pub fn timezone(&self) -> Option<&str> {
        self.timezone.as_deref()
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn working(&self) -> TemporalValue {
        self.normalizer.working()
    }

    /// The working copy in the configured format.
    pub fn text(&self) -> String {
        self.normalizer.text()
    }

    pub fn week_start(&self) -> Weekday {
        self.grid.week_start()
    }

    pub fn day_names(&self) -> Vec<String> {
        self.grid.day_names()
    }

    // Normalization

    /// Model -> view.
    pub fn format_model(&mut self, model: Option<&TemporalValue>) -> Rendered {
        let rendered = self.normalizer.format(model, &self.bounds);
        self.validity = rendered.validity;
        rendered
    }

    /// View -> model. A successful parse commits even when a bound is
    /// violated; the cleared flag tells the host.
    pub fn parse_input(&mut self, text: &str) -> Commit {
        let commit = self.normalizer.parse(text, &self.bounds);
        self.validity = commit.validity;
        if commit.committed {
            self.publish(commit.value);
        }
        commit
    }

    // Calendar

    /// Grid for the model's month, or the working copy's when there is no
    /// model.
    pub fn open(&self, model: Option<&TemporalValue>) -> Result<MonthGrid, EngineError> {
        let anchor = model
            .filter(|m| m.is_valid())
            .copied()
            .unwrap_or_else(|| self.normalizer.working());
        let (year, month) = match (anchor.year(), anchor.month0()) {
            (Some(year), Some(month)) => (year, month),
            _ => (self.today.year(), self.today.month0()),
        };
        self.build_month(year, month, model)
    }

    /// Grid for `(year, month)`, `month` 0-based.
    pub fn build_month(
        &self,
        year: i32,
        month: u32,
        model: Option<&TemporalValue>,
    ) -> Result<MonthGrid, EngineError> {
        self.grid
            .build(year, month, self.zone, &self.bounds, model, self.today)
    }

    /// Commit a clicked day. Disabled days are ignored and return `None`.
    ///
    /// # Errors
    ///
    /// `DomainError::OutOfRange` if the month or day does not exist.
    pub fn select_day(
        &mut self,
        year: i32,
        month: u32,
        day: u32,
        model: Option<&TemporalValue>,
    ) -> Result<Option<Commit>, EngineError> {
        let grid = self.build_month(year, month, model)?;
        let cell = grid
            .cell(day)
            .ok_or_else(|| DomainError::out_of_range("day", day))?;
        if cell.disabled {
            tracing::debug!(year, month, day, "Ignoring selection of disabled day");
            return Ok(None);
        }

        let date = NaiveDate::from_ymd_opt(year, month + 1, day)
            .ok_or_else(|| DomainError::out_of_range("day", day))?;
        let value = self.normalizer.working().with_date(date);
        self.normalizer.set_working(value);

        let report = self.bounds.check(Some(&value));
        let mut validity = Validity::default();
        validity.set(ValidityFlag::Date, value.is_valid());
        validity.set(ValidityFlag::MinDate, report.min_ok);
        validity.set(ValidityFlag::MaxDate, report.max_ok);
        self.validity = validity;

        self.publish(value);
        Ok(Some(Commit {
            value,
            committed: true,
            validity,
        }))
    }

    // Timezone and bounds

    /// Switch timezone.
    ///
    /// Bounds keep their wall-clock readings in the new zone, "today" is
    /// re-captured, and the working copy keeps its instant. When a model is
    /// present the converted working copy is committed. Returns `None` when
    /// timezone changes are not watched or nothing changed.
    pub fn set_timezone(
        &mut self,
        timezone: Option<&str>,
        model: Option<&TemporalValue>,
    ) -> Option<Commit> {
        if !self.watch_timezone {
            tracing::debug!("Timezone changes are not watched; ignoring");
            return None;
        }
        let timezone = timezone
            .map(str::trim)
            .filter(|tz| !tz.is_empty())
            .map(str::to_string);
        if timezone == self.timezone {
            return None;
        }

        let zone = self.resolver.resolve(timezone.as_deref());
        self.timezone = timezone;
        self.zone = zone;
        self.bounds = self.bounds.reinterpret_in(zone);
        self.today = zone.from_utc(&self.clock.now()).date_naive();

        let working = self.normalizer.working().convert_to(zone);
        self.normalizer.set_working(working);

        let committed = model.map(|_| {
            self.publish(working);
            working
        });

        let report = self.bounds.check(committed.as_ref());
        self.validity.set(ValidityFlag::MinDate, report.min_ok);
        self.validity.set(ValidityFlag::MaxDate, report.max_ok);

        tracing::debug!(zone = %zone, "Date picker timezone changed");

        committed.map(|value| Commit {
            value,
            committed: true,
            validity: self.validity,
        })
    }

    /// Replace the lower bound and re-check the model against it.
    pub fn set_min(
        &mut self,
        min: Option<TemporalValue>,
        model: Option<&TemporalValue>,
    ) -> Validity {
        self.bounds = self.bounds.with_min(min);
        self.validity
            .set(ValidityFlag::MinDate, validate_min(model, self.bounds.min()));
        self.validity
    }

    /// Replace the upper bound and re-check the model against it.
    pub fn set_max(
        &mut self,
        max: Option<TemporalValue>,
        model: Option<&TemporalValue>,
    ) -> Validity {
        self.bounds = self.bounds.with_max(max);
        self.validity
            .set(ValidityFlag::MaxDate, validate_max(model, self.bounds.max()));
        self.validity
    }

    /// [`Self::set_min`] from untrusted text (RFC 3339 or `YYYY-MM-DD`).
    pub fn set_min_input(&mut self, raw: Option<&str>, model: Option<&TemporalValue>) -> Validity {
        let min = self.parse_bound(raw, ValidityFlag::MinDate);
        self.set_min(min, model)
    }

    /// [`Self::set_max`] from untrusted text (RFC 3339 or `YYYY-MM-DD`).
    pub fn set_max_input(&mut self, raw: Option<&str>, model: Option<&TemporalValue>) -> Validity {
        let max = self.parse_bound(raw, ValidityFlag::MaxDate);
        self.set_max(max, model)
    }

    fn parse_bound(&mut self, raw: Option<&str>, side: ValidityFlag) -> Option<TemporalValue> {
        let raw = raw?.trim();
        if raw.is_empty() {
            return None;
        }
        match TemporalValue::parse_iso(raw, self.zone) {
            Ok(value) => Some(value),
            Err(err) => {
                let warned = match side {
                    ValidityFlag::MinDate => &mut self.bound_warnings.min,
                    _ => &mut self.bound_warnings.max,
                };
                if !*warned {
                    *warned = true;
                    tracing::warn!(
                        bound = %side,
                        input = raw,
                        error = %err,
                        "Bound is not a valid timestamp; ignoring it"
                    );
                }
                None
            }
        }
    }

    fn publish(&self, value: TemporalValue) {
        tracing::debug!(value = %value, "Committed date");
        self.notifier.notify(PickerKind::Date, value);
    }
}

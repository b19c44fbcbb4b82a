//! Time picker controller.

use std::sync::Arc;

use chrono::NaiveTime;

use pickerkit_domain::{Bounds, DisplayFormat, DomainError, TemporalValue, TimeSlot, Validity, Zone};

use crate::config::PickerConfig;
use crate::error::EngineError;
use crate::infrastructure::ClockPort;
use crate::normalizer::{Commit, Normalizer, Rendered};
use crate::notifier::ChangeNotifier;
use crate::picker::PickerKind;
use crate::time_slots::TimeSlotBuilder;
use crate::timezone::TimezoneResolver;

/// Engine behind a time input with a drop-down list of slots.
///
/// Time pickers carry no bounds; only the `time` parse flag is ever cleared.
pub struct TimePicker {
    notifier: ChangeNotifier,
    resolver: TimezoneResolver,
    normalizer: Normalizer,
    slots: Vec<TimeSlot>,
    interval_minutes: u32,
    watch_timezone: bool,
    timezone: Option<String>,
    zone: Zone,
    validity: Validity,
}

impl TimePicker {
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
        let format = DisplayFormat::new(&config.time_format)?;
        let slots = TimeSlotBuilder::new(format.clone()).build(config.interval_minutes)?;
        let timezone = config.timezone.clone();
        let zone = resolver.resolve(timezone.as_deref());

        let working = model
            .filter(|m| m.is_valid())
            .copied()
            .unwrap_or_else(|| TemporalValue::from_instant(clock.now(), zone))
            .start_of(PickerKind::Time.working_unit());

        tracing::debug!(
            format = %format,
            zone = %zone,
            interval_minutes = config.interval_minutes,
            slots = slots.len(),
            "Time picker ready"
        );

        Ok(Self {
            notifier,
            resolver,
            normalizer: Normalizer::new(PickerKind::Time, format, working),
            slots,
            interval_minutes: config.interval_minutes,
            watch_timezone: config.watch_timezone,
            timezone,
            zone,
            validity: Validity::default(),
        })
    }

    pub fn validity(&self) -> Validity {
        self.validity
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    pub fn timezone(&self) -> Option<&str> {
        self.timezone.as_deref()
    }

    pub fn working(&self) -> TemporalValue {
        self.normalizer.working()
    }

    pub fn text(&self) -> String {
        self.normalizer.text()
    }

    pub fn interval_minutes(&self) -> u32 {
        self.interval_minutes
    }

    pub fn time_slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    /// Model -> view. The model's date and time both flow into the working
    /// copy.
    pub fn format_model(&mut self, model: Option<&TemporalValue>) -> Rendered {
        let rendered = self.normalizer.format(model, &Bounds::none());
        self.validity = rendered.validity;
        rendered
    }

    /// View -> model. The date part of the working copy is kept.
    pub fn parse_input(&mut self, text: &str) -> Commit {
        let commit = self.normalizer.parse(text, &Bounds::none());
        self.validity = commit.validity;
        if commit.committed {
            self.publish(commit.value);
        }
        commit
    }

    /// Commit a clicked slot on the working copy's date, seconds zeroed.
    pub fn select_slot(&mut self, slot: &TimeSlot) -> Result<Commit, EngineError> {
        let time = NaiveTime::from_hms_opt(slot.hour, slot.minute, 0)
            .ok_or_else(|| DomainError::out_of_range("hour", slot.hour))?;
        let value = self.normalizer.working().with_time(time);
        if !value.is_valid() {
            return Err(DomainError::validation(format!(
                "{} does not exist on the working date in {}",
                slot.display, self.zone
            ))
            .into());
        }
        self.normalizer.set_working(value);
        self.validity = Validity::default();
        self.publish(value);

        Ok(Commit {
            value,
            committed: true,
            validity: self.validity,
        })
    }

    /// Switch timezone, keeping the instant of the working copy, and commit
    /// the converted value. Returns `None` when timezone changes are not
    /// watched or nothing changed.
    pub fn set_timezone(&mut self, timezone: Option<&str>) -> Option<Commit> {
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

        let value = self.normalizer.working().convert_to(zone);
        self.normalizer.set_working(value);
        self.publish(value);

        tracing::debug!(zone = %zone, "Time picker timezone changed");

        Some(Commit {
            value,
            committed: true,
            validity: self.validity,
        })
    }

    fn publish(&self, value: TemporalValue) {
        tracing::debug!(value = %value, "Committed time");
        self.notifier.notify(PickerKind::Time, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::notifier::ValueChanged;
    use chrono::{TimeZone, Utc};
    use tokio::sync::mpsc::UnboundedReceiver;

    fn utc(y: i32, m0: u32, d: u32, h: u32, min: u32, s: u32) -> TemporalValue {
        TemporalValue::from_parts(y, m0, d, h, min, s, Zone::utc())
    }

    fn clock() -> Arc<dyn ClockPort> {
        Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 1, 15, 12, 34, 56).unwrap()))
    }

    fn config(interval_minutes: u32) -> PickerConfig {
        PickerConfig {
            interval_minutes,
            timezone: Some("UTC".to_string()),
            ..PickerConfig::default()
        }
    }

    fn picker(
        config: &PickerConfig,
        model: Option<&TemporalValue>,
    ) -> (TimePicker, UnboundedReceiver<ValueChanged>) {
        let (notifier, rx) = ChangeNotifier::channel();
        let resolver = TimezoneResolver::new(config.wants_timezone()).with_default_zone(Zone::utc());
        let picker = TimePicker::with_resolver(config, model, clock(), notifier, resolver).unwrap();
        (picker, rx)
    }

    #[test]
    fn working_copy_starts_at_current_minute() {
        let (p, _rx) = picker(&config(60), None);
        assert_eq!(p.working(), utc(2024, 0, 15, 12, 34, 0));
        assert_eq!(p.text(), "12:34 pm");
    }

    #[test]
    fn half_hour_slots() {
        let (p, _rx) = picker(&config(30), None);
        let slots = p.time_slots();
        assert_eq!(p.interval_minutes(), 30);
        assert_eq!(slots.len(), 48);
        assert_eq!(slots[0].display, "12:00 am");
        assert_eq!(slots[1].display, "12:30 am");
        assert_eq!(slots[47].display, "11:30 pm");
    }

    #[test]
    fn selecting_a_slot_keeps_date_and_zeroes_seconds() {
        let model = utc(2023, 6, 4, 8, 15, 42);
        let (mut p, mut rx) = picker(&config(30), Some(&model));
        let slot = p.time_slots()[37].clone();
        let commit = p.select_slot(&slot).unwrap();
        assert_eq!(commit.value, utc(2023, 6, 4, 18, 30, 0));
        assert!(commit.validity.is_valid());
        let event = rx.try_recv().unwrap();
        assert_eq!(event.source, PickerKind::Time);
        assert_eq!(event.value, commit.value);
    }

    #[test]
    fn parse_keeps_date() {
        let (mut p, mut rx) = picker(&config(60), None);
        let commit = p.parse_input("7:05 am");
        assert!(commit.committed);
        assert_eq!(commit.value, utc(2024, 0, 15, 7, 5, 0));
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn garbage_clears_time_flag_without_commit() {
        let (mut p, mut rx) = picker(&config(60), None);
        let before = p.working();
        let commit = p.parse_input("quarter past");
        assert!(!commit.committed);
        assert!(!p.validity().time);
        assert!(p.validity().date);
        assert_eq!(p.working(), before);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn format_takes_date_and_time_from_model() {
        let (mut p, _rx) = picker(&config(60), None);
        let model = utc(2020, 1, 29, 21, 10, 0);
        let rendered = p.format_model(Some(&model));
        assert_eq!(rendered.text, "9:10 pm");
        assert_eq!(p.working(), model);
    }

    #[test]
    fn invalid_model_clears_time_flag() {
        let (mut p, _rx) = picker(&config(60), None);
        let rendered = p.format_model(Some(&TemporalValue::invalid()));
        assert!(!rendered.validity.time);
        assert_eq!(rendered.text, "12:34 pm");
    }

    #[test]
    fn timezone_change_converts_and_commits() {
        let config = PickerConfig {
            watch_timezone: true,
            ..config(60)
        };
        let (mut p, mut rx) = picker(&config, None);
        let before = p.working();
        let commit = p.set_timezone(Some("+02:00")).unwrap();
        assert_eq!(commit.value.instant(), before.instant());
        assert_eq!(commit.value.hour(), Some(14));
        assert_eq!(p.text(), "2:34 pm");
        assert_eq!(rx.try_recv().unwrap().value, commit.value);
    }

    #[test]
    fn unwatched_timezone_is_ignored() {
        let (mut p, mut rx) = picker(&config(60), None);
        assert!(p.set_timezone(Some("+02:00")).is_none());
        assert_eq!(p.zone(), Zone::utc());
        assert_eq!(p.timezone(), Some("UTC"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn invalid_interval_fails_construction() {
        let (notifier, _rx) = ChangeNotifier::channel();
        assert!(TimePicker::new(&config(0), None, clock(), notifier).is_err());
    }

    #[cfg(feature = "tz")]
    #[test]
    fn slot_inside_dst_gap_moves_forward() {
        let ny = Zone::parse("America/New_York").unwrap();
        let model = TemporalValue::from_parts(2024, 2, 10, 0, 0, 0, ny);
        let config = PickerConfig {
            timezone: Some("America/New_York".to_string()),
            ..config(30)
        };
        let (mut p, _rx) = picker(&config, Some(&model));
        let two_am = p
            .time_slots()
            .iter()
            .find(|s| s.hour == 2 && s.minute == 0)
            .cloned()
            .unwrap();
        let commit = p.select_slot(&two_am).unwrap();
        assert_eq!(commit.value.hour(), Some(3));
    }
}

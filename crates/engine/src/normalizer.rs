//! String <-> temporal value normalization around a private working copy.
//!
//! The working copy is owned by one picker. Keystrokes are parsed into it,
//! and external model values are merged into it, but it only reaches the
//! host through a [`Commit`]. Other consumers bound to the same model
//! therefore never see half-typed input.

use pickerkit_domain::{Bounds, DisplayFormat, TemporalValue, Validity, ValidityFlag, Zone};

use crate::picker::PickerKind;

/// Result of a parse pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Commit {
    /// The working copy after the pass
    pub value: TemporalValue,
    /// Whether `value` should be written to the external model
    pub committed: bool,
    pub validity: Validity,
}

/// Result of a format pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    pub validity: Validity,
}

pub struct Normalizer {
    kind: PickerKind,
    format: DisplayFormat,
    working: TemporalValue,
}

impl Normalizer {
    pub fn new(kind: PickerKind, format: DisplayFormat, working: TemporalValue) -> Self {
        Self {
            kind,
            format,
            working,
        }
    }

    pub fn format_pattern(&self) -> &DisplayFormat {
        &self.format
    }

    pub fn working(&self) -> TemporalValue {
        self.working
    }

    /// Replace the working copy, e.g. after a selection or zone change.
    pub fn set_working(&mut self, value: TemporalValue) {
        self.working = value;
    }

    /// The working copy rendered with the configured format.
    pub fn text(&self) -> String {
        self.working.format(&self.format)
    }

    /// View -> model: parse user input.
    ///
    /// Only the fields the format encodes are merged into the working copy,
    /// so a date-only entry leaves the time of day alone. A typed offset
    /// (`Z`) replaces the working copy's zone. Empty input is
    /// neither an error nor a commit. Bounds are checked against the merged
    /// value; a bound violation still commits.
    pub fn parse(&mut self, input: &str, bounds: &Bounds) -> Commit {
        let mut validity = Validity::default();

        if input.is_empty() {
            return Commit {
                value: self.working,
                committed: false,
                validity,
            };
        }

        let candidate = match self.format.parse(input) {
            Ok(fields) => {
                let merged = self.working.with_fields(fields.date, fields.time);
                // a typed offset owns the typed wall-clock reading
                match fields.offset {
                    Some(offset) => merged.reinterpret_in(Zone::Fixed(offset)),
                    None => merged,
                }
            }
            Err(err) => {
                tracing::debug!(
                    input,
                    format = %self.format,
                    error = %err,
                    "Input does not match format"
                );
                TemporalValue::invalid()
            }
        };

        if !candidate.is_valid() {
            validity.set(self.kind.validity_flag(), false);
            return Commit {
                value: self.working,
                committed: false,
                validity,
            };
        }

        let report = bounds.check(Some(&candidate));
        validity.set(ValidityFlag::MinDate, report.min_ok);
        validity.set(ValidityFlag::MaxDate, report.max_ok);
        self.working = candidate;

        Commit {
            value: candidate,
            committed: true,
            validity,
        }
    }

    /// Model -> view: render an external value.
    ///
    /// The picker's field scope is merged from `model` into the working copy
    /// before rendering. An absent model renders as an empty string; an
    /// invalid one clears the parse flag and renders the unchanged working
    /// copy.
    pub fn format(&mut self, model: Option<&TemporalValue>, bounds: &Bounds) -> Rendered {
        let mut validity = Validity::default();

        let Some(model) = model else {
            return Rendered {
                text: String::new(),
                validity,
            };
        };

        let report = bounds.check(Some(model));
        validity.set(ValidityFlag::MinDate, report.min_ok);
        validity.set(ValidityFlag::MaxDate, report.max_ok);

        if model.is_valid() {
            self.working = self.working.merge(model, self.kind.model_scope());
        } else {
            validity.set(self.kind.validity_flag(), false);
        }

        Rendered {
            text: self.text(),
            validity,
        }
    }
}

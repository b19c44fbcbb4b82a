//! Optional min/max constraints on a temporal value.
//!
//! Comparisons are inclusive and made at whole-second precision. Anything
//! invalid (candidate or bound) passes.

use std::cmp::Ordering;

use crate::temporal::TemporalValue;
use crate::zone::Zone;

/// `true` unless both sides are valid and `candidate` is earlier than `min`.
pub fn validate_min(candidate: Option<&TemporalValue>, min: Option<&TemporalValue>) -> bool {
    match (candidate, min) {
        (Some(c), Some(m)) => c.cmp_seconds(m).map_or(true, |ord| ord != Ordering::Less),
        _ => true,
    }
}

/// `true` unless both sides are valid and `candidate` is later than `max`.
pub fn validate_max(candidate: Option<&TemporalValue>, max: Option<&TemporalValue>) -> bool {
    match (candidate, max) {
        (Some(c), Some(m)) => c.cmp_seconds(m).map_or(true, |ord| ord != Ordering::Greater),
        _ => true,
    }
}

/// Outcome of checking one candidate against both bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundsReport {
    pub min_ok: bool,
    pub max_ok: bool,
}

impl BoundsReport {
    pub fn is_ok(&self) -> bool {
        self.min_ok && self.max_ok
    }
}

/// A (min, max) pair; either side may be absent.
///
/// An invalid bound is stored as absent, so it never constrains anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounds {
    min: Option<TemporalValue>,
    max: Option<TemporalValue>,
}

impl Bounds {
    pub fn new(min: Option<TemporalValue>, max: Option<TemporalValue>) -> Self {
        Self {
            min: min.filter(TemporalValue::is_valid),
            max: max.filter(TemporalValue::is_valid),
        }
    }

    /// No constraint on either side.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn min(&self) -> Option<&TemporalValue> {
        self.min.as_ref()
    }

    pub fn max(&self) -> Option<&TemporalValue> {
        self.max.as_ref()
    }

    /// Replace the lower bound.
    pub fn with_min(&self, min: Option<TemporalValue>) -> Self {
        Self::new(min, self.max)
    }

    /// Replace the upper bound.
    pub fn with_max(&self, max: Option<TemporalValue>) -> Self {
        Self::new(self.min, max)
    }

    pub fn check(&self, candidate: Option<&TemporalValue>) -> BoundsReport {
        BoundsReport {
            min_ok: validate_min(candidate, self.min()),
            max_ok: validate_max(candidate, self.max()),
        }
    }

    /// Re-attach both bounds to `zone`, keeping their wall-clock readings.
    pub fn reinterpret_in(&self, zone: Zone) -> Self {
        Self::new(
            self.min.map(|m| m.reinterpret_in(zone)),
            self.max.map(|m| m.reinterpret_in(zone)),
        )
    }

    /// Whether any instant in `[start, end]` satisfies both bounds.
    ///
    /// The span is taken as given, so a caller laying out days builds
    /// `start` and `end` in its own zone. Invalid endpoints pass.
    pub fn admits_span(&self, start: &TemporalValue, end: &TemporalValue) -> bool {
        validate_min(Some(end), self.min()) && validate_max(Some(start), self.max())
    }
}

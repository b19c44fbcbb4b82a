//! Timezone resolution with a per-instance capability check.
//!
//! Whether named zones are usable is decided once, when the resolver is
//! built. If a timezone is wanted but unsupported the resolver logs a single
//! warning and every later resolution quietly falls back to local time.

use std::sync::atomic::{AtomicBool, Ordering};

use pickerkit_domain::{DomainError, Zone};

pub struct TimezoneResolver {
    default_zone: Zone,
    named_supported: bool,
    degraded_warned: AtomicBool,
}

impl TimezoneResolver {
    /// Build a resolver for this process.
    ///
    /// `timezone_requested` is whether the host configured any timezone
    /// handling; if it did and the build has no timezone database, the
    /// degraded-capability warning is emitted right away.
    pub fn new(timezone_requested: bool) -> Self {
        Self::with_capability(timezone_requested, Zone::named_zones_supported())
    }

    /// Build a resolver with an explicit capability answer.
    pub fn with_capability(timezone_requested: bool, named_supported: bool) -> Self {
        let resolver = Self {
            default_zone: detect_default_zone(named_supported),
            named_supported,
            degraded_warned: AtomicBool::new(false),
        };
        if timezone_requested && !named_supported {
            resolver.warn_degraded();
        }
        resolver
    }

    /// Replace the detected default zone.
    pub fn with_default_zone(mut self, zone: Zone) -> Self {
        self.default_zone = zone;
        self
    }

    pub fn supports_timezones(&self) -> bool {
        self.named_supported
    }

    pub fn default_zone(&self) -> Zone {
        self.default_zone
    }

    /// Whether the degraded-capability warning has been issued.
    pub fn has_warned(&self) -> bool {
        self.degraded_warned.load(Ordering::Relaxed)
    }

    /// Resolve an explicit identifier, falling back to the default zone.
    ///
    /// Unrecognised identifiers are logged and replaced by the default. Named
    /// zones without timezone support resolve to local time.
    pub fn resolve(&self, explicit: Option<&str>) -> Zone {
        let Some(id) = explicit.map(str::trim).filter(|id| !id.is_empty()) else {
            return self.default_zone;
        };

        match Zone::parse(id) {
            Ok(zone) if self.accepts(&zone) => zone,
            Ok(_) | Err(DomainError::TimezoneUnsupported(_)) => {
                self.warn_degraded();
                Zone::Local
            }
            Err(err) => {
                tracing::warn!(
                    timezone = id,
                    error = %err,
                    default = %self.default_zone,
                    "Ignoring unrecognised timezone"
                );
                self.default_zone
            }
        }
    }

    fn accepts(&self, zone: &Zone) -> bool {
        match zone {
            #[cfg(feature = "tz")]
            Zone::Named(_) => self.named_supported,
            _ => true,
        }
    }

    fn warn_degraded(&self) {
        if !self.degraded_warned.swap(true, Ordering::Relaxed) {
            tracing::warn!("Trying to use timezones without timezone support; using local time");
        }
    }
}

#[cfg(feature = "tz")]
fn detect_default_zone(named_supported: bool) -> Zone {
    if !named_supported {
        return Zone::Local;
    }
    match iana_time_zone::get_timezone() {
        Ok(name) => Zone::parse(&name).unwrap_or_else(|err| {
            tracing::debug!(timezone = %name, error = %err, "Detected timezone not recognised");
            Zone::Local
        }),
        Err(err) => {
            tracing::debug!(error = %err, "Could not detect system timezone");
            Zone::Local
        }
    }
}

#[cfg(not(feature = "tz"))]
fn detect_default_zone(_named_supported: bool) -> Zone {
    Zone::Local
}

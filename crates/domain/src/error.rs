//! Unified error types for the domain layer
//!
//! Provides a common error type for every value-object constructor and
//! conversion, so the engine never has to fall back to `String` errors.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Input did not match the expected format
    #[error("Parse error: {0}")]
    Parse(String),

    /// A calendar coordinate does not exist (month 12, year beyond range, ...)
    #[error("Out of range: {field} = {value}")]
    OutOfRange { field: &'static str, value: i64 },

    /// The identifier is not a known timezone
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    /// Named timezones were requested but no timezone database is compiled in
    #[error("Timezone support unavailable for '{0}'")]
    TimezoneUnsupported(String),
}

impl DomainError {
    /// Creates a validation error for contract violations.
    ///
    /// Use this when a caller passes values outside the allowed range:
    /// - Slot intervals outside 1..=60
    /// - Format patterns that encode nothing
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a parse error for string-to-value conversion failures.
    ///
    /// # Example
    /// ```ignore
    /// let parsed = format.parse("2/30/2020");
    /// assert!(matches!(parsed, Err(DomainError::Parse(_))));
    /// ```
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an out of range error
    pub fn out_of_range(field: &'static str, value: impl Into<i64>) -> Self {
        Self::OutOfRange {
            field,
            value: value.into(),
        }
    }

    /// Create an unknown timezone error
    pub fn unknown_timezone(id: impl Into<String>) -> Self {
        Self::UnknownTimezone(id.into())
    }

    /// Create a timezone unsupported error
    pub fn timezone_unsupported(id: impl Into<String>) -> Self {
        Self::TimezoneUnsupported(id.into())
    }
}

impl From<chrono::format::ParseError> for DomainError {
    fn from(err: chrono::format::ParseError) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = DomainError::validation("interval must be 1..=60");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(err.to_string(), "Validation failed: interval must be 1..=60");
    }

    #[test]
    fn test_out_of_range_error() {
        let err = DomainError::out_of_range("month", 12);
        assert!(matches!(err, DomainError::OutOfRange { .. }));
        assert_eq!(err.to_string(), "Out of range: month = 12");
    }

    #[test]
    fn test_unknown_timezone_error() {
        let err = DomainError::unknown_timezone("Mars/Olympus_Mons");
        assert!(err.to_string().contains("Mars/Olympus_Mons"));
    }

    #[test]
    fn test_from_chrono_parse_error() {
        let chrono_err = chrono::NaiveDate::parse_from_str("nope", "%Y-%m-%d")
            .expect_err("should not parse");
        let domain_err: DomainError = chrono_err.into();
        assert!(matches!(domain_err, DomainError::Parse(_)));
    }
}

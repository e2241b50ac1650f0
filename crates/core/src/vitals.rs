//! Pulse readings and the entry validator.

use std::num::IntErrorKind;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::types::{Bpm, Timestamp};

/// Lowest pulse rate accepted from user entry.
pub const MIN_BPM: Bpm = 40;

/// Highest pulse rate accepted from user entry.
pub const MAX_BPM: Bpm = 220;

/// Threshold above which a reading triggers the emergency pipeline when
/// nothing else is configured.
pub const DEFAULT_HIGH_PULSE_THRESHOLD: Bpm = 120;

/// A validated pulse reading. Only the most recent one is retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VitalReading {
    pub value: Bpm,
    pub captured_at: Timestamp,
}

impl VitalReading {
    /// Build a reading from an already-parsed value, enforcing the range.
    pub fn new(value: i64, captured_at: Timestamp) -> Result<Self, ValidationError> {
        if value < i64::from(MIN_BPM) || value > i64::from(MAX_BPM) {
            return Err(ValidationError::OutOfRange {
                value,
                min: MIN_BPM,
                max: MAX_BPM,
            });
        }
        Ok(Self {
            value: value as Bpm,
            captured_at,
        })
    }

    /// Whether this reading is strictly above `threshold`.
    pub fn exceeds(&self, threshold: Bpm) -> bool {
        self.value > threshold
    }
}

/// Parse and range-check a raw pulse entry, stamping it with the current time.
///
/// Integers too large for `i64` are out of range, not malformed; the
/// reported value saturates at the nearest bound.
pub fn validate(raw: &str) -> Result<VitalReading, ValidationError> {
    let trimmed = raw.trim();
    let value = match trimmed.parse::<i64>() {
        Ok(value) => value,
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => i64::MAX,
            IntErrorKind::NegOverflow => i64::MIN,
            _ => return Err(ValidationError::NotANumber(trimmed.to_string())),
        },
    };
    VitalReading::new(value, Utc::now())
}

/// Check that a configured threshold is itself a plausible pulse rate.
pub fn validate_threshold(threshold: i64) -> Result<Bpm, ValidationError> {
    VitalReading::new(threshold, Utc::now()).map(|r| r.value)
}

/// The last stored reading as the home and history views present it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReadingSummary {
    pub reading: Option<VitalReading>,
    pub is_high: bool,
}

impl ReadingSummary {
    pub fn new(reading: Option<VitalReading>, threshold: Bpm) -> Self {
        let is_high = reading.is_some_and(|r| r.exceeds(threshold));
        Self { reading, is_high }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn accepts_every_value_in_range() {
        for n in MIN_BPM..=MAX_BPM {
            let reading = validate(&n.to_string()).expect("in-range value should validate");
            assert_eq!(reading.value, n);
        }
    }

    #[test]
    fn rejects_values_just_outside_range() {
        for n in [-1, 0, 39, 221, 300, 1000] {
            assert_matches!(
                validate(&n.to_string()),
                Err(ValidationError::OutOfRange { value, .. }) if value == n
            );
        }
    }

    #[test]
    fn rejects_non_numeric_input() {
        for raw in ["", "abc", "12.5", "120bpm", "  "] {
            assert_matches!(validate(raw), Err(ValidationError::NotANumber(_)));
        }
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(validate(" 72\n").unwrap().value, 72);
    }

    #[test]
    fn huge_numbers_are_out_of_range_not_nan() {
        assert_matches!(
            validate("99999999999"),
            Err(ValidationError::OutOfRange { .. })
        );
    }

    #[test]
    fn integers_beyond_i64_are_out_of_range() {
        assert_matches!(
            validate("99999999999999999999"),
            Err(ValidationError::OutOfRange { value: i64::MAX, min: MIN_BPM, max: MAX_BPM })
        );
        assert_matches!(
            validate("-99999999999999999999"),
            Err(ValidationError::OutOfRange { value: i64::MIN, .. })
        );
        assert_matches!(validate("9999999999999999999x"), Err(ValidationError::NotANumber(_)));
    }

    #[test]
    fn exceeds_is_strict() {
        let at = Utc::now();
        assert!(!VitalReading::new(120, at).unwrap().exceeds(120));
        assert!(VitalReading::new(121, at).unwrap().exceeds(120));
    }

    #[test]
    fn threshold_must_be_plausible() {
        assert_eq!(validate_threshold(120), Ok(120));
        assert!(validate_threshold(10).is_err());
        assert!(validate_threshold(500).is_err());
    }

    #[test]
    fn summary_flags_high_readings() {
        let at = Utc::now();
        let high = ReadingSummary::new(Some(VitalReading::new(130, at).unwrap()), 120);
        assert!(high.is_high);

        let normal = ReadingSummary::new(Some(VitalReading::new(90, at).unwrap()), 120);
        assert!(!normal.is_high);

        let empty = ReadingSummary::new(None, 120);
        assert!(!empty.is_high);
    }
}

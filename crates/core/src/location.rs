//! Device coordinates and fix-request options.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Upper bound on the wait for a single location fix.
pub const LOCATION_TIMEOUT: Duration = Duration::from_secs(15);

/// Oldest cached fix the platform may return instead of a fresh one.
pub const LOCATION_MAX_AGE: Duration = Duration::from_secs(10);

/// A single position fix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
    /// Horizontal accuracy radius in metres, when the platform reports one.
    pub accuracy: Option<f64>,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy: None,
        }
    }

    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = Some(accuracy);
        self
    }

    /// Whether both components are finite and inside the WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// A maps link suitable for a text message.
    pub fn maps_url(&self) -> String {
        format!(
            "https://maps.google.com/?q={:.6},{:.6}",
            self.latitude, self.longitude
        )
    }
}

/// Options passed to the platform when requesting a fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationOptions {
    pub timeout: Duration,
    pub maximum_age: Duration,
    pub high_accuracy: bool,
}

impl Default for LocationOptions {
    fn default() -> Self {
        Self {
            timeout: LOCATION_TIMEOUT,
            maximum_age: LOCATION_MAX_AGE,
            high_accuracy: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_match_platform_request() {
        let opts = LocationOptions::default();
        assert_eq!(opts.timeout, Duration::from_secs(15));
        assert_eq!(opts.maximum_age, Duration::from_secs(10));
        assert!(opts.high_accuracy);
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(Coordinates::new(51.5, -0.12).is_valid());
        assert!(!Coordinates::new(91.0, 0.0).is_valid());
        assert!(!Coordinates::new(0.0, 181.0).is_valid());
        assert!(!Coordinates::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn maps_url_uses_six_decimals() {
        let url = Coordinates::new(6.5244, 3.3792).maps_url();
        assert_eq!(url, "https://maps.google.com/?q=6.524400,3.379200");
    }
}

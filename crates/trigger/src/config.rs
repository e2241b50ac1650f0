use std::path::PathBuf;
use std::time::Duration;

use pulseguard_advisor::GeminiConfig;
use pulseguard_core::types::Bpm;
use pulseguard_core::vitals::{validate_threshold, DEFAULT_HIGH_PULSE_THRESHOLD};
use pulseguard_core::Coordinates;

/// Default location of the JSON profile store.
const DEFAULT_STORE_PATH: &str = "pulseguard-store.json";

/// Configuration problems detected at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} has invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0}")]
    Incomplete(String),
}

/// Application configuration loaded from environment variables.
///
/// Every field has a default suitable for local use; the API key is the
/// only thing a deployment normally has to provide.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Readings strictly above this trigger the emergency pipeline.
    pub high_pulse_threshold: Bpm,
    /// Generative API connection settings.
    pub gemini: GeminiConfig,
    /// JSON file backing the profile store.
    pub store_path: PathBuf,
    /// Position reported by the fixed position source. `None` means
    /// location access is treated as denied.
    pub device_position: Option<Coordinates>,
    /// Endpoint for outward alert delivery. `None` means alerts are only
    /// logged.
    pub contact_webhook_url: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            high_pulse_threshold: DEFAULT_HIGH_PULSE_THRESHOLD,
            gemini: GeminiConfig::default(),
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            device_position: None,
            contact_webhook_url: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                 | Default                                     |
    /// |-------------------------|---------------------------------------------|
    /// | `HIGH_PULSE_THRESHOLD`  | `120`                                       |
    /// | `GEMINI_API_KEY`        | unset (advisory always falls back)          |
    /// | `GEMINI_MODEL`          | `gemini-pro`                                |
    /// | `GEMINI_API_URL`        | `https://generativelanguage.googleapis.com` |
    /// | `ADVISORY_TIMEOUT_SECS` | `10`                                        |
    /// | `PULSEGUARD_STORE_PATH` | `pulseguard-store.json`                     |
    /// | `DEVICE_LATITUDE`       | unset                                       |
    /// | `DEVICE_LONGITUDE`      | unset                                       |
    /// | `DEVICE_ACCURACY`       | unset                                       |
    /// | `CONTACT_WEBHOOK_URL`   | unset                                       |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(raw) = var("HIGH_PULSE_THRESHOLD") {
            config.high_pulse_threshold = parse_threshold(&raw)?;
        }

        config.gemini.api_key = var("GEMINI_API_KEY");
        if let Some(model) = var("GEMINI_MODEL") {
            config.gemini.model = model;
        }
        if let Some(url) = var("GEMINI_API_URL") {
            config.gemini.api_url = url;
        }
        if let Some(raw) = var("ADVISORY_TIMEOUT_SECS") {
            let secs: u64 = raw.parse().map_err(|_| ConfigError::Invalid {
                var: "ADVISORY_TIMEOUT_SECS",
                value: raw.clone(),
                reason: "must be a whole number of seconds".into(),
            })?;
            config.gemini.timeout = Duration::from_secs(secs);
        }

        if let Some(path) = var("PULSEGUARD_STORE_PATH") {
            config.store_path = PathBuf::from(path);
        }

        config.device_position = match (var("DEVICE_LATITUDE"), var("DEVICE_LONGITUDE")) {
            (Some(lat), Some(lon)) => {
                let mut coords = Coordinates::new(
                    parse_float("DEVICE_LATITUDE", &lat)?,
                    parse_float("DEVICE_LONGITUDE", &lon)?,
                );
                if let Some(acc) = var("DEVICE_ACCURACY") {
                    coords = coords.with_accuracy(parse_float("DEVICE_ACCURACY", &acc)?);
                }
                if !coords.is_valid() {
                    return Err(ConfigError::Invalid {
                        var: "DEVICE_LATITUDE",
                        value: format!("{lat},{lon}"),
                        reason: "coordinates are out of range".into(),
                    });
                }
                Some(coords)
            }
            (None, None) => None,
            _ => {
                return Err(ConfigError::Incomplete(
                    "DEVICE_LATITUDE and DEVICE_LONGITUDE must be set together".into(),
                ))
            }
        };

        config.contact_webhook_url = var("CONTACT_WEBHOOK_URL");

        Ok(config)
    }
}

/// Parse and range-check a threshold override.
pub fn parse_threshold(raw: &str) -> Result<Bpm, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        var: "HIGH_PULSE_THRESHOLD",
        value: raw.to_string(),
        reason,
    };
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| invalid("must be a whole number of BPM".into()))?;
    validate_threshold(value).map_err(|e| invalid(e.to_string()))
}

fn parse_float(var: &'static str, raw: &str) -> Result<f64, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Invalid {
        var,
        value: raw.to_string(),
        reason: "must be a decimal number".into(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = load(&[]).unwrap();
        assert_eq!(config.high_pulse_threshold, 120);
        assert_eq!(config.gemini.api_key, None);
        assert_eq!(config.gemini.model, "gemini-pro");
        assert_eq!(config.store_path, PathBuf::from("pulseguard-store.json"));
        assert_eq!(config.device_position, None);
        assert_eq!(config.contact_webhook_url, None);
    }

    #[test]
    fn threshold_override() {
        let config = load(&[("HIGH_PULSE_THRESHOLD", "110")]).unwrap();
        assert_eq!(config.high_pulse_threshold, 110);
    }

    #[test]
    fn rejects_implausible_threshold() {
        assert_matches!(
            load(&[("HIGH_PULSE_THRESHOLD", "20")]),
            Err(ConfigError::Invalid { var: "HIGH_PULSE_THRESHOLD", .. })
        );
        assert_matches!(
            load(&[("HIGH_PULSE_THRESHOLD", "fast")]),
            Err(ConfigError::Invalid { var: "HIGH_PULSE_THRESHOLD", .. })
        );
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = load(&[("GEMINI_API_KEY", "  "), ("HIGH_PULSE_THRESHOLD", "")]).unwrap();
        assert_eq!(config.gemini.api_key, None);
        assert_eq!(config.high_pulse_threshold, 120);
    }

    #[test]
    fn device_position_with_accuracy() {
        let config = load(&[
            ("DEVICE_LATITUDE", "6.5244"),
            ("DEVICE_LONGITUDE", "3.3792"),
            ("DEVICE_ACCURACY", "15"),
        ])
        .unwrap();
        assert_eq!(
            config.device_position,
            Some(Coordinates::new(6.5244, 3.3792).with_accuracy(15.0))
        );
    }

    #[test]
    fn half_a_position_is_incomplete() {
        assert_matches!(
            load(&[("DEVICE_LATITUDE", "6.5")]),
            Err(ConfigError::Incomplete(_))
        );
    }

    #[test]
    fn out_of_range_position_is_invalid() {
        assert_matches!(
            load(&[("DEVICE_LATITUDE", "95"), ("DEVICE_LONGITUDE", "0")]),
            Err(ConfigError::Invalid { .. })
        );
    }

    #[test]
    fn advisory_timeout_override() {
        let config = load(&[("ADVISORY_TIMEOUT_SECS", "3")]).unwrap();
        assert_eq!(config.gemini.timeout, Duration::from_secs(3));
        assert!(load(&[("ADVISORY_TIMEOUT_SECS", "soon")]).is_err());
    }
}

//! Repository for the user profile and the last pulse reading.
//!
//! Converts between the well-known string keys in
//! [`pulseguard_core::storage_keys`] and typed values, validating on read.
//! Empty strings are how the profile form records "not set" and read back
//! as `None`.

use chrono::{DateTime, Utc};
use pulseguard_core::storage_keys::{
    KEY_EMERGENCY_CONTACT, KEY_EMERGENCY_NAME, KEY_HEALTH_CONDITIONS, KEY_LAST_PULSE,
    KEY_LAST_PULSE_TIME, KEY_USER_AGE, KEY_USER_NAME,
};
use pulseguard_core::{EmergencyContact, UserProfile, VitalReading};

use crate::error::StoreError;
use crate::kv::KeyValueStore;

/// Provides typed access to profile and reading keys.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Load every profile field. Missing keys read as `None`.
    pub async fn get_profile(store: &dyn KeyValueStore) -> Result<UserProfile, StoreError> {
        Ok(UserProfile {
            name: Self::get_text(store, KEY_USER_NAME).await?,
            age: Self::get_text(store, KEY_USER_AGE).await?,
            emergency_contact_name: Self::get_text(store, KEY_EMERGENCY_NAME).await?,
            emergency_contact_number: Self::get_text(store, KEY_EMERGENCY_CONTACT).await?,
            health_notes: Self::get_text(store, KEY_HEALTH_CONDITIONS).await?,
        })
    }

    /// Write every profile field. `None` is stored as an empty string so a
    /// cleared field overwrites the previous value.
    ///
    /// Stops at the first failing key; earlier keys stay written.
    pub async fn save_profile(
        store: &dyn KeyValueStore,
        profile: &UserProfile,
    ) -> Result<(), StoreError> {
        let fields = [
            (KEY_USER_NAME, &profile.name),
            (KEY_USER_AGE, &profile.age),
            (KEY_EMERGENCY_CONTACT, &profile.emergency_contact_number),
            (KEY_EMERGENCY_NAME, &profile.emergency_contact_name),
            (KEY_HEALTH_CONDITIONS, &profile.health_notes),
        ];
        for (key, value) in fields {
            store.set(key, value.as_deref().unwrap_or_default()).await?;
        }
        Ok(())
    }

    /// The emergency contact, or `None` when no number is stored.
    pub async fn get_emergency_contact(
        store: &dyn KeyValueStore,
    ) -> Result<Option<EmergencyContact>, StoreError> {
        let profile = UserProfile {
            emergency_contact_name: Self::get_text(store, KEY_EMERGENCY_NAME).await?,
            emergency_contact_number: Self::get_text(store, KEY_EMERGENCY_CONTACT).await?,
            ..Default::default()
        };
        Ok(profile.emergency_contact())
    }

    /// Persist the reading value and its capture time.
    pub async fn save_last_reading(
        store: &dyn KeyValueStore,
        reading: &VitalReading,
    ) -> Result<(), StoreError> {
        store.set(KEY_LAST_PULSE, &reading.value.to_string()).await?;
        store
            .set(KEY_LAST_PULSE_TIME, &reading.captured_at.to_rfc3339())
            .await
    }

    /// Load the last reading.
    ///
    /// A value outside the accepted range, or a missing or unparsable
    /// timestamp, reads as "no reading" and is logged.
    pub async fn get_last_reading(
        store: &dyn KeyValueStore,
    ) -> Result<Option<VitalReading>, StoreError> {
        let (Some(raw_value), Some(raw_time)) = (
            Self::get_text(store, KEY_LAST_PULSE).await?,
            Self::get_text(store, KEY_LAST_PULSE_TIME).await?,
        ) else {
            return Ok(None);
        };

        let Ok(value) = raw_value.trim().parse::<i64>() else {
            tracing::warn!(raw = %raw_value, "Ignoring non-numeric stored pulse");
            return Ok(None);
        };
        let Ok(captured_at) = DateTime::parse_from_rfc3339(raw_time.trim()) else {
            tracing::warn!(raw = %raw_time, "Ignoring unparsable stored pulse time");
            return Ok(None);
        };

        match VitalReading::new(value, captured_at.with_timezone(&Utc)) {
            Ok(reading) => Ok(Some(reading)),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring out-of-range stored pulse");
                Ok(None)
            }
        }
    }

    async fn get_text(store: &dyn KeyValueStore, key: &str) -> Result<Option<String>, StoreError> {
        Ok(store.get(key).await?.filter(|v| !v.trim().is_empty()))
    }
}

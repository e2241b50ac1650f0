//! SOS arming state machine and the emergency event record.
//!
//! Pure logic. The orchestrator owns a [`SosState`] and drives it with
//! [`SosEvent`]s; the dwell timer itself lives with the orchestrator.

use std::time::Duration;

use serde::Serialize;

use crate::error::LocationError;
use crate::location::Coordinates;
use crate::vitals::VitalReading;

/// How long the armed state lasts before returning to idle.
pub const SOS_DWELL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SosState {
    #[default]
    Idle,
    Armed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SosEvent {
    /// A reading breached the threshold or the user pressed SOS.
    Breach,
    /// The dwell elapsed without a newer breach.
    DwellExpired,
}

impl SosState {
    /// Apply an event and return the resulting state.
    ///
    /// `Breach` always arms (re-arming an armed state is allowed and
    /// restarts the dwell). `DwellExpired` always disarms.
    pub fn apply(self, event: SosEvent) -> SosState {
        match event {
            SosEvent::Breach => SosState::Armed,
            SosEvent::DwellExpired => SosState::Idle,
        }
    }

    pub fn is_armed(self) -> bool {
        self == SosState::Armed
    }
}

/// What started an emergency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmergencyTrigger {
    HighPulse,
    Manual,
}

/// The transient record of one emergency. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmergencyEvent {
    pub trigger: EmergencyTrigger,
    /// The breaching reading; `None` for a manual SOS.
    pub reading: Option<VitalReading>,
    /// `None` when permission was denied or the fix failed.
    pub location: Option<Coordinates>,
    /// Why `location` is missing, when it is.
    pub location_error: Option<LocationError>,
    /// Full advisory text (live or fallback). Empty for a manual SOS.
    pub advisory_text: String,
    /// The contact the alert was addressed to, if one is stored.
    pub contact_notified: Option<String>,
    /// Whether the breaching reading reached durable storage.
    pub reading_persisted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_by_default() {
        assert_eq!(SosState::default(), SosState::Idle);
    }

    #[test]
    fn breach_arms_from_any_state() {
        assert_eq!(SosState::Idle.apply(SosEvent::Breach), SosState::Armed);
        assert_eq!(SosState::Armed.apply(SosEvent::Breach), SosState::Armed);
    }

    #[test]
    fn dwell_expiry_disarms() {
        assert_eq!(SosState::Armed.apply(SosEvent::DwellExpired), SosState::Idle);
        assert_eq!(SosState::Idle.apply(SosEvent::DwellExpired), SosState::Idle);
    }

    #[test]
    fn dwell_is_five_seconds() {
        assert_eq!(SOS_DWELL, Duration::from_secs(5));
    }
}

//! User-facing notification texts.
//!
//! Kept in one place so the orchestrator, the CLI and the tests agree on
//! exact wording.

/// Shown when a pulse entry fails validation.
pub const MSG_INVALID_PULSE: &str = "Please enter a valid pulse rate (40-220)";

/// Shown when a reading is at or below the threshold.
pub const MSG_PULSE_RECORDED: &str = "Pulse recorded successfully";

/// Shown when a reading breaches the threshold.
pub const MSG_HIGH_PULSE_SOS: &str = "🚨 High pulse detected – SOS triggered!";

/// Shown when the SOS mode is armed manually.
pub const MSG_SOS_ACTIVATED: &str = "SOS Emergency Mode Activated";

/// Shown when the armed dwell expires.
pub const MSG_SOS_DEACTIVATED: &str = "SOS Mode Deactivated";

/// Location was shared after a high-pulse breach.
pub const MSG_HIGH_PULSE_LOCATION_SHARED: &str =
    "🚨 High pulse detected – Location shared with emergency contacts";

/// Location was captured but there is no contact to share it with.
pub const MSG_LOCATION_TRACKED: &str = "Location tracked for safety monitoring";

/// Location permission was refused.
pub const MSG_LOCATION_PERMISSION_REQUIRED: &str =
    "Location permission is required for safety features. Please enable it in settings.";

/// The location fix timed out or failed.
pub const MSG_LOCATION_UNAVAILABLE: &str =
    "Unable to get your location. Please check your GPS settings.";

pub const MSG_PROFILE_SAVED: &str = "Profile saved successfully";

pub const MSG_PROFILE_SAVE_FAILED: &str = "Failed to save profile";

/// "Contacting emergency: ..." notice for a stored contact.
pub fn contacting(contact: &str) -> String {
    format!("Contacting emergency: {contact}")
}

/// "Location shared with ..." notice after a manual SOS.
pub fn location_shared_with(contact: &str) -> String {
    format!("Location shared with {contact}")
}

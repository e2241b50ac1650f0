//! Well-known key names in the local profile store.
//!
//! These are shared with existing on-device data and must not be renamed.

/// Last submitted pulse value, decimal BPM.
pub const KEY_LAST_PULSE: &str = "lastPulse";

/// RFC 3339 timestamp of the last submitted pulse.
pub const KEY_LAST_PULSE_TIME: &str = "lastPulseTime";

/// Display name of the user.
pub const KEY_USER_NAME: &str = "userName";

/// Free-form age entry.
pub const KEY_USER_AGE: &str = "userAge";

/// Emergency contact phone number. This is the contact reference used by
/// the trigger pipeline.
pub const KEY_EMERGENCY_CONTACT: &str = "emergencyContact";

/// Emergency contact display name.
pub const KEY_EMERGENCY_NAME: &str = "emergencyName";

/// Free-form health notes.
pub const KEY_HEALTH_CONDITIONS: &str = "healthConditions";


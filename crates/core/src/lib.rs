//! Domain model and pure logic for the PulseGuard safety pipeline.
//!
//! Nothing in this crate performs I/O. Storage, location, notification
//! and network collaborators live in the sibling crates and depend on
//! the types defined here.

pub mod advisory;
pub mod error;
pub mod location;
pub mod messages;
pub mod profile;
pub mod sos;
pub mod storage_keys;
pub mod types;
pub mod vitals;

pub use error::{LocationError, ValidationError};
pub use location::{Coordinates, LocationOptions};
pub use profile::{EmergencyContact, UserProfile};
pub use sos::{EmergencyEvent, EmergencyTrigger, SosEvent, SosState};
pub use vitals::{validate, ReadingSummary, VitalReading};

//! `pulseguard-trigger` library crate.
//!
//! The emergency trigger pipeline and everything the `pulseguard` binary
//! needs to run it: configuration, geolocation, collaborator wiring and
//! command-line parsing. The binary entrypoint lives in `main.rs`.

pub mod cli;
pub mod config;
pub mod location;
pub mod orchestrator;
pub mod wiring;

pub use config::{AppConfig, ConfigError};
pub use location::{DeviceLocator, GeolocationProvider, PositionSource};
pub use orchestrator::{Collaborators, EmergencyOrchestrator, SubmitOutcome};

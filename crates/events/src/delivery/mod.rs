//! Outward delivery of emergency alerts to the stored contact.
//!
//! The trigger pipeline hands an [`EmergencyAlert`] to a
//! [`ContactForwarder`] once it has both a contact reference and a location.

pub mod log;
pub mod webhook;

use async_trait::async_trait;
use chrono::Utc;
use pulseguard_core::types::{Bpm, Timestamp};
use pulseguard_core::{Coordinates, EmergencyContact, EmergencyTrigger};
use serde::Serialize;

pub use log::LogForwarder;
pub use webhook::WebhookForwarder;

/// Everything a contact needs to act on an emergency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmergencyAlert {
    /// Number to dial or message.
    pub contact_number: String,
    pub contact_name: Option<String>,
    pub trigger: EmergencyTrigger,
    /// The breaching pulse, absent for a manual SOS.
    pub bpm: Option<Bpm>,
    pub location: Coordinates,
    pub maps_url: String,
    pub timestamp: Timestamp,
}

impl EmergencyAlert {
    pub fn new(
        contact: &EmergencyContact,
        trigger: EmergencyTrigger,
        bpm: Option<Bpm>,
        location: Coordinates,
    ) -> Self {
        Self {
            contact_number: contact.number.clone(),
            contact_name: contact.name.clone(),
            trigger,
            bpm,
            maps_url: location.maps_url(),
            location,
            timestamp: Utc::now(),
        }
    }

    /// Plain-text body for SMS-style channels.
    pub fn text(&self) -> String {
        match self.bpm {
            Some(bpm) => format!(
                "Emergency alert: a pulse of {bpm} BPM was recorded. Last known location: {}",
                self.maps_url
            ),
            None => format!(
                "Emergency alert: SOS activated. Last known location: {}",
                self.maps_url
            ),
        }
    }
}

/// Error type for alert forwarding failures.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote server returned a non-2xx status code.
    #[error("Forwarding endpoint returned HTTP {0}")]
    HttpStatus(u16),
}

/// Delivers an emergency alert to its contact.
#[async_trait]
pub trait ContactForwarder: Send + Sync {
    async fn forward(&self, alert: &EmergencyAlert) -> Result<(), ForwardError>;
}

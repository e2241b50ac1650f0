use async_trait::async_trait;

use super::{ContactForwarder, EmergencyAlert, ForwardError};

/// Records the alert in the log instead of sending it anywhere.
///
/// Used when no outward channel is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogForwarder;

#[async_trait]
impl ContactForwarder for LogForwarder {
    async fn forward(&self, alert: &EmergencyAlert) -> Result<(), ForwardError> {
        tracing::warn!(
            contact_number = %alert.contact_number,
            contact_name = ?alert.contact_name,
            trigger = ?alert.trigger,
            bpm = ?alert.bpm,
            latitude = alert.location.latitude,
            longitude = alert.location.longitude,
            "Emergency alert (no delivery channel configured)"
        );
        Ok(())
    }
}

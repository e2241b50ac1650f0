//! Webhook delivery with bounded retry.
//!
//! [`WebhookForwarder`] POSTs a JSON-encoded [`EmergencyAlert`] to an
//! external URL (an SMS gateway, a relay service). Failed attempts are
//! retried after each configured delay, then once more.

use std::time::Duration;

use async_trait::async_trait;

use super::{ContactForwarder, EmergencyAlert, ForwardError};

/// Default retry delays (1 s, 2 s).
const DEFAULT_RETRY_DELAYS: [Duration; 2] = [Duration::from_secs(1), Duration::from_secs(2)];

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// WebhookForwarder
// ---------------------------------------------------------------------------

/// Delivers emergency alerts to a webhook endpoint.
pub struct WebhookForwarder {
    client: reqwest::Client,
    url: String,
    retry_delays: Vec<Duration>,
}

impl WebhookForwarder {
    /// Create a forwarder for `url` with a pre-configured HTTP client.
    pub fn new(url: impl Into<String>) -> Result<Self, ForwardError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            url: url.into(),
            retry_delays: DEFAULT_RETRY_DELAYS.to_vec(),
        })
    }

    /// Replace the delays between attempts. An empty list means one attempt.
    pub fn with_retry_delays(mut self, delays: Vec<Duration>) -> Self {
        self.retry_delays = delays;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Execute a single POST request and check the response status.
    async fn try_send(&self, payload: &serde_json::Value) -> Result<(), ForwardError> {
        let response = self.client.post(&self.url).json(payload).send().await?;
        if !response.status().is_success() {
            return Err(ForwardError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

#[async_trait]
impl ContactForwarder for WebhookForwarder {
    async fn forward(&self, alert: &EmergencyAlert) -> Result<(), ForwardError> {
        let payload = serde_json::json!({
            "contact_number": alert.contact_number,
            "contact_name": alert.contact_name,
            "trigger": alert.trigger,
            "bpm": alert.bpm,
            "location": alert.location,
            "maps_url": alert.maps_url,
            "text": alert.text(),
            "timestamp": alert.timestamp,
        });

        for (attempt, delay) in self.retry_delays.iter().enumerate() {
            match self.try_send(&payload).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        url = %self.url,
                        error = %e,
                        "Alert delivery attempt failed, retrying"
                    );
                    tokio::time::sleep(*delay).await;
                }
            }
        }

        // Final attempt after the last backoff.
        self.try_send(&payload).await.inspect_err(|e| {
            tracing::error!(url = %self.url, error = %e, "Alert delivery failed after all retries");
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

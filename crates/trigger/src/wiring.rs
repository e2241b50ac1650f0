//! Builds the collaborator graph from [`AppConfig`].

use std::sync::Arc;

use pulseguard_advisor::{AdvisoryError, AdvisoryTextProvider, Advisor, ChatService, GeminiClient};
use pulseguard_events::{
    ContactForwarder, ForwardError, LogForwarder, NotificationSink, WebhookForwarder,
};
use pulseguard_store::{open_store, StoreError};

use crate::config::AppConfig;
use crate::location::{DeviceLocator, FixedPositionSource, GeolocationProvider, NoPositionSource};
use crate::orchestrator::{Collaborators, EmergencyOrchestrator};

/// Failures while constructing services.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("profile store: {0}")]
    Store(#[from] StoreError),

    #[error("advisory client: {0}")]
    Advisory(#[from] AdvisoryError),

    #[error("contact forwarder: {0}")]
    Forwarder(#[from] ForwardError),
}

/// Everything the binary talks to.
pub struct Services {
    pub orchestrator: EmergencyOrchestrator,
    pub advisor: Arc<dyn AdvisoryTextProvider>,
    pub chat: ChatService,
}

pub async fn build_services(
    config: &AppConfig,
    sink: Arc<dyn NotificationSink>,
) -> Result<Services, StartupError> {
    let store = open_store(&config.store_path).await?;

    if config.gemini.api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set, advisory text will use offline fallbacks");
    }
    let generator = Arc::new(GeminiClient::new(config.gemini.clone())?);
    let advisor: Arc<dyn AdvisoryTextProvider> = Arc::new(Advisor::new(generator.clone()));
    let chat = ChatService::new(generator);

    let locator: Arc<dyn GeolocationProvider> = match config.device_position {
        Some(coords) => Arc::new(DeviceLocator::new(FixedPositionSource::new(coords))),
        None => Arc::new(DeviceLocator::new(NoPositionSource)),
    };

    let forwarder: Arc<dyn ContactForwarder> = match &config.contact_webhook_url {
        Some(url) => {
            tracing::info!(url = %url, "Forwarding emergency alerts to webhook");
            Arc::new(WebhookForwarder::new(url.clone())?)
        }
        None => Arc::new(LogForwarder),
    };

    let orchestrator = EmergencyOrchestrator::new(
        Collaborators {
            store,
            locator,
            advisor: Arc::clone(&advisor),
            sink,
            forwarder,
        },
        config.high_pulse_threshold,
    );

    Ok(Services {
        orchestrator,
        advisor,
        chat,
    })
}

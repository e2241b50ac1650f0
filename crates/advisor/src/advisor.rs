//! Template-driven advisory text with offline fallback.

use std::sync::Arc;

use async_trait::async_trait;
use pulseguard_core::advisory::AdvisoryTemplate;

use crate::TextGenerator;

/// Produces advisory text for a template. Always yields text.
#[async_trait]
pub trait AdvisoryTextProvider: Send + Sync {
    async fn advise(&self, template: AdvisoryTemplate) -> String;
}

/// [`AdvisoryTextProvider`] backed by a [`TextGenerator`].
///
/// Any generator error (network, quota, malformed payload, missing
/// credential) is logged and replaced verbatim by the template's fallback.
#[derive(Clone)]
pub struct Advisor {
    generator: Arc<dyn TextGenerator>,
}

impl Advisor {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl AdvisoryTextProvider for Advisor {
    async fn advise(&self, template: AdvisoryTemplate) -> String {
        let prompt = template.prompt();
        match self.generator.generate(&prompt).await {
            Ok(text) => {
                tracing::debug!(template = %template, chars = text.chars().count(), "Advisory text generated");
                text
            }
            Err(e) => {
                tracing::warn!(template = %template, error = %e, "Advisory request failed, using fallback");
                template.fallback().to_string()
            }
        }
    }
}

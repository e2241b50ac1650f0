//! Advisory text from an external generative-text service.
//!
//! - [`GeminiClient`]: REST client for the Gemini `generateContent` call.
//! - [`Advisor`]: template-driven advice that never fails: any service
//!   error is replaced by the template's fixed fallback text.
//! - [`ChatService`]: context-aware safety chat on the same service.

pub mod advisor;
pub mod chat;
pub mod error;
pub mod gemini;

use async_trait::async_trait;

pub use advisor::{AdvisoryTextProvider, Advisor};
pub use chat::{ChatContext, ChatMessage, ChatRole, ChatService};
pub use error::AdvisoryError;
pub use gemini::{GeminiClient, GeminiConfig};

/// A prompt-in, text-out generative service.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AdvisoryError>;
}

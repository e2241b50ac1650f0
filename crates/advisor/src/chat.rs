//! Context-aware safety chat.
//!
//! Builds a single prompt from a fixed system preamble, what is known about
//! the user, the conversation so far and the new message, then sends it
//! through the same [`TextGenerator`] as the advisory templates.

use std::sync::Arc;

use pulseguard_core::advisory::CHAT_FALLBACK;
use serde::{Deserialize, Serialize};

use crate::TextGenerator;

const SYSTEM_PREAMBLE: &str = "You are a helpful and supportive AI assistant in a women's safety app.
Your primary goal is to provide safety advice, emotional support, and practical guidance.";

const SYSTEM_GUIDANCE: &str = "Keep your responses focused on women's safety, emotional well-being, and practical advice.
Never suggest anything dangerous. Be reassuring, direct, and provide actionable steps.
Limit responses to 2-3 short paragraphs maximum.

If the user appears to be in immediate danger, suggest:
1. Getting to a safe location
2. Contacting emergency services (local emergency number)
3. Alerting trusted contacts
4. Using the SOS button in the app

For mental health concerns, suggest calming techniques, seeking professional help, and using support networks.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// What the chat knows about the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatContext {
    pub user_name: Option<String>,
    pub last_pulse: Option<String>,
    pub emergency_contact: Option<String>,
}

impl ChatContext {
    fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(name) = &self.user_name {
            parts.push(format!("The user's name is {name}."));
        }
        if let Some(pulse) = &self.last_pulse {
            parts.push(format!("The user's last recorded pulse was {pulse} BPM."));
        }
        if let Some(contact) = &self.emergency_contact {
            parts.push(format!("The user's emergency contact is {contact}."));
        }
        parts.join(" ")
    }
}

/// Full prompt for one chat turn.
pub fn build_prompt(message: &str, history: &[ChatMessage], context: &ChatContext) -> String {
    let transcript = history
        .iter()
        .map(|m| {
            let speaker = match m.role {
                ChatRole::User => "User",
                ChatRole::Assistant => "Assistant",
            };
            format!("{speaker}: {}", m.content)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{SYSTEM_PREAMBLE}\n\n{}\n\n{SYSTEM_GUIDANCE}\n\nCONVERSATION HISTORY:\n{transcript}\n\nUser: {message}\nAssistant: ",
        context.describe()
    )
}

/// Safety chat over a [`TextGenerator`].
#[derive(Clone)]
pub struct ChatService {
    generator: Arc<dyn TextGenerator>,
}

impl ChatService {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Reply to `message`. Falls back to [`CHAT_FALLBACK`] on any failure.
    pub async fn respond(
        &self,
        message: &str,
        history: &[ChatMessage],
        context: &ChatContext,
    ) -> String {
        let prompt = build_prompt(message, history, context);
        match self.generator.generate(&prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, history_len = history.len(), "Chat request failed, using fallback");
                CHAT_FALLBACK.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_includes_context_sentences() {
        let context = ChatContext {
            user_name: Some("Amara".into()),
            last_pulse: Some("128".into()),
            emergency_contact: Some("+2348000000000".into()),
        };
        let prompt = build_prompt("I feel unsafe", &[], &context);

        assert!(prompt.contains("The user's name is Amara."));
        assert!(prompt.contains("The user's last recorded pulse was 128 BPM."));
        assert!(prompt.contains("The user's emergency contact is +2348000000000."));
        assert!(prompt.ends_with("User: I feel unsafe\nAssistant: "));
    }

    #[test]
    fn empty_context_adds_no_sentences() {
        let prompt = build_prompt("hi", &[], &ChatContext::default());
        assert!(!prompt.contains("The user's"));
    }

    #[test]
    fn history_is_rendered_in_order() {
        let history = vec![
            ChatMessage::user("Someone is following me"),
            ChatMessage::assistant("Move to a public place."),
        ];
        let prompt = build_prompt("Now what?", &history, &ChatContext::default());

        let user_at = prompt.find("User: Someone is following me").unwrap();
        let assistant_at = prompt.find("Assistant: Move to a public place.").unwrap();
        assert!(user_at < assistant_at);
        assert!(prompt.contains("CONVERSATION HISTORY:\nUser: Someone"));
    }
}

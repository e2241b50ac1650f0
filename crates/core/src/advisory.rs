//! Prompt templates for the generative advisory service and the offline
//! fallback texts that replace a failed call.
//!
//! Templates and fallbacks are versioned together: any wording change to
//! either bumps [`TEMPLATE_VERSION`].

use std::fmt;

use crate::types::Bpm;

/// Version of the template and fallback set below.
pub const TEMPLATE_VERSION: u32 = 1;

/// Longest text handed to a constrained display surface.
pub const NOTIFICATION_TEXT_LIMIT: usize = 200;

const ELLIPSIS: &str = "...";

/// Offline advice for an elevated pulse.
pub const HIGH_PULSE_FALLBACK: &str = "For your elevated pulse rate:
1. Take slow, deep breaths for 5 minutes
2. Find a safe, quiet place to sit down
3. Drink water if available
4. Call a trusted friend or emergency contact if you feel unsafe
5. Consider basic relaxation techniques like counting to 10";

/// Offline safety tips.
pub const SAFETY_TIPS_FALLBACK: &str = "Safety Tips:
1. Share your location with trusted contacts
2. Stay aware of your surroundings
3. Trust your instincts and leave uncomfortable situations
4. Keep emergency contacts easily accessible
5. Consider using safety apps with SOS features";

/// Offline text for every other template.
pub const GENERAL_FALLBACK: &str = "I apologize, but I cannot provide assistance at the moment. Please try again later when a connection is available.";

/// Offline reply for the safety chat.
pub const CHAT_FALLBACK: &str = "I apologize, but I cannot provide assistance at the moment. If you are in an emergency situation, please use the SOS button or contact emergency services directly.";

/// A prompt template, parameterised where the prompt needs data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdvisoryTemplate {
    Introduction,
    HighPulse { bpm: Bpm },
    SafetyConcern,
    EmotionalSupport,
    PulseInfo,
    WhatIsWmi,
    SkinConductance,
    ChronicFatigue,
    SafetyTips,
    PulseEmotions,
}

impl AdvisoryTemplate {
    /// Stable key used in logs and on the command line.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Introduction => "INTRODUCTION",
            Self::HighPulse { .. } => "HIGH_PULSE",
            Self::SafetyConcern => "SAFETY_CONCERN",
            Self::EmotionalSupport => "EMOTIONAL_SUPPORT",
            Self::PulseInfo => "PULSE_INFO",
            Self::WhatIsWmi => "WHAT_IS_WMI",
            Self::SkinConductance => "SKIN_CONDUCTANCE",
            Self::ChronicFatigue => "CHRONIC_FATIGUE",
            Self::SafetyTips => "SAFETY_TIPS",
            Self::PulseEmotions => "PULSE_EMOTIONS",
        }
    }

    /// Look up a parameterless template by key. `HIGH_PULSE` needs a value
    /// and is resolved with [`AdvisoryTemplate::HighPulse`] directly.
    pub fn from_key(key: &str) -> Option<Self> {
        let template = match key.to_ascii_uppercase().replace('-', "_").as_str() {
            "INTRODUCTION" => Self::Introduction,
            "SAFETY_CONCERN" => Self::SafetyConcern,
            "EMOTIONAL_SUPPORT" => Self::EmotionalSupport,
            "PULSE_INFO" => Self::PulseInfo,
            "WHAT_IS_WMI" => Self::WhatIsWmi,
            "SKIN_CONDUCTANCE" => Self::SkinConductance,
            "CHRONIC_FATIGUE" => Self::ChronicFatigue,
            "SAFETY_TIPS" => Self::SafetyTips,
            "PULSE_EMOTIONS" => Self::PulseEmotions,
            _ => return None,
        };
        Some(template)
    }

    /// Compose the prompt text sent to the generative service.
    pub fn prompt(&self) -> String {
        match self {
            Self::Introduction => "You are a caring and supportive AI assistant in a women's safety app. Introduce yourself warmly and explain how you can help with safety advice, emotional support, and monitoring well-being through pulse readings. Keep your response concise but friendly.".to_string(),
            Self::HighPulse { bpm } => format!(
                "A user's pulse rate of {bpm} BPM has been detected, which is concerning. Provide a brief, calming response that:
1. Acknowledges the high pulse rate
2. Offers immediate calming suggestions
3. Explains what might cause elevated pulse
4. Recommends next steps
Keep the response under 200 characters and prioritize immediate actionable advice."
            ),
            Self::SafetyConcern => "You are responding to a user who may be in danger. Provide clear, concise safety advice. Focus on:
1. Immediate actions to take
2. How to seek help
3. Ways to stay calm
Keep responses brief and actionable.".to_string(),
            Self::EmotionalSupport => "You are providing emotional support to a user. Be empathetic and understanding. Focus on:
1. Validating their feelings
2. Offering coping strategies
3. Suggesting professional help if needed
Keep responses warm but professional.".to_string(),
            Self::PulseInfo => "Explain the significance of pulse monitoring for safety and well-being. Include:
1. Normal pulse ranges
2. What high pulse might indicate
3. How to use pulse readings effectively
Keep it simple and informative.".to_string(),
            Self::WhatIsWmi => "Explain in simple terms what Wearable Monitoring Intelligence (WMI) is, how it relates to biometric data like pulse rate, and how it can be used for women's safety applications. Keep your response brief and informative.".to_string(),
            Self::SkinConductance => "Explain how skin conductance (also known as galvanic skin response) can be used to detect fear or stress, and how this might be useful in a women's safety application. Keep your explanation simple and concise.".to_string(),
            Self::ChronicFatigue => "What is Chronic Fatigue Syndrome, and how might it impact someone's safety? How can monitoring biometric data help manage chronic fatigue? Please provide a brief, informative response for women's health and safety.".to_string(),
            Self::SafetyTips => "Provide 3-5 practical safety tips that women can follow in potentially unsafe situations. These should be actionable, clear, and focused on personal safety. Keep your response concise.".to_string(),
            Self::PulseEmotions => "Explain the relationship between pulse rate and emotional states. How can elevated heart rate indicate fear, anxiety, or stress? How can this information be used for women's personal safety? Keep your response brief and informative.".to_string(),
        }
    }

    /// The fixed text substituted when the service call fails.
    pub fn fallback(&self) -> &'static str {
        match self {
            Self::HighPulse { .. } => HIGH_PULSE_FALLBACK,
            Self::SafetyTips => SAFETY_TIPS_FALLBACK,
            _ => GENERAL_FALLBACK,
        }
    }
}

impl fmt::Display for AdvisoryTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Shorten text for a notification: anything longer than
/// [`NOTIFICATION_TEXT_LIMIT`] characters keeps its first 197 characters
/// followed by `...`. Counts `char`s, so multi-byte text is never split.
pub fn truncate_for_notification(text: &str) -> String {
    if text.chars().count() <= NOTIFICATION_TEXT_LIMIT {
        return text.to_string();
    }
    let keep = NOTIFICATION_TEXT_LIMIT - ELLIPSIS.len();
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

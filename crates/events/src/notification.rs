//! The user-facing notification envelope.

use chrono::Utc;
use pulseguard_core::types::Timestamp;
use serde::{Deserialize, Serialize};

/// How long a notification should stay on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationDuration {
    Short,
    Long,
}

/// Where a notification should appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Top,
    Center,
    Bottom,
}

/// Visual weight of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Alert,
}

/// A message for the user, plus display hints the presenter may honour.
///
/// Constructed with [`Notification::info`] or [`Notification::alert`] and
/// adjusted with the builder methods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub duration: NotificationDuration,
    pub placement: Placement,
    pub severity: Severity,
    pub created_at: Timestamp,
}

impl Notification {
    /// A long-lived informational message at the bottom of the screen.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            duration: NotificationDuration::Long,
            placement: Placement::Bottom,
            severity: Severity::Info,
            created_at: Utc::now(),
        }
    }

    /// A long-lived alert in the centre of the screen.
    pub fn alert(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            duration: NotificationDuration::Long,
            placement: Placement::Center,
            severity: Severity::Alert,
            created_at: Utc::now(),
        }
    }

    pub fn short(mut self) -> Self {
        self.duration = NotificationDuration::Short;
        self
    }

    pub fn at(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }
}

//! In-process notification bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`NotificationBus`] fans every published [`Notification`] out to all
//! current subscribers (a terminal presenter, a test, a log forwarder).
//! It is designed to be shared via `Arc<NotificationBus>`.

use tokio::sync::broadcast;

use crate::notification::Notification;
use crate::sink::NotificationSink;

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out notification sink.
///
/// # Usage
///
/// ```rust
/// use pulseguard_events::{Notification, NotificationBus, NotificationSink};
///
/// let bus = NotificationBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.notify(Notification::info("Pulse recorded successfully"));
/// ```
pub struct NotificationBus {
    sender: broadcast::Sender<Notification>,
}

impl NotificationBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest unread notifications are dropped
    /// and slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to every notification published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl NotificationSink for NotificationBus {
    fn notify(&self, notification: Notification) {
        tracing::debug!(message = %notification.message, "Publishing notification");
        // A SendError only means nobody is listening.
        let _ = self.sender.send(notification);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

use crate::notification::{Notification, Severity};

/// Fire-and-forget notification channel.
///
/// Callers never learn whether a notification was shown, so implementations
/// must not block and must not fail.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Sink that writes notifications to the log and nowhere else.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Alert => tracing::warn!(
                placement = ?notification.placement,
                message = %notification.message,
                "Notification"
            ),
            Severity::Info => tracing::info!(
                placement = ?notification.placement,
                message = %notification.message,
                "Notification"
            ),
        }
    }
}

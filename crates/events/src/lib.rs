//! Notification and alert delivery for PulseGuard.
//!
//! - [`Notification`]: a user-facing message with display hints.
//! - [`NotificationSink`]: fire-and-forget "tell the user" seam.
//! - [`NotificationBus`]: in-process fan-out sink backed by
//!   `tokio::sync::broadcast`.
//! - [`TracingSink`]: sink that only logs.
//! - [`delivery`]: outward channels that forward an [`EmergencyAlert`]
//!   to the stored contact (log, webhook).

pub mod bus;
pub mod delivery;
pub mod notification;
pub mod sink;

pub use bus::NotificationBus;
pub use delivery::{ContactForwarder, EmergencyAlert, ForwardError, LogForwarder, WebhookForwarder};
pub use notification::{Notification, NotificationDuration, Placement, Severity};
pub use sink::{NotificationSink, TracingSink};

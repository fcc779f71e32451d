//! Per-user notification inboxes.

use lobby_protocol::Notification;
use tokio::sync::mpsc;

/// Channel sender the broker writes a user's notifications into.
pub type NotificationSender = mpsc::UnboundedSender<Notification>;

/// The receiving end of a user's inbox.
pub type NotificationReceiver = mpsc::UnboundedReceiver<Notification>;

/// Creates a fresh inbox.
pub(crate) fn channel() -> (NotificationSender, NotificationReceiver) {
    mpsc::unbounded_channel()
}

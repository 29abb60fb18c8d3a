use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use crate::models::Notification;

/// Fire-and-forget sink for user-facing error messages
pub trait NotificationSink: Send + Sync {
    fn error(&self, message: &str);
}

/// Sink that only writes notifications to the log
#[derive(Debug, Clone, Default)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn error(&self, message: &str) {
        warn!(notification = %message, "User notification");
    }
}

/// Sink that queues notifications for a UI to drain, like a toast container
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: UnboundedSender<Notification>,
}

impl ChannelNotifier {
    /// Create the sink together with the receiving end of its queue
    pub fn new() -> (Self, UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl NotificationSink for ChannelNotifier {
    fn error(&self, message: &str) {
        if self.sender.send(Notification::error(message)).is_err() {
            // Nobody is listening any more
            debug!(notification = %message, "Notification dropped, receiver closed");
        }
    }
}

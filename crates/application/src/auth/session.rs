//! Session event broadcasting.

use assured_domain::SessionEvent;
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 32;

/// Fan-out channel for [`SessionEvent`]s.
///
/// Front ends subscribe to learn when they must send the user back to
/// the login screen. Events sent while nobody listens are dropped.
#[derive(Debug, Clone)]
pub struct SessionEvents {
    sender: broadcast::Sender<SessionEvent>,
}

impl SessionEvents {
    /// Creates a channel with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self { sender }
    }

    /// Subscribes to events emitted from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    /// Emits an event to every current subscriber.
    pub fn emit(&self, event: SessionEvent) {
        tracing::debug!(?event, subscribers = self.sender.receiver_count(), "session event");
        // No receivers is not an error: the CLI may not be listening.
        let _ = self.sender.send(event);
    }
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new()
    }
}

//! Authentication lifecycle notifications.
//!
//! The client never decides what "go log in again" looks like. When a
//! session is lost or renewed it broadcasts an event and the embedding
//! application reacts (show a login screen, print a message, exit).

use tokio::sync::broadcast;
use tracing::debug;

/// Buffered events per subscriber before the oldest are dropped.
const CHANNEL_CAPACITY: usize = 16;

/// A change in authentication state worth surfacing to the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// The session is gone and cannot be recovered without the user
    /// logging in again. `return_to` is the path of the request that was
    /// abandoned, if any, so the application can come back to it.
    AuthenticationLost { return_to: Option<String> },
    /// A refresh succeeded and requests carry a new bearer token.
    SessionRefreshed { expires_at: i64 },
}

/// Broadcast hub for [`AuthEvent`]s.
///
/// Cloning shares the underlying channel. Events emitted while nobody is
/// subscribed are dropped silently.
#[derive(Debug, Clone)]
pub struct AuthEvents {
    sender: broadcast::Sender<AuthEvent>,
}

impl AuthEvents {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Subscribe to authentication events from this point on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.sender.subscribe()
    }

    /// Broadcast an event to all current subscribers.
    pub(crate) fn emit(&self, event: AuthEvent) {
        debug!(?event, "auth event");
        // send only fails when there are no subscribers, which is fine.
        let _ = self.sender.send(event);
    }
}

impl Default for AuthEvents {
    fn default() -> Self {
        Self::new()
    }
}

//! Session lifecycle events.
//!
//! A session signals the end of its life by emitting [`SessionEvent::Ended`]
//! on the channel it was spawned with, right before its actor task stops.
//! The consumer (the lobby service, in the assembled server) removes the
//! id from the registry first and prunes any derived indexes second, so no
//! index ever holds an identifier the registry no longer resolves.

use tokio::sync::mpsc;
use wyrmgate_protocol::SessionId;

/// A lifecycle notification from a combat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The session reached `Finished` and its actor is stopping.
    Ended { id: SessionId },
}

/// Sending half, held by every session actor.
pub type SessionEventSender = mpsc::UnboundedSender<SessionEvent>;

/// Receiving half, drained by the registry's owner.
pub type SessionEventReceiver = mpsc::UnboundedReceiver<SessionEvent>;

/// Creates the lifecycle event channel a registry is constructed around.
pub fn session_event_channel() -> (SessionEventSender, SessionEventReceiver) {
    mpsc::unbounded_channel()
}

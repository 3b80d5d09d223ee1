//! Combat registry: mints session identifiers and indexes running sessions.

use std::collections::HashMap;

use wyrmgate_protocol::{BattlefieldSeed, PlayerId, SessionId};

use crate::session::spawn_session;
use crate::{
    SessionEventReceiver, SessionEventSender, SessionHandle,
    session_event_channel,
};

/// Default command channel size for session actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Creates, indexes, and retires combat sessions.
///
/// An owned component, not a singleton: whoever assembles the server
/// constructs one and injects it into the lobby-facing and socket-facing
/// layers; tests run several independent registries side by side. The id
/// counter is per-registry for the same reason: identifiers are unique for
/// the registry's lifetime and never reused, even after the session they
/// named is gone.
pub struct CombatRegistry {
    /// Running sessions, keyed by session id.
    sessions: HashMap<SessionId, SessionHandle>,
    /// Source of the next session identifier.
    next_id: u64,
    /// Handed to every spawned session so it can signal its end.
    events: SessionEventSender,
}

impl CombatRegistry {
    /// Creates an empty registry plus the receiving half of its lifecycle
    /// event channel.
    ///
    /// The caller drains the receiver and, for every
    /// [`SessionEvent::Ended`](crate::SessionEvent), calls
    /// [`remove`](Self::remove) before touching any derived index.
    pub fn new() -> (Self, SessionEventReceiver) {
        let (events, receiver) = session_event_channel();
        (
            Self {
                sessions: HashMap::new(),
                next_id: 1,
                events,
            },
            receiver,
        )
    }

    /// Creates a new session and returns its identifier.
    ///
    /// Synchronous by contract: allocating the id, spawning the actor, and
    /// indexing the handle never touch network or storage.
    pub fn create(
        &mut self,
        nickname: impl Into<String>,
        seed: BattlefieldSeed,
        gm_id: PlayerId,
        roster: Vec<PlayerId>,
    ) -> SessionId {
        let id = SessionId::from_counter(self.next_id);
        self.next_id += 1;

        let handle = spawn_session(
            id.clone(),
            nickname.into(),
            seed,
            gm_id,
            roster,
            self.events.clone(),
            DEFAULT_CHANNEL_SIZE,
        );
        self.sessions.insert(id.clone(), handle);
        tracing::info!(session_id = %id, "combat session created");
        id
    }

    /// Looks up a session handle. Pure lookup, no side effects.
    pub fn get(&self, id: &SessionId) -> Option<SessionHandle> {
        self.sessions.get(id).cloned()
    }

    /// Removes a session from the index.
    ///
    /// The entry disappears before any downstream notification runs, so
    /// concurrent lookups immediately stop resolving the id.
    pub fn remove(&mut self, id: &SessionId) -> Option<SessionHandle> {
        let handle = self.sessions.remove(id);
        if handle.is_some() {
            tracing::info!(session_id = %id, "combat session removed");
        }
        handle
    }

    /// Returns the number of running sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns `true` if no sessions are running.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Lists the ids of all running sessions.
    pub fn ids(&self) -> Vec<SessionId> {
        self.sessions.keys().cloned().collect()
    }
}

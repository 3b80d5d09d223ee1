//! Lobby-facing combat service: creation, per-lobby indexing, aggregation.
//!
//! The lobby service owns the combat registry and the per-lobby index of
//! session identifiers, and it drains the sessions' lifecycle events. When a
//! session ends, the consumer removes it from the registry *first* (so
//! lookups stop resolving the id immediately) and prunes the lobby index
//! second; after the event is consumed, registry and index agree.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use wyrmgate_combat::{
    CombatRegistry, CookError, SessionEvent, SessionEventReceiver,
    SessionHandle, cook,
};
use wyrmgate_protocol::{LobbyId, PlayerId, PresetSource, SessionId};
use wyrmgate_store::{Store, StoreError};

/// Errors from the lobby-facing surface.
#[derive(Debug, thiserror::Error)]
pub enum LobbyError {
    /// The lobby doesn't exist; nothing was created.
    #[error("lobby {0} not found")]
    LobbyNotFound(LobbyId),

    /// The preset failed to cook; nothing was created.
    #[error(transparent)]
    Cook(#[from] CookError),

    /// The document store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One row of the lobby screen's combat overview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatOverview {
    pub session_id: SessionId,
    pub nickname: String,
    pub active: bool,
    pub round_count: u32,
    /// Display nicknames of currently connected players, sorted.
    pub connected: Vec<String>,
}

/// Creates and tracks combats on behalf of lobbies.
///
/// Cloneable: all state lives behind `Arc`s, so the socket layer and any
/// request handlers share one service.
pub struct LobbyService<S> {
    store: Arc<S>,
    registry: Arc<Mutex<CombatRegistry>>,
    index: Arc<Mutex<HashMap<LobbyId, Vec<SessionId>>>>,
}

impl<S> Clone for LobbyService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            registry: Arc::clone(&self.registry),
            index: Arc::clone(&self.index),
        }
    }
}

impl<S: Store> LobbyService<S> {
    /// Creates the service, its registry, and the lifecycle event consumer
    /// task.
    pub fn new(store: Arc<S>) -> Self {
        let (registry, events) = CombatRegistry::new();
        let registry = Arc::new(Mutex::new(registry));
        let index: Arc<Mutex<HashMap<LobbyId, Vec<SessionId>>>> =
            Arc::new(Mutex::new(HashMap::new()));

        tokio::spawn(consume_session_events(
            events,
            Arc::clone(&registry),
            Arc::clone(&index),
        ));

        Self {
            store,
            registry,
            index,
        }
    }

    /// The shared registry, for the socket admission layer.
    pub fn registry(&self) -> Arc<Mutex<CombatRegistry>> {
        Arc::clone(&self.registry)
    }

    /// Creates a new combat for a lobby and returns its session id.
    ///
    /// The lobby must exist and the preset must cook; on any failure nothing
    /// is registered or indexed.
    pub async fn create_combat(
        &self,
        lobby_id: &LobbyId,
        nickname: &str,
        preset: PresetSource,
        gm_id: PlayerId,
        players: Vec<PlayerId>,
    ) -> Result<SessionId, LobbyError> {
        let lobby = self
            .store
            .get_lobby(lobby_id)
            .await?
            .ok_or_else(|| LobbyError::LobbyNotFound(lobby_id.clone()))?;

        let seed = cook(preset, self.store.as_ref()).await?;

        // Both locks, no awaits in between: the index entry exists before
        // the session could possibly signal its end, so the consumer can
        // never prune an id the index hasn't recorded yet.
        let mut index = self.index.lock().await;
        let id = {
            let mut registry = self.registry.lock().await;
            registry.create(nickname, seed, gm_id, players)
        };
        index.entry(lobby_id.clone()).or_default().push(id.clone());

        tracing::info!(
            lobby_id = %lobby.id,
            session_id = %id,
            nickname,
            "combat created for lobby"
        );
        Ok(id)
    }

    /// The ids of this lobby's live combats, in creation order.
    pub async fn active_combats(&self, lobby_id: &LobbyId) -> Vec<SessionId> {
        self.index
            .lock()
            .await
            .get(lobby_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Builds the lobby screen's view of its combats.
    ///
    /// Read-heavy and tolerant: a session that vanishes between enumeration
    /// and detail lookup is omitted, as is any connected player whose user
    /// document is missing. Store failures still surface.
    pub async fn combat_overview(
        &self,
        lobby_id: &LobbyId,
    ) -> Result<Vec<CombatOverview>, LobbyError> {
        let Some(lobby) = self.store.get_lobby(lobby_id).await? else {
            return Ok(Vec::new());
        };

        let ids = self.active_combats(lobby_id).await;
        // Clone the handles out and release the registry lock before
        // talking to the session actors.
        let handles: Vec<SessionHandle> = {
            let registry = self.registry.lock().await;
            ids.iter().filter_map(|id| registry.get(id)).collect()
        };

        let mut overview = Vec::with_capacity(handles.len());
        for handle in handles {
            // The session may have ended while we enumerated.
            let Ok(info) = handle.info().await else { continue };

            let mut connected = Vec::with_capacity(info.connected.len());
            for player in &info.connected {
                if *player != lobby.gm_id && !lobby.players.contains(player) {
                    // No longer (or never) part of this lobby.
                    continue;
                }
                match self.store.get_user(player).await? {
                    Some(user) => connected.push(user.nickname),
                    None => continue,
                }
            }
            connected.sort();

            overview.push(CombatOverview {
                session_id: info.id.clone(),
                nickname: info.nickname.clone(),
                active: info.is_active(),
                round_count: if info.is_active() {
                    info.round_count
                } else {
                    0
                },
                connected,
            });
        }
        Ok(overview)
    }
}

/// Drains session lifecycle events for the service's registry.
///
/// Registry removal strictly precedes index pruning: an id stops resolving
/// before its index entries go away, never the other way around.
async fn consume_session_events(
    mut events: SessionEventReceiver,
    registry: Arc<Mutex<CombatRegistry>>,
    index: Arc<Mutex<HashMap<LobbyId, Vec<SessionId>>>>,
) {
    while let Some(event) = events.recv().await {
        match event {
            SessionEvent::Ended { id } => {
                registry.lock().await.remove(&id);

                let mut index = index.lock().await;
                for sessions in index.values_mut() {
                    sessions.retain(|s| *s != id);
                }
                index.retain(|_, sessions| !sessions.is_empty());
                tracing::info!(session_id = %id, "lobby index pruned");
            }
        }
    }
}

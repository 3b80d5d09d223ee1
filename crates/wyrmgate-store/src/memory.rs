//! In-memory store used for local development and tests.

use std::collections::HashMap;

use rand::Rng;
use tokio::sync::RwLock;
use wyrmgate_protocol::{
    EntityDefinition, LobbyId, PawnPlacement, PlayerId, PresetId,
};

use crate::{Lobby, Store, StoreError, StoredPreset, User};

/// A [`Store`] backed by in-process hash maps.
///
/// One `RwLock` per collection; reads dominate, and no operation touches two
/// collections at once, so there's no lock ordering to get wrong.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<PlayerId, User>>,
    lobbies: RwLock<HashMap<LobbyId, Lobby>>,
    entities: RwLock<HashMap<String, EntityDefinition>>,
    presets: RwLock<HashMap<PresetId, StoredPreset>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a user document with a freshly minted id.
    pub async fn create_user(
        &self,
        handle: impl Into<String>,
        nickname: impl Into<String>,
    ) -> User {
        let user = User {
            id: PlayerId::new(mint_id()),
            handle: handle.into(),
            nickname: nickname.into(),
        };
        self.users
            .write()
            .await
            .insert(user.id.clone(), user.clone());
        tracing::debug!(user_id = %user.id, "user document created");
        user
    }

    /// Inserts a user document under a caller-chosen id.
    ///
    /// Test fixtures want predictable ids; production id minting stays with
    /// [`create_user`](Self::create_user).
    pub async fn put_user(&self, user: User) {
        self.users.write().await.insert(user.id.clone(), user);
    }

    /// Creates a lobby document with a freshly minted id.
    pub async fn create_lobby(
        &self,
        name: impl Into<String>,
        gm_id: PlayerId,
    ) -> Lobby {
        let lobby = Lobby {
            id: LobbyId::new(mint_id()),
            name: name.into(),
            players: vec![gm_id.clone()],
            gm_id,
        };
        self.lobbies
            .write()
            .await
            .insert(lobby.id.clone(), lobby.clone());
        tracing::debug!(lobby_id = %lobby.id, "lobby document created");
        lobby
    }

    /// Inserts a lobby document under a caller-chosen id.
    pub async fn put_lobby(&self, lobby: Lobby) {
        self.lobbies.write().await.insert(lobby.id.clone(), lobby);
    }

    /// Inserts an entity definition under its content path.
    pub async fn put_entity(
        &self,
        path: impl Into<String>,
        definition: EntityDefinition,
    ) {
        self.entities.write().await.insert(path.into(), definition);
    }

    /// Persists a combat preset with a freshly minted id.
    pub async fn create_combat_preset(
        &self,
        pawns: Vec<PawnPlacement>,
    ) -> StoredPreset {
        let preset = StoredPreset {
            id: PresetId::new(mint_id()),
            pawns,
        };
        self.presets
            .write()
            .await
            .insert(preset.id.clone(), preset.clone());
        preset
    }
}

impl Store for MemoryStore {
    async fn get_user(
        &self,
        id: &PlayerId,
    ) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn get_user_by_handle(
        &self,
        handle: &str,
    ) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.handle == handle)
            .cloned())
    }

    async fn get_lobby(
        &self,
        id: &LobbyId,
    ) -> Result<Option<Lobby>, StoreError> {
        Ok(self.lobbies.read().await.get(id).cloned())
    }

    async fn get_entity(
        &self,
        path: &str,
    ) -> Result<Option<EntityDefinition>, StoreError> {
        Ok(self.entities.read().await.get(path).cloned())
    }

    async fn get_combat_preset(
        &self,
        id: &PresetId,
    ) -> Result<Option<StoredPreset>, StoreError> {
        Ok(self.presets.read().await.get(id).cloned())
    }

    async fn add_lobby_player(
        &self,
        lobby: &LobbyId,
        player: &PlayerId,
    ) -> Result<(), StoreError> {
        let mut lobbies = self.lobbies.write().await;
        let doc = lobbies.get_mut(lobby).ok_or_else(|| {
            StoreError::MissingDocument {
                kind: "lobby",
                id: lobby.to_string(),
            }
        })?;
        if !doc.players.contains(player) {
            doc.players.push(player.clone());
        }
        Ok(())
    }

    async fn remove_lobby_player(
        &self,
        lobby: &LobbyId,
        player: &PlayerId,
    ) -> Result<(), StoreError> {
        let mut lobbies = self.lobbies.write().await;
        let doc = lobbies.get_mut(lobby).ok_or_else(|| {
            StoreError::MissingDocument {
                kind: "lobby",
                id: lobby.to_string(),
            }
        })?;
        doc.players.retain(|p| p != player);
        Ok(())
    }

    async fn set_user_nickname(
        &self,
        id: &PlayerId,
        nickname: &str,
    ) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let doc =
            users
                .get_mut(id)
                .ok_or_else(|| StoreError::MissingDocument {
                    kind: "user",
                    id: id.to_string(),
                })?;
        doc.nickname = nickname.to_owned();
        Ok(())
    }
}

/// Mints a random 16-character hex document id (64 bits of entropy).
fn mint_id() -> String {
    let bytes: [u8; 8] = rand::rng().random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

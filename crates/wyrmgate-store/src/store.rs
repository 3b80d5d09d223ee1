//! The document-store trait consumed by the combat core.

use std::future::Future;

use wyrmgate_protocol::{EntityDefinition, LobbyId, PlayerId, PresetId};

use crate::{Lobby, StoreError, StoredPreset, User};

/// Read and field-level-update access to the game's document store.
///
/// Every method returning an `Option` treats absence as a normal outcome,
/// not an error; callers decide whether a missing document is fatal for
/// their operation. All futures are `Send` so implementations can be shared
/// across connection tasks.
///
/// Production implementations talk to the real document store; tests and
/// local development use [`MemoryStore`](crate::MemoryStore).
pub trait Store: Send + Sync + 'static {
    /// Looks up a user by id.
    fn get_user(
        &self,
        id: &PlayerId,
    ) -> impl Future<Output = Result<Option<User>, StoreError>> + Send;

    /// Looks up a user by their unique login handle.
    fn get_user_by_handle(
        &self,
        handle: &str,
    ) -> impl Future<Output = Result<Option<User>, StoreError>> + Send;

    /// Looks up a lobby by id.
    fn get_lobby(
        &self,
        id: &LobbyId,
    ) -> impl Future<Output = Result<Option<Lobby>, StoreError>> + Send;

    /// Looks up an entity definition by its content path.
    fn get_entity(
        &self,
        path: &str,
    ) -> impl Future<Output = Result<Option<EntityDefinition>, StoreError>> + Send;

    /// Looks up a stored combat preset by id.
    fn get_combat_preset(
        &self,
        id: &PresetId,
    ) -> impl Future<Output = Result<Option<StoredPreset>, StoreError>> + Send;

    /// Appends a player to a lobby's member list. No-op if already present.
    fn add_lobby_player(
        &self,
        lobby: &LobbyId,
        player: &PlayerId,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Removes a player from a lobby's member list. No-op if absent.
    fn remove_lobby_player(
        &self,
        lobby: &LobbyId,
        player: &PlayerId,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Replaces a user's display nickname.
    fn set_user_nickname(
        &self,
        id: &PlayerId,
        nickname: &str,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

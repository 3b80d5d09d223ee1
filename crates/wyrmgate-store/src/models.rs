//! Document shapes held by the store.
//!
//! These mirror what the document store persists. Only the fields the combat
//! core reads are modeled; rendering data, friend lists, and the rest of the
//! account surface live with their own services.

use wyrmgate_protocol::{LobbyId, PawnPlacement, PlayerId, PresetId};

/// A player account document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: PlayerId,
    /// Unique login handle.
    pub handle: String,
    /// Display name shown to other players; players can change it.
    pub nickname: String,
}

/// A lobby document: a group of players under one organizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lobby {
    pub id: LobbyId,
    pub name: String,
    /// The organizer ("game master"); allowed to spin up combats.
    pub gm_id: PlayerId,
    /// Current members, in join order.
    pub players: Vec<PlayerId>,
}

/// A battlefield preset persisted for reuse across encounters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPreset {
    pub id: PresetId,
    pub pawns: Vec<PawnPlacement>,
}

//! Battlefield presets: the raw inputs a combat is requested with and the
//! cooked seed a session actually starts from.
//!
//! A *preset* describes the initial battlefield: which entity stands on which
//! square and who controls it. Presets arrive either as an identifier into
//! the preset store (`importable`) or inline with the request (`requested`);
//! cooking validates and resolves both into the same [`BattlefieldSeed`]
//! shape.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{PlayerId, PresetId, Square};

// ---------------------------------------------------------------------------
// Control
// ---------------------------------------------------------------------------

/// Who may issue actions for a pawn during an encounter.
///
/// Serialized with a `type` tag:
/// `{"type":"player","id":"p1"}`, `{"type":"ai","id":"g1"}`,
/// `{"type":"game_logic"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlInfo {
    /// A player seat. `id` is `None` for a seat nobody has claimed yet.
    Player { id: Option<PlayerId> },

    /// An AI profile drives this pawn.
    Ai { id: String },

    /// Scripted encounter logic drives this pawn (traps, hazards, scenery).
    GameLogic,
}

impl ControlInfo {
    /// Returns `true` if `player` is authorized to act for a pawn under
    /// this control.
    pub fn grants(&self, player: &PlayerId) -> bool {
        matches!(self, Self::Player { id: Some(p) } if p == player)
    }
}

// ---------------------------------------------------------------------------
// Raw presets
// ---------------------------------------------------------------------------

/// Where an entity definition lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntitySource {
    /// Defined in the entity store; must resolve while cooking.
    Embedded,
    /// Ships with client content; the server holds no definition for it.
    Dlc,
}

/// One pawn of a raw (uncooked) preset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PawnPlacement {
    /// The square this pawn claims.
    pub square: Square,
    /// Entity path, e.g. `"goblin"`; the lookup key for embedded entities.
    pub path: String,
    /// Where the entity definition comes from.
    pub source: EntitySource,
    /// Who controls the pawn.
    pub controlled_by: ControlInfo,
}

/// An inline battlefield submitted with a create-combat request.
///
/// Placements are a list, not a square-keyed map: duplicate squares must
/// reach validation intact, and a JSON object would collapse them during
/// parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedPreset {
    pub pawns: Vec<PawnPlacement>,
}

/// Selects where the battlefield for a new combat comes from.
///
/// Tagged by `mode` on the wire; an unknown mode fails deserialization with
/// an error naming the offending value, before any of it reaches the cooking
/// pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PresetSource {
    /// A preset persisted in the store: `{"mode":"importable","id":"…"}`.
    Importable { id: PresetId },
    /// A preset supplied inline: `{"mode":"requested","pawns":[…]}`.
    Requested(RequestedPreset),
}

// ---------------------------------------------------------------------------
// Cooked seed
// ---------------------------------------------------------------------------

/// A full entity definition document (stats, abilities, visuals).
///
/// The content schema belongs to the game-data pipeline; the backend carries
/// it opaquely and compares it only for equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityDefinition(pub serde_json::Value);

/// Reference to the entity a cooked pawn instantiates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub source: EntitySource,
    pub name: String,
}

/// A pawn slotted onto the cooked battlefield.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CookedPawn {
    pub entity_preset: EntityRef,
    pub owner: ControlInfo,
}

/// The validated battlefield a combat session starts from.
///
/// Invariants, enforced at cook time: every square holds at most one pawn,
/// and every `embedded` pawn's `name` has a matching entry in
/// `custom_entities`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BattlefieldSeed {
    /// Pawns keyed by the square they occupy.
    pub field_pawns: HashMap<Square, CookedPawn>,
    /// Resolved entity definitions for embedded pawns, keyed by entity path.
    pub custom_entities: HashMap<String, EntityDefinition>,
}

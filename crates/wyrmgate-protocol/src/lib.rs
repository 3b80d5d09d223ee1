//! Wire protocol and shared data model for Wyrmgate.
//!
//! This crate defines the "language" spoken between game clients, the combat
//! server, and its collaborators:
//!
//! - **Identifiers** ([`PlayerId`], [`SessionId`], [`LobbyId`], …) — opaque
//!   string newtypes used to address documents and sessions.
//! - **Battlefield model** ([`PresetSource`], [`BattlefieldSeed`],
//!   [`ControlInfo`], …) — raw preset inputs and the cooked seed a combat
//!   session starts from.
//! - **Socket frames** ([`ClientFrame`], [`ServerFrame`], [`CombatAction`],
//!   [`CombatEvent`]) — everything that travels over a live connection.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how frames become bytes.
//!
//! The protocol layer knows nothing about connections, storage, or sessions;
//! it only defines shapes and their serialized form.

mod battlefield;
mod codec;
mod error;
mod frames;
mod ids;

pub use battlefield::{
    BattlefieldSeed, ControlInfo, CookedPawn, EntityDefinition, EntityRef,
    EntitySource, PawnPlacement, PresetSource, RequestedPreset,
};
pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use frames::{
    AttachRequest, ClientFrame, CombatAction, CombatEvent, CombatSnapshot,
    ServerFrame,
};
pub use ids::{LobbyId, PlayerId, PresetId, SessionId, Square};

//! Socket frames: everything that travels over a live combat connection.
//!
//! A connection speaks in two directions:
//!
//! - [`ClientFrame`] — what a client may send: an [`AttachRequest`] to be
//!   admitted, then [`CombatAction`]s for the session it is attached to.
//! - [`ServerFrame`] — what the server sends back: the admission verdict
//!   and a stream of [`CombatEvent`]s.
//!
//! Frames are adjacently tagged (`{"type":…,"data":…}`) so the connection
//! handler can tell frame kinds apart without touching the inner payload;
//! events and actions are internally tagged because their variants are flat
//! structs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{CookedPawn, PlayerId, SessionId, Square};

// ---------------------------------------------------------------------------
// Client → server
// ---------------------------------------------------------------------------

/// The first frame a client sends: which session it wants and who it claims
/// to be.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachRequest {
    pub session_id: SessionId,
    pub access_token: String,
}

/// An action an admitted participant issues against its session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CombatAction {
    /// Game master only: begin the encounter.
    Start,
    /// Move a pawn the issuer controls to a free square.
    Move { pawn: Square, to: Square },
    /// Finish the issuer's turn.
    EndTurn,
    /// Game master only: end (or cancel) the encounter.
    End,
}

/// Everything a client may put on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ClientFrame {
    /// Request admission of this connection to a session.
    Attach(AttachRequest),
    /// An in-combat action; only meaningful after admission.
    Action(CombatAction),
}

// ---------------------------------------------------------------------------
// Server → client
// ---------------------------------------------------------------------------

/// A snapshot of session state, sent to a connection right after it attaches
/// so reconnecting clients can rebuild their view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatSnapshot {
    pub nickname: String,
    pub active: bool,
    pub round: u32,
    /// Whose turn it is; `None` while the encounter is pending or finished.
    pub current_turn: Option<PlayerId>,
    pub connected: Vec<PlayerId>,
    pub field_pawns: HashMap<Square, CookedPawn>,
}

/// Events the session pushes to its attached connections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CombatEvent {
    /// Full state for a freshly attached connection.
    Snapshot(CombatSnapshot),
    /// A participant's connection attached.
    PlayerAttached { player: PlayerId },
    /// A participant's connection went away; they may come back.
    PlayerDetached { player: PlayerId },
    /// The game master started the encounter.
    CombatStarted,
    /// A pawn moved.
    PawnMoved { from: Square, to: Square },
    /// A participant finished their turn.
    TurnEnded { player: PlayerId, next: PlayerId },
    /// A full round of turns completed.
    RoundAdvanced { round: u32 },
    /// The encounter is over; the session is being torn down.
    CombatEnded,
    /// The issuer's last action was refused. Sent only to the offender.
    ActionRejected { reason: String },
}

/// Everything the server may put on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ServerFrame {
    /// Admission refused: the access token did not verify. Always followed
    /// by the server closing the connection.
    InvalidToken,
    /// Admission succeeded; events for this session follow.
    Attached { session_id: SessionId },
    /// A session event.
    Event(CombatEvent),
}

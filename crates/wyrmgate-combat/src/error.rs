//! Error types for the combat core.

use wyrmgate_protocol::{PlayerId, PresetId, SessionId, Square};
use wyrmgate_store::StoreError;

/// Errors from cooking a battlefield preset.
#[derive(Debug, thiserror::Error)]
pub enum CookError {
    /// Two pawns in the same preset claim the same square. The preset is
    /// malformed; no partial seed is produced.
    #[error("two pawns claim square {0}")]
    DuplicateSquare(Square),

    /// The preset identifier doesn't resolve in the preset store.
    #[error("combat preset {0} not found")]
    PresetNotFound(PresetId),

    /// An embedded pawn references an entity the store doesn't hold. An
    /// encounter cannot start with a dangling pawn.
    #[error("entity definition \"{0}\" not found")]
    EntityNotFound(String),

    /// The store itself failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors from session and registry operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No session with this identifier exists in the registry.
    #[error("combat session {0} not found")]
    NotFound(SessionId),

    /// The session's actor has stopped: it finished and is being torn
    /// down, or was torn down already. Callers treat this like absence.
    #[error("combat session {0} is gone")]
    SessionGone(SessionId),

    /// The player is neither on the roster nor the game master.
    #[error("player {0} is not part of this encounter")]
    NotInRoster(PlayerId),

    /// The player already has a live connection attached to this session.
    #[error("player {0} already has a live connection")]
    AlreadyAttached(PlayerId),
}

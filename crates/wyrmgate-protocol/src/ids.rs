//! Identifier newtypes shared across the backend.
//!
//! Every collaborator (document store, token verifier, lobby layer) addresses
//! things by opaque string identifiers, so these are string-backed newtypes
//! rather than integers. Wrapping them keeps a `LobbyId` from being passed
//! where a `PlayerId` is expected, at zero runtime cost.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Declares a string-backed identifier newtype.
///
/// `#[serde(transparent)]` keeps the wire form a plain JSON string, so
/// `PlayerId("p1")` serializes as `"p1"`, not `{"0":"p1"}`.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord,
            Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Wraps a raw identifier string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id! {
    /// A unique identifier for a player (the user document id).
    PlayerId
}

string_id! {
    /// A unique identifier for a lobby.
    LobbyId
}

string_id! {
    /// A unique identifier for a stored combat preset.
    PresetId
}

string_id! {
    /// A unique identifier for one running combat session.
    ///
    /// Minted by the combat registry from a monotonically increasing counter
    /// and never reused for the registry's lifetime, even after the session
    /// it named is gone.
    SessionId
}

string_id! {
    /// A battlefield coordinate, e.g. `"A1"`.
    ///
    /// Opaque to the backend: the grid shape and addressing scheme belong to
    /// the game content, not the orchestration layer.
    Square
}

impl SessionId {
    /// Renders a registry counter value as a session identifier.
    pub fn from_counter(counter: u64) -> Self {
        Self(counter.to_string())
    }
}

//! # Wyrmgate
//!
//! Backend for a turn-based multiplayer RPG: players gather in lobbies, a
//! lobby's game master spins up concurrent combat encounters, and connected
//! players drive an encounter in real time over WebSockets.
//!
//! This crate assembles the layers into a runnable server:
//!
//! - [`LobbyService`] — creates combats for a lobby (cooking the battlefield
//!   preset on the way in), tracks which sessions belong to which lobby, and
//!   aggregates the lobby-screen overview.
//! - [`AdmissionController`] — the socket entry point: resolves the target
//!   session, verifies the access token, enforces one live connection per
//!   player, and pumps frames for admitted connections.
//! - [`WyrmgateServer`] — binds the WebSocket listener and spawns a task per
//!   incoming connection.
//!
//! Storage and token verification are injected behind the
//! [`wyrmgate_store::Store`] and [`wyrmgate_store::TokenVerifier`] traits.

mod admission;
mod error;
mod lobby;
mod server;

pub use admission::AdmissionController;
pub use error::WyrmgateError;
pub use lobby::{CombatOverview, LobbyError, LobbyService};
pub use server::{WyrmgateServer, WyrmgateServerBuilder};

//! Combat session orchestration for Wyrmgate.
//!
//! This crate is the heart of the backend: it owns every running combat
//! encounter and the pipeline that prepares one.
//!
//! - [`cook`] — validates a raw battlefield preset and resolves its entity
//!   references into a ready-to-run seed.
//! - [`CombatRegistry`] — mints session identifiers, spawns session actors,
//!   and indexes their handles for lookup.
//! - [`SessionHandle`] — the addressable face of one running session; each
//!   session is an isolated Tokio task that owns its state and processes
//!   commands in arrival order.
//! - [`SessionEvent`] — lifecycle notifications (a session ended) consumed
//!   by whoever assembled the registry, so registry and any derived indexes
//!   stay consistent.
//!
//! Sessions are independent: no lock or channel spans two of them, so a
//! failure inside one encounter can never stall another.

mod cook;
mod error;
mod events;
mod registry;
mod session;

pub use cook::cook;
pub use error::{CookError, SessionError};
pub use events::{
    SessionEvent, SessionEventReceiver, SessionEventSender,
    session_event_channel,
};
pub use registry::CombatRegistry;
pub use session::{PlayerSender, SessionHandle, SessionInfo, SessionStatus};

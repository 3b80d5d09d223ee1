//! Storage and authentication collaborators for Wyrmgate.
//!
//! The combat core doesn't own persistence or token issuance. Those are
//! external services reached through two trait seams:
//!
//! 1. **Document store** ([`Store`]) — users, lobbies, entity definitions,
//!    and combat presets, addressed by opaque string identifiers. Reads
//!    return `Ok(None)` for absence; only backend failures are errors.
//! 2. **Token verification** ([`TokenVerifier`]) — a black-box
//!    `verify(token) -> player` operation.
//!
//! Both come with in-memory implementations ([`MemoryStore`],
//! [`StaticTokens`]) used for local development and throughout the test
//! suites, so production backends, dev fixtures, and mocks interchange
//! without touching the core.

#![allow(async_fn_in_trait)]

mod auth;
mod error;
mod memory;
mod models;
mod store;

pub use auth::{StaticTokens, TokenVerifier};
pub use error::{AuthError, StoreError};
pub use memory::MemoryStore;
pub use models::{Lobby, StoredPreset, User};
pub use store::Store;

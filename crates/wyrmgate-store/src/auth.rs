//! Token verification hook for establishing player identity.
//!
//! Wyrmgate doesn't issue or validate credentials itself; token issuance
//! lives with the account service. The socket layer only needs one
//! operation: given the access token a connection presented, whose
//! connection is this? [`TokenVerifier`] is that seam. Production wires in
//! the real verifier; tests and local runs use [`StaticTokens`].

use std::collections::HashMap;
use std::future::Future;

use wyrmgate_protocol::PlayerId;

use crate::AuthError;

/// Verifies an access token and resolves the player it was issued to.
///
/// `Send + Sync + 'static` so one verifier can be shared across every
/// connection task.
pub trait TokenVerifier: Send + Sync + 'static {
    /// Verifies the given token.
    ///
    /// # Returns
    /// - `Ok(PlayerId)` — the token's subject
    /// - `Err(AuthError::InvalidToken)` — invalid, expired, or unknown
    fn verify(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<PlayerId, AuthError>> + Send;
}

/// A [`TokenVerifier`] over a fixed token table.
///
/// For local development and tests only; real deployments verify signed
/// tokens against the account service.
#[derive(Debug, Default)]
pub struct StaticTokens {
    tokens: HashMap<String, PlayerId>,
}

impl StaticTokens {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `token` as belonging to `player`.
    pub fn insert(
        &mut self,
        token: impl Into<String>,
        player: PlayerId,
    ) -> &mut Self {
        self.tokens.insert(token.into(), player);
        self
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with(mut self, token: impl Into<String>, player: PlayerId) -> Self {
        self.tokens.insert(token.into(), player);
        self
    }
}

impl TokenVerifier for StaticTokens {
    async fn verify(&self, token: &str) -> Result<PlayerId, AuthError> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

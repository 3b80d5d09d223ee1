//! Error types for the collaborator seams.

/// Errors from the document store.
///
/// Absence is not an error for reads: `get_*` operations return
/// `Ok(None)`. Updates against a missing document and backend failures are.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A field-level update addressed a document that doesn't exist.
    #[error("no such {kind}: {id}")]
    MissingDocument {
        kind: &'static str,
        id: String,
    },

    /// The storage backend failed. Logged and surfaced opaquely; retry
    /// policy, if any, belongs to the backend itself.
    #[error("storage backend failure: {0}")]
    Internal(String),
}

/// Errors from token verification.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The token is invalid, expired, or was not issued by us.
    #[error("invalid or expired access token")]
    InvalidToken,
}

//! Error types for the protocol layer.
//!
//! Each Wyrmgate crate defines its own error enum; a `ProtocolError` always
//! means the problem is in serialization or frame shape, not in networking
//! or session management.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, missing fields, unknown
    /// tags, or truncated input. Always a client fault.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The frame parsed but violates protocol rules — e.g. an action frame
    /// from a connection that never attached.
    #[error("invalid frame: {0}")]
    InvalidFrame(String),
}

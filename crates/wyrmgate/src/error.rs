//! Unified error type for the assembled server.

use wyrmgate_combat::{CookError, SessionError};
use wyrmgate_protocol::ProtocolError;
use wyrmgate_store::{AuthError, StoreError};
use wyrmgate_transport::TransportError;

/// Top-level error wrapping every layer's error type.
///
/// The `#[from]` attributes generate the `From` impls, so `?` converts
/// layer errors automatically wherever the layers are composed.
#[derive(Debug, thiserror::Error)]
pub enum WyrmgateError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid frame).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session or registry error.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A preset cooking error.
    #[error(transparent)]
    Cook(#[from] CookError),

    /// A document store error.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A token verification error.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

//! Socket admission: the entry point for connections attaching to a combat.
//!
//! The protocol, in fixed order:
//!
//! 1. Resolve the session id. An unknown session means disconnect, nothing
//!    else.
//! 2. Verify the access token. Failure sends the `invalid_token` frame,
//!    then disconnects; the attach operation is never reached.
//! 3. Check for an existing live connection. A player gets at most one
//!    connection per session, so a second tab can't hijack a turn.
//! 4. Attach, then pump frames until the socket closes, then detach so a
//!    reconnect for the same player succeeds.
//!
//! Every rejection path ends by closing the raw connection; no connection is
//! left half-admitted.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use wyrmgate_combat::{CombatRegistry, SessionHandle};
use wyrmgate_protocol::{
    ClientFrame, Codec, CombatEvent, JsonCodec, PlayerId, ServerFrame,
    SessionId,
};
use wyrmgate_store::TokenVerifier;
use wyrmgate_transport::Connection;

/// Admits connections into combat sessions.
///
/// Cloneable; one controller serves every connection task.
pub struct AdmissionController<V> {
    registry: Arc<Mutex<CombatRegistry>>,
    verifier: Arc<V>,
    codec: JsonCodec,
}

impl<V> Clone for AdmissionController<V> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            verifier: Arc::clone(&self.verifier),
            codec: self.codec,
        }
    }
}

impl<V: TokenVerifier> AdmissionController<V> {
    /// Creates a controller over a shared registry and verifier.
    pub fn new(registry: Arc<Mutex<CombatRegistry>>, verifier: Arc<V>) -> Self {
        Self {
            registry,
            verifier,
            codec: JsonCodec,
        }
    }

    /// Runs the admission protocol for one connection and, if admitted,
    /// serves it until the socket closes.
    ///
    /// Rejections are normal outcomes, not errors: the connection is told
    /// what it needs to know (nothing, for most refusals) and closed.
    pub async fn admit<C: Connection>(
        &self,
        conn: C,
        session_id: SessionId,
        access_token: &str,
    ) {
        let conn_id = conn.id();

        // Step 1: resolve the session.
        let Some(handle) = self.registry.lock().await.get(&session_id) else {
            tracing::debug!(%conn_id, %session_id, "unknown session, disconnecting");
            let _ = conn.close().await;
            return;
        };

        // Step 2: verify the token. Always before the duplicate check and
        // attach.
        let player = match self.verifier.verify(access_token).await {
            Ok(player) => player,
            Err(_) => {
                tracing::info!(%conn_id, %session_id, "invalid token, disconnecting");
                self.send(&conn, &ServerFrame::InvalidToken).await;
                let _ = conn.close().await;
                return;
            }
        };

        // Step 3: at most one live connection per player per session. The
        // actor re-checks on attach, so a race between two admissions still
        // admits exactly one.
        match handle.is_player_in_combat(player.clone()).await {
            Ok(false) => {}
            Ok(true) => {
                tracing::info!(
                    %conn_id, %session_id, %player,
                    "player already connected, disconnecting"
                );
                let _ = conn.close().await;
                return;
            }
            Err(_) => {
                // Session ended while we were verifying.
                let _ = conn.close().await;
                return;
            }
        }

        // Step 4: attach and serve.
        let (sender, outbound) = mpsc::unbounded_channel();
        if let Err(e) = handle.attach(player.clone(), sender).await {
            tracing::info!(%conn_id, %session_id, %player, error = %e, "attach refused");
            let _ = conn.close().await;
            return;
        }

        tracing::info!(%conn_id, %session_id, %player, "connection admitted");
        self.send(
            &conn,
            &ServerFrame::Attached {
                session_id: session_id.clone(),
            },
        )
        .await;

        self.serve(&conn, &handle, &player, outbound).await;

        // Release the slot so this player can reconnect, then close.
        let _ = handle.detach(player.clone()).await;
        let _ = conn.close().await;
        tracing::info!(%conn_id, %session_id, %player, "connection closed");
    }

    /// Pumps an admitted connection: session events out, client actions in,
    /// until either side goes away.
    async fn serve<C: Connection>(
        &self,
        conn: &C,
        handle: &SessionHandle,
        player: &PlayerId,
        mut outbound: mpsc::UnboundedReceiver<CombatEvent>,
    ) {
        loop {
            tokio::select! {
                event = outbound.recv() => {
                    let Some(event) = event else {
                        // The session actor is gone (encounter ended).
                        break;
                    };
                    let frame = ServerFrame::Event(event);
                    let Ok(bytes) = self.codec.encode(&frame) else { break };
                    if conn.send(&bytes).await.is_err() {
                        break;
                    }
                }

                frame = conn.recv() => {
                    let data = match frame {
                        Ok(Some(data)) => data,
                        Ok(None) => break,
                        Err(e) => {
                            tracing::debug!(%player, error = %e, "recv error");
                            break;
                        }
                    };
                    match self.codec.decode::<ClientFrame>(&data) {
                        Ok(ClientFrame::Action(action)) => {
                            if handle
                                .action(player.clone(), action)
                                .await
                                .is_err()
                            {
                                break;
                            }
                        }
                        Ok(ClientFrame::Attach(_)) => {
                            tracing::debug!(
                                %player,
                                "attach frame on admitted connection, ignoring"
                            );
                        }
                        Err(e) => {
                            // A malformed frame is the client's problem,
                            // not a reason to drop the connection.
                            tracing::debug!(%player, error = %e, "undecodable frame");
                        }
                    }
                }
            }
        }
    }

    /// Best-effort frame send; admission verdicts must not fail the server.
    async fn send<C: Connection>(&self, conn: &C, frame: &ServerFrame) {
        if let Ok(bytes) = self.codec.encode(frame) {
            let _ = conn.send(&bytes).await;
        }
    }
}

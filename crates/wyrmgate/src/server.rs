//! `WyrmgateServer`: binds the listener and ties the layers together.

use std::sync::Arc;
use std::time::Duration;

use wyrmgate_protocol::{ClientFrame, Codec, JsonCodec};
use wyrmgate_store::{Store, TokenVerifier};
use wyrmgate_transport::{Connection, WebSocketListener};

use crate::{AdmissionController, LobbyService, WyrmgateError};

/// How long a fresh connection has to send its attach frame.
const ATTACH_TIMEOUT: Duration = Duration::from_secs(5);

/// Builder for configuring and starting a Wyrmgate server.
pub struct WyrmgateServerBuilder {
    bind_addr: String,
}

impl WyrmgateServerBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8443".to_string(),
        }
    }

    /// Sets the address to bind the listener to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Binds the listener and assembles the server around the given
    /// collaborators.
    pub async fn build<S: Store, V: TokenVerifier>(
        self,
        store: Arc<S>,
        verifier: V,
    ) -> Result<WyrmgateServer<S, V>, WyrmgateError> {
        let listener = WebSocketListener::bind(&self.bind_addr).await?;
        let lobby = LobbyService::new(store);
        let admission =
            AdmissionController::new(lobby.registry(), Arc::new(verifier));

        Ok(WyrmgateServer {
            listener,
            lobby,
            admission,
        })
    }
}

impl Default for WyrmgateServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Wyrmgate server.
pub struct WyrmgateServer<S, V> {
    listener: WebSocketListener,
    lobby: LobbyService<S>,
    admission: AdmissionController<V>,
}

impl<S: Store, V: TokenVerifier> WyrmgateServer<S, V> {
    /// Creates a new builder.
    pub fn builder() -> WyrmgateServerBuilder {
        WyrmgateServerBuilder::new()
    }

    /// The lobby-facing service (create combats, enumerate, aggregate).
    pub fn lobby(&self) -> LobbyService<S> {
        self.lobby.clone()
    }

    /// Returns the local address the listener is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the accept loop: one task per incoming connection. Runs until
    /// the process is terminated.
    pub async fn run(self) -> Result<(), WyrmgateError> {
        tracing::info!("wyrmgate server running");

        loop {
            match self.listener.accept().await {
                Ok(conn) => {
                    let admission = self.admission.clone();
                    tokio::spawn(async move {
                        handle_socket(conn, admission).await;
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}

/// Reads the attach frame off a fresh connection and hands it to admission.
///
/// Anything other than a well-formed attach frame within the deadline
/// (silence, garbage, or an action before admission) closes the connection.
async fn handle_socket<C: Connection, V: TokenVerifier>(
    conn: C,
    admission: AdmissionController<V>,
) {
    let conn_id = conn.id();

    let data =
        match tokio::time::timeout(ATTACH_TIMEOUT, conn.recv()).await {
            Ok(Ok(Some(data))) => data,
            Ok(Ok(None)) => return,
            Ok(Err(e)) => {
                tracing::debug!(%conn_id, error = %e, "recv before attach failed");
                return;
            }
            Err(_) => {
                tracing::debug!(%conn_id, "attach deadline expired");
                let _ = conn.close().await;
                return;
            }
        };

    match JsonCodec.decode::<ClientFrame>(&data) {
        Ok(ClientFrame::Attach(request)) => {
            admission
                .admit(conn, request.session_id, &request.access_token)
                .await;
        }
        Ok(ClientFrame::Action(_)) => {
            tracing::debug!(%conn_id, "action before attach, disconnecting");
            let _ = conn.close().await;
        }
        Err(e) => {
            tracing::debug!(%conn_id, error = %e, "undecodable first frame");
            let _ = conn.close().await;
        }
    }
}

//! Local development server with in-memory collaborators.
//!
//! Seeds a couple of accounts and a lobby so a client can exercise the full
//! flow straight away. Tokens are static (`tok-<handle>`); real deployments
//! replace [`StaticTokens`] and [`MemoryStore`] with the production
//! verifier and document store.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use wyrmgate::WyrmgateServer;
use wyrmgate_protocol::{
    ControlInfo, EntityDefinition, EntitySource, PawnPlacement, PresetSource,
    RequestedPreset, Square,
};
use wyrmgate_store::{MemoryStore, StaticTokens, Store};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let store = Arc::new(MemoryStore::new());

    let gm = store.create_user("gm", "Game Master").await;
    let alice = store.create_user("alice", "Alice").await;
    let lobby = store.create_lobby("Dev Lobby", gm.id.clone()).await;
    store.add_lobby_player(&lobby.id, &alice.id).await?;
    store
        .put_entity(
            "goblin",
            EntityDefinition(serde_json::json!({
                "name": "Goblin", "hp": 7, "speed": 6
            })),
        )
        .await;

    let verifier = StaticTokens::new()
        .with("tok-gm", gm.id.clone())
        .with("tok-alice", alice.id.clone());

    let server = WyrmgateServer::<MemoryStore, StaticTokens>::builder()
        .bind("127.0.0.1:8443")
        .build(Arc::clone(&store), verifier)
        .await?;

    // One ready-to-join encounter so clients have something to attach to.
    let session_id = server
        .lobby()
        .create_combat(
            &lobby.id,
            "Dev Skirmish",
            PresetSource::Requested(RequestedPreset {
                pawns: vec![PawnPlacement {
                    square: Square::new("A1"),
                    path: "goblin".into(),
                    source: EntitySource::Embedded,
                    controlled_by: ControlInfo::Player {
                        id: Some(alice.id.clone()),
                    },
                }],
            }),
            gm.id.clone(),
            vec![alice.id.clone()],
        )
        .await?;

    tracing::info!(
        %session_id,
        lobby_id = %lobby.id,
        "dev combat ready; attach with tok-gm or tok-alice"
    );

    server.run().await?;
    Ok(())
}

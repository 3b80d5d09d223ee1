//! Integration tests for the lobby-facing service: combat creation, the
//! per-lobby index, and the overview aggregation.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;
use wyrmgate::{LobbyError, LobbyService};
use wyrmgate_combat::CookError;
use wyrmgate_protocol::{
    CombatAction, ControlInfo, EntityDefinition, EntitySource, LobbyId,
    PawnPlacement, PlayerId, PresetSource, RequestedPreset, Square,
};
use wyrmgate_store::{Lobby, MemoryStore, User};

// =========================================================================
// Fixtures
// =========================================================================

fn pid(id: &str) -> PlayerId {
    PlayerId::new(id)
}

fn user(id: &str, nickname: &str) -> User {
    User {
        id: pid(id),
        handle: id.to_string(),
        nickname: nickname.to_string(),
    }
}

/// Store with lobby "lobby1": GM "gm", players "p1" and "p2", plus a
/// goblin entity definition.
async fn seeded_store() -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    store.put_user(user("gm", "The GM")).await;
    store.put_user(user("p1", "Alice")).await;
    store.put_user(user("p2", "Bob")).await;
    store
        .put_lobby(Lobby {
            id: LobbyId::new("lobby1"),
            name: "Friday Night".into(),
            gm_id: pid("gm"),
            players: vec![pid("gm"), pid("p1"), pid("p2")],
        })
        .await;
    store
        .put_entity(
            "goblin",
            EntityDefinition(serde_json::json!({"hp": 7})),
        )
        .await;
    Arc::new(store)
}

fn goblin_preset() -> PresetSource {
    PresetSource::Requested(RequestedPreset {
        pawns: vec![PawnPlacement {
            square: Square::new("A1"),
            path: "goblin".into(),
            source: EntitySource::Embedded,
            controlled_by: ControlInfo::Player { id: Some(pid("p1")) },
        }],
    })
}

fn lobby1() -> LobbyId {
    LobbyId::new("lobby1")
}

async fn create_boss_fight(
    service: &LobbyService<MemoryStore>,
) -> wyrmgate_protocol::SessionId {
    service
        .create_combat(
            &lobby1(),
            "Boss Fight",
            goblin_preset(),
            pid("gm"),
            vec![pid("p1"), pid("p2")],
        )
        .await
        .expect("create_combat")
}

/// Polls `cond` until it holds or a second passes.
async fn eventually<F, Fut>(cond: F)
where
    F: Fn() -> Fut,
    Fut: Future<Output = bool>,
{
    for _ in 0..100 {
        if cond().await {
            return;
        }
        sleep(Duration::from_millis(10)).await;
    }
    panic!("condition did not hold within the deadline");
}

// =========================================================================
// Creation and indexing
// =========================================================================

#[tokio::test]
async fn test_create_combat_indexes_session_under_lobby() {
    let service = LobbyService::new(seeded_store().await);

    let id = create_boss_fight(&service).await;

    assert_eq!(service.active_combats(&lobby1()).await, vec![id.clone()]);
    let handle = service.registry().lock().await.get(&id).expect("resolvable");
    let info = handle.info().await.unwrap();
    assert_eq!(info.round_count, 0);
    assert!(!info.is_active());
}

#[tokio::test]
async fn test_create_combat_unknown_lobby_fails() {
    let service = LobbyService::new(seeded_store().await);

    let result = service
        .create_combat(
            &LobbyId::new("ghost"),
            "Nope",
            goblin_preset(),
            pid("gm"),
            vec![],
        )
        .await;

    assert!(matches!(result, Err(LobbyError::LobbyNotFound(_))));
    assert!(service.active_combats(&LobbyId::new("ghost")).await.is_empty());
}

#[tokio::test]
async fn test_create_combat_uncookable_preset_creates_nothing() {
    let service = LobbyService::new(seeded_store().await);
    let doubled = PresetSource::Requested(RequestedPreset {
        pawns: vec![
            PawnPlacement {
                square: Square::new("B2"),
                path: "goblin".into(),
                source: EntitySource::Embedded,
                controlled_by: ControlInfo::GameLogic,
            },
            PawnPlacement {
                square: Square::new("B2"),
                path: "goblin".into(),
                source: EntitySource::Embedded,
                controlled_by: ControlInfo::GameLogic,
            },
        ],
    });

    let result = service
        .create_combat(&lobby1(), "Bad", doubled, pid("gm"), vec![])
        .await;

    assert!(matches!(
        result,
        Err(LobbyError::Cook(CookError::DuplicateSquare(_)))
    ));
    assert!(service.active_combats(&lobby1()).await.is_empty());
    assert!(service.registry().lock().await.is_empty());
}

#[tokio::test]
async fn test_combats_are_listed_in_creation_order() {
    let service = LobbyService::new(seeded_store().await);

    let first = create_boss_fight(&service).await;
    let second = create_boss_fight(&service).await;

    assert_eq!(
        service.active_combats(&lobby1()).await,
        vec![first, second]
    );
}

// =========================================================================
// Teardown consistency
// =========================================================================

#[tokio::test]
async fn test_ended_session_leaves_registry_and_index() {
    let service = LobbyService::new(seeded_store().await);
    let id = create_boss_fight(&service).await;
    let handle = service.registry().lock().await.get(&id).unwrap();

    // The GM connects and immediately calls the whole thing off.
    let (tx, _rx) = mpsc::unbounded_channel();
    handle.attach(pid("gm"), tx).await.unwrap();
    handle.action(pid("gm"), CombatAction::End).await.unwrap();

    let registry = service.registry();
    eventually(|| {
        let registry = Arc::clone(&registry);
        let id = id.clone();
        async move { registry.lock().await.get(&id).is_none() }
    })
    .await;
    // Registry removal happens first, so once the id stopped resolving the
    // index prune is at most one step behind.
    eventually(|| {
        let service = service.clone();
        async move { service.active_combats(&lobby1()).await.is_empty() }
    })
    .await;
}

#[tokio::test]
async fn test_other_sessions_survive_a_teardown() {
    let service = LobbyService::new(seeded_store().await);
    let doomed = create_boss_fight(&service).await;
    let kept = create_boss_fight(&service).await;

    let handle = service.registry().lock().await.get(&doomed).unwrap();
    let (tx, _rx) = mpsc::unbounded_channel();
    handle.attach(pid("gm"), tx).await.unwrap();
    handle.action(pid("gm"), CombatAction::End).await.unwrap();

    let service2 = service.clone();
    let kept2 = kept.clone();
    eventually(move || {
        let service = service2.clone();
        let kept = kept2.clone();
        async move {
            service.active_combats(&lobby1()).await == vec![kept.clone()]
        }
    })
    .await;
    assert!(service.registry().lock().await.get(&kept).is_some());
}

// =========================================================================
// Overview aggregation
// =========================================================================

#[tokio::test]
async fn test_overview_reports_connected_nicknames_and_rounds() {
    let service = LobbyService::new(seeded_store().await);
    let id = create_boss_fight(&service).await;
    let handle = service.registry().lock().await.get(&id).unwrap();

    let (gm_tx, _gm_rx) = mpsc::unbounded_channel();
    let (p1_tx, _p1_rx) = mpsc::unbounded_channel();
    handle.attach(pid("gm"), gm_tx).await.unwrap();
    handle.attach(pid("p1"), p1_tx).await.unwrap();
    handle.action(pid("gm"), CombatAction::Start).await.unwrap();

    let overview = service.combat_overview(&lobby1()).await.unwrap();

    assert_eq!(overview.len(), 1);
    let row = &overview[0];
    assert_eq!(row.session_id, id);
    assert_eq!(row.nickname, "Boss Fight");
    assert!(row.active);
    assert_eq!(row.round_count, 0);
    assert_eq!(row.connected, vec!["Alice".to_string(), "The GM".to_string()]);
}

#[tokio::test]
async fn test_overview_reports_zero_rounds_while_pending() {
    let service = LobbyService::new(seeded_store().await);
    create_boss_fight(&service).await;

    let overview = service.combat_overview(&lobby1()).await.unwrap();

    assert_eq!(overview.len(), 1);
    assert!(!overview[0].active);
    assert_eq!(overview[0].round_count, 0);
    assert!(overview[0].connected.is_empty());
}

#[tokio::test]
async fn test_overview_omits_sessions_that_vanished_mid_enumeration() {
    let service = LobbyService::new(seeded_store().await);
    let gone = create_boss_fight(&service).await;
    let alive = create_boss_fight(&service).await;

    // Yank the first session out from under the index, as the event
    // consumer would between enumeration and detail lookup.
    service.registry().lock().await.remove(&gone);

    let overview = service.combat_overview(&lobby1()).await.unwrap();

    assert_eq!(overview.len(), 1);
    assert_eq!(overview[0].session_id, alive);
}

#[tokio::test]
async fn test_overview_omits_players_without_user_documents() {
    let store = seeded_store().await;
    // "phantom" is in the lobby but has no user document.
    store
        .put_lobby(Lobby {
            id: lobby1(),
            name: "Friday Night".into(),
            gm_id: pid("gm"),
            players: vec![pid("gm"), pid("p1"), pid("phantom")],
        })
        .await;
    let service = LobbyService::new(store);
    let id = service
        .create_combat(
            &lobby1(),
            "Boss Fight",
            goblin_preset(),
            pid("gm"),
            vec![pid("p1"), pid("phantom")],
        )
        .await
        .unwrap();
    let handle = service.registry().lock().await.get(&id).unwrap();

    let (p1_tx, _p1_rx) = mpsc::unbounded_channel();
    let (ph_tx, _ph_rx) = mpsc::unbounded_channel();
    handle.attach(pid("p1"), p1_tx).await.unwrap();
    handle.attach(pid("phantom"), ph_tx).await.unwrap();

    let overview = service.combat_overview(&lobby1()).await.unwrap();

    assert_eq!(overview[0].connected, vec!["Alice".to_string()]);
}

#[tokio::test]
async fn test_overview_for_unknown_lobby_is_empty() {
    let service = LobbyService::new(seeded_store().await);
    let overview =
        service.combat_overview(&LobbyId::new("ghost")).await.unwrap();
    assert!(overview.is_empty());
}

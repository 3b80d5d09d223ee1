//! Preset cooking: from a raw battlefield description to a validated seed.
//!
//! Cooking is read-only against storage and all-or-nothing: any validation
//! or resolution failure aborts and discards the partially built seed, so a
//! session is only ever created from a battlefield that fully checks out.

use std::collections::HashSet;

use wyrmgate_protocol::{
    BattlefieldSeed, CookedPawn, EntityRef, EntitySource, PawnPlacement,
    PresetSource, RequestedPreset,
};
use wyrmgate_store::Store;

use crate::CookError;

/// Cooks a preset into the seed a combat session starts from.
///
/// Both modes produce the same shape:
///
/// - [`PresetSource::Requested`] — an inline battlefield. The whole pawn set
///   is validated for duplicate squares before the first storage lookup.
/// - [`PresetSource::Importable`] — a battlefield persisted under an id in
///   the preset store. The duplicate check folds into the per-pawn loop.
///
/// Every `embedded` pawn's entity definition is resolved from the store;
/// a missing definition is a terminal [`CookError::EntityNotFound`], never
/// a silently skipped pawn.
pub async fn cook<S: Store>(
    source: PresetSource,
    store: &S,
) -> Result<BattlefieldSeed, CookError> {
    match source {
        PresetSource::Requested(preset) => cook_requested(preset, store).await,
        PresetSource::Importable { id } => {
            let stored = store
                .get_combat_preset(&id)
                .await?
                .ok_or(CookError::PresetNotFound(id))?;
            cook_stored(stored.pawns, store).await
        }
    }
}

/// Cooks an inline battlefield: validate the whole set, then resolve.
async fn cook_requested<S: Store>(
    preset: RequestedPreset,
    store: &S,
) -> Result<BattlefieldSeed, CookError> {
    let mut claimed = HashSet::new();
    for pawn in &preset.pawns {
        if !claimed.insert(&pawn.square) {
            return Err(CookError::DuplicateSquare(pawn.square.clone()));
        }
    }

    let mut seed = BattlefieldSeed::default();
    for pawn in preset.pawns {
        place(&mut seed, pawn, store).await?;
    }
    Ok(seed)
}

/// Cooks a stored battlefield, checking squares as pawns are placed.
async fn cook_stored<S: Store>(
    pawns: Vec<PawnPlacement>,
    store: &S,
) -> Result<BattlefieldSeed, CookError> {
    let mut seed = BattlefieldSeed::default();
    for pawn in pawns {
        if seed.field_pawns.contains_key(&pawn.square) {
            return Err(CookError::DuplicateSquare(pawn.square));
        }
        place(&mut seed, pawn, store).await?;
    }
    Ok(seed)
}

/// Resolves one placement and slots it onto the seed.
async fn place<S: Store>(
    seed: &mut BattlefieldSeed,
    pawn: PawnPlacement,
    store: &S,
) -> Result<(), CookError> {
    if pawn.source == EntitySource::Embedded
        && !seed.custom_entities.contains_key(&pawn.path)
    {
        let definition = store
            .get_entity(&pawn.path)
            .await?
            .ok_or_else(|| CookError::EntityNotFound(pawn.path.clone()))?;
        seed.custom_entities.insert(pawn.path.clone(), definition);
    }

    seed.field_pawns.insert(
        pawn.square,
        CookedPawn {
            entity_preset: EntityRef {
                source: pawn.source,
                name: pawn.path,
            },
            owner: pawn.controlled_by,
        },
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wyrmgate_protocol::{ControlInfo, EntityDefinition, PlayerId, Square};
    use wyrmgate_store::MemoryStore;

    fn sq(s: &str) -> Square {
        Square::new(s)
    }

    fn embedded(square: &str, path: &str, owner: ControlInfo) -> PawnPlacement {
        PawnPlacement {
            square: sq(square),
            path: path.into(),
            source: EntitySource::Embedded,
            controlled_by: owner,
        }
    }

    fn dlc(square: &str, path: &str) -> PawnPlacement {
        PawnPlacement {
            square: sq(square),
            path: path.into(),
            source: EntitySource::Dlc,
            controlled_by: ControlInfo::GameLogic,
        }
    }

    fn ai(id: &str) -> ControlInfo {
        ControlInfo::Ai { id: id.into() }
    }

    async fn store_with_goblin() -> (MemoryStore, EntityDefinition) {
        let store = MemoryStore::new();
        let goblin = EntityDefinition(serde_json::json!({
            "name": "goblin", "hp": 7, "speed": 6
        }));
        store.put_entity("goblin", goblin.clone()).await;
        (store, goblin)
    }

    // =====================================================================
    // Requested mode
    // =====================================================================

    #[tokio::test]
    async fn test_cook_requested_embedded_pawn_resolves_definition() {
        let (store, goblin) = store_with_goblin().await;
        let source = PresetSource::Requested(RequestedPreset {
            pawns: vec![embedded("A1", "goblin", ai("g1"))],
        });

        let seed = cook(source, &store).await.unwrap();

        let pawn = &seed.field_pawns[&sq("A1")];
        assert_eq!(pawn.entity_preset.source, EntitySource::Embedded);
        assert_eq!(pawn.entity_preset.name, "goblin");
        assert_eq!(pawn.owner, ai("g1"));
        assert_eq!(seed.custom_entities["goblin"], goblin);
    }

    #[tokio::test]
    async fn test_cook_requested_duplicate_square_fails() {
        let (store, _) = store_with_goblin().await;
        let source = PresetSource::Requested(RequestedPreset {
            pawns: vec![
                embedded("B2", "goblin", ai("g1")),
                embedded("B2", "goblin", ai("g2")),
            ],
        });

        let result = cook(source, &store).await;

        assert!(matches!(
            result,
            Err(CookError::DuplicateSquare(s)) if s == sq("B2")
        ));
    }

    #[tokio::test]
    async fn test_cook_requested_duplicate_check_runs_before_lookups() {
        // The duplicate is rejected even though the entity path would also
        // fail to resolve: validation precedes any storage access.
        let store = MemoryStore::new();
        let source = PresetSource::Requested(RequestedPreset {
            pawns: vec![
                embedded("C3", "unseen", ai("g1")),
                embedded("C3", "unseen", ai("g2")),
            ],
        });

        let result = cook(source, &store).await;

        assert!(matches!(result, Err(CookError::DuplicateSquare(_))));
    }

    #[tokio::test]
    async fn test_cook_requested_missing_entity_fails() {
        let store = MemoryStore::new();
        let source = PresetSource::Requested(RequestedPreset {
            pawns: vec![embedded("A1", "dragon", ai("g1"))],
        });

        let result = cook(source, &store).await;

        assert!(matches!(
            result,
            Err(CookError::EntityNotFound(path)) if path == "dragon"
        ));
    }

    #[tokio::test]
    async fn test_cook_requested_dlc_pawn_needs_no_lookup() {
        // Empty store: a dlc pawn must still cook, and no definition is
        // recorded for it.
        let store = MemoryStore::new();
        let source = PresetSource::Requested(RequestedPreset {
            pawns: vec![dlc("D4", "premium/wolf")],
        });

        let seed = cook(source, &store).await.unwrap();

        assert_eq!(seed.field_pawns[&sq("D4")].entity_preset.source,
            EntitySource::Dlc);
        assert!(seed.custom_entities.is_empty());
    }

    #[tokio::test]
    async fn test_cook_requested_shared_entity_resolved_once() {
        let (store, goblin) = store_with_goblin().await;
        let source = PresetSource::Requested(RequestedPreset {
            pawns: vec![
                embedded("A1", "goblin", ai("g1")),
                embedded("A2", "goblin", ai("g2")),
            ],
        });

        let seed = cook(source, &store).await.unwrap();

        assert_eq!(seed.field_pawns.len(), 2);
        assert_eq!(seed.custom_entities.len(), 1);
        assert_eq!(seed.custom_entities["goblin"], goblin);
    }

    #[tokio::test]
    async fn test_cook_requested_player_controlled_pawn() {
        let (store, _) = store_with_goblin().await;
        let owner = ControlInfo::Player {
            id: Some(PlayerId::new("p1")),
        };
        let source = PresetSource::Requested(RequestedPreset {
            pawns: vec![embedded("E5", "goblin", owner.clone())],
        });

        let seed = cook(source, &store).await.unwrap();

        assert_eq!(seed.field_pawns[&sq("E5")].owner, owner);
    }

    // =====================================================================
    // Importable mode
    // =====================================================================

    #[tokio::test]
    async fn test_cook_importable_resolves_stored_preset() {
        let (store, goblin) = store_with_goblin().await;
        let stored = store
            .create_combat_preset(vec![
                embedded("A1", "goblin", ai("g1")),
                dlc("B1", "premium/wolf"),
            ])
            .await;

        let seed = cook(
            PresetSource::Importable { id: stored.id },
            &store,
        )
        .await
        .unwrap();

        assert_eq!(seed.field_pawns.len(), 2);
        assert_eq!(seed.custom_entities["goblin"], goblin);
    }

    #[tokio::test]
    async fn test_cook_importable_unknown_id_fails() {
        let store = MemoryStore::new();
        let id = wyrmgate_protocol::PresetId::new("ghost");

        let result =
            cook(PresetSource::Importable { id: id.clone() }, &store).await;

        assert!(matches!(
            result,
            Err(CookError::PresetNotFound(p)) if p == id
        ));
    }

    #[tokio::test]
    async fn test_cook_importable_duplicate_square_fails() {
        let (store, _) = store_with_goblin().await;
        let stored = store
            .create_combat_preset(vec![
                embedded("B2", "goblin", ai("g1")),
                embedded("B2", "goblin", ai("g2")),
            ])
            .await;

        let result =
            cook(PresetSource::Importable { id: stored.id }, &store).await;

        assert!(matches!(result, Err(CookError::DuplicateSquare(_))));
    }

    #[tokio::test]
    async fn test_cook_both_modes_produce_identical_seeds() {
        let (store, _) = store_with_goblin().await;
        let pawns = vec![
            embedded("A1", "goblin", ai("g1")),
            dlc("B1", "premium/wolf"),
        ];
        let stored = store.create_combat_preset(pawns.clone()).await;

        let imported = cook(
            PresetSource::Importable { id: stored.id },
            &store,
        )
        .await
        .unwrap();
        let requested = cook(
            PresetSource::Requested(RequestedPreset { pawns }),
            &store,
        )
        .await
        .unwrap();

        assert_eq!(imported, requested);
    }
}

//! QA tests for the game store and backup round trips.
//!
//! These tests exercise real files in temporary directories; no API
//! calls are involved.

use bestiario_core::events::UniversalEvent;
use bestiario_core::planet::find_planet;
use bestiario_core::store::BACKUP_FILE;
use bestiario_core::{
    create_sample_creature, Backup, CombatOutcome, CreatureStatus, GameStore, StoreError,
    DEFAULT_CAPITAL,
};
use tempfile::TempDir;

// =============================================================================
// TEST 1: A fresh store reads as an empty game
// =============================================================================

#[tokio::test]
async fn test_fresh_store_defaults() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = GameStore::new(temp_dir.path().join("never-written"));

    assert!(store.load_bestiary().await.unwrap().is_empty());
    assert_eq!(store.load_capital().await.unwrap(), DEFAULT_CAPITAL);
    assert!(store.load_events().await.unwrap().is_empty());
}

// =============================================================================
// TEST 2: Play state survives a full save/load cycle
// =============================================================================

#[tokio::test]
async fn test_play_state_round_trip() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = GameStore::new(temp_dir.path());

    let mut creature = create_sample_creature("Dragonus");
    creature.wins = 4;
    creature.losses = 2;
    creature.status = CreatureStatus::Herido;
    creature.combat_history.push(bestiario_core::CombatRecord {
        opponent: "Golemech".to_string(),
        outcome: CombatOutcome::Herido,
        battlefield: "Tundra Congelada".to_string(),
    });

    let mut fallen = create_sample_creature("Umbra");
    fallen.status = CreatureStatus::Muerto;
    fallen.death_cause = Some("Devorada por la tormenta.".to_string());

    store
        .save_bestiary(&[creature, fallen])
        .await
        .expect("save bestiary");

    let loaded = store.load_bestiary().await.expect("load bestiary");
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].wins, 4);
    assert_eq!(loaded[0].status, CreatureStatus::Herido);
    assert_eq!(loaded[0].combat_history[0].opponent, "Golemech");
    assert_eq!(loaded[1].status, CreatureStatus::Muerto);
    assert_eq!(
        loaded[1].death_cause.as_deref(),
        Some("Devorada por la tormenta.")
    );
}

// =============================================================================
// TEST 3: Events survive a full save/load cycle
// =============================================================================

#[tokio::test]
async fn test_events_round_trip() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = GameStore::new(temp_dir.path());

    let creature = create_sample_creature("Dragonus");
    let planet = find_planet("Tierra").unwrap().clone();
    let event = UniversalEvent::begin(creature, planet);
    let id = event.id;

    store.save_events(&[event]).await.expect("save events");

    let loaded = store.load_events().await.expect("load events");
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, id);
    assert!(loaded[0].is_active);
    assert_eq!(loaded[0].creature.status, CreatureStatus::Activa);
    assert_eq!(loaded[0].planet.name, "Tierra");
}

// =============================================================================
// TEST 4: Export then import restores an identical triple
// =============================================================================

#[tokio::test]
async fn test_backup_round_trip_identity() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = GameStore::new(temp_dir.path().join("original"));

    let mut creature = create_sample_creature("Dragonus");
    creature.wins = 7;
    let planet = find_planet("Marte").unwrap().clone();
    let event = UniversalEvent::begin(create_sample_creature("Umbra"), planet);

    store.save_bestiary(&[creature]).await.expect("save");
    store.save_capital(555).await.expect("save");
    store.save_events(&[event]).await.expect("save");

    // Export to the canonical backup file name
    let backup_path = temp_dir.path().join(BACKUP_FILE);
    let backup = store.export_backup().await.expect("export");
    backup.save_json(&backup_path).await.expect("write");

    // Import into a second, empty store
    let restored_store = GameStore::new(temp_dir.path().join("restored"));
    let loaded = Backup::load_json(&backup_path).await.expect("read");
    restored_store.import_backup(&loaded).await.expect("import");

    let original = (
        store.load_bestiary().await.unwrap(),
        store.load_capital().await.unwrap(),
        store.load_events().await.unwrap(),
    );
    let restored = (
        restored_store.load_bestiary().await.unwrap(),
        restored_store.load_capital().await.unwrap(),
        restored_store.load_events().await.unwrap(),
    );

    assert_eq!(
        serde_json::to_value(&original.0).unwrap(),
        serde_json::to_value(&restored.0).unwrap()
    );
    assert_eq!(original.1, restored.1);
    assert_eq!(
        serde_json::to_value(&original.2).unwrap(),
        serde_json::to_value(&restored.2).unwrap()
    );
}

// =============================================================================
// TEST 5: A backup from an incompatible version is rejected
// =============================================================================

#[tokio::test]
async fn test_incompatible_backup_rejected() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = GameStore::new(temp_dir.path());

    let mut backup = store.export_backup().await.expect("export");
    backup.version = 2;

    let backup_path = temp_dir.path().join(BACKUP_FILE);
    backup.save_json(&backup_path).await.expect("write");

    let err = Backup::load_json(&backup_path).await.unwrap_err();
    assert!(matches!(err, StoreError::VersionMismatch { found: 2, .. }));
}

// =============================================================================
// TEST 6: Importing a backup replaces existing state wholesale
// =============================================================================

#[tokio::test]
async fn test_import_replaces_state() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = GameStore::new(temp_dir.path().join("game"));

    store
        .save_bestiary(&[
            create_sample_creature("Dragonus"),
            create_sample_creature("Golemech"),
        ])
        .await
        .expect("save");
    store.save_capital(9999).await.expect("save");

    // Back up a leaner state and import it over the richer one
    let other = GameStore::new(temp_dir.path().join("other"));
    other
        .save_bestiary(&[create_sample_creature("Fenix")])
        .await
        .expect("save");
    other.save_capital(10).await.expect("save");

    let backup = other.export_backup().await.expect("export");
    store.import_backup(&backup).await.expect("import");

    let bestiary = store.load_bestiary().await.unwrap();
    assert_eq!(bestiary.len(), 1);
    assert_eq!(bestiary[0].name(), "Fenix");
    assert_eq!(store.load_capital().await.unwrap(), 10);
}

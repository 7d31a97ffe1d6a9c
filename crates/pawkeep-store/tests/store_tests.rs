// Test suite for the encrypted snapshot store
// Covers round trips, missing-file semantics, corruption handling, and the
// invariants that must hold across a save/load cycle

use pawkeep_core::model::behavior::BehaviorRegistry;
use pawkeep_core::model::inventory::ItemCatalog;
use pawkeep_core::model::pet::{Collaborators, Pet};
use pawkeep_core::model::stats::{STAT_MAX, STAT_MIN};
use pawkeep_store::{PersistError, SaveCipher, SaveStore};
use std::io::Write;
use std::sync::Arc;
use tempfile::TempDir;

const TEST_KEY: [u8; 32] = [0x5a; 32];

struct SmallCatalog;

impl ItemCatalog for SmallCatalog {
    fn contains(&self, item_id: u32) -> bool {
        item_id < 100
    }
}

fn collaborators() -> Collaborators {
    Collaborators {
        behaviors: Arc::new(BehaviorRegistry::standard()),
        catalog: Arc::new(SmallCatalog),
    }
}

fn setup_store() -> (TempDir, SaveStore) {
    let dir = TempDir::new().unwrap();
    let store = SaveStore::new(dir.path().join("pet.sav"), &TEST_KEY);
    (dir, store)
}

/// Encrypt raw JSON straight to the store's path, bypassing the codec, so
/// tests can plant arbitrary snapshot content on disk.
fn plant_snapshot_json(store: &SaveStore, json: &str) {
    let cipher = SaveCipher::new(&TEST_KEY);
    let file = std::fs::File::create(store.path()).unwrap();
    let mut sink = cipher.encrypt_to(file).unwrap();
    sink.write_all(json.as_bytes()).unwrap();
    sink.finish().unwrap();
}

#[test]
fn test_round_trip_preserves_every_field() {
    let (_dir, store) = setup_store();
    let collab = collaborators();

    let mut pet = Pet::new("Fluffy", &collab);
    pet.set_behavior_by_name("ASLEEP").unwrap();
    pet.stats_mut().clear();
    pet.stats_mut().set("happiness", 50);
    pet.stats_mut().set("hunger", 0);
    pet.grant_item(7, 3).unwrap();
    pet.grant_item(12, 1).unwrap();
    pet.set_sleep_progress(1234.0);
    pet.set_slept_this_cycle(true);
    let shared = pet.shared();

    store.save(&shared).unwrap();
    let loaded = store.load(&collab).unwrap().expect("snapshot present");

    assert_eq!(loaded.name(), "Fluffy");
    assert_eq!(loaded.behavior_name(), "ASLEEP");
    assert_eq!(loaded.stats().get("happiness"), Some(50));
    assert_eq!(loaded.stats().get("hunger"), Some(0));
    assert_eq!(loaded.stats().len(), 2);
    assert_eq!(loaded.inventory().quantity(7), 3);
    assert_eq!(loaded.inventory().quantity(12), 1);
    assert_eq!(loaded.sleep_progress(), 1234.0);
    assert!(loaded.slept_this_cycle());
}

#[test]
fn test_missing_file_is_no_snapshot_not_an_error() {
    let (_dir, store) = setup_store();
    let loaded = store.load(&collaborators()).unwrap();
    assert!(loaded.is_none());
}

#[test]
fn test_empty_file_is_format_error() {
    let (_dir, store) = setup_store();
    std::fs::write(store.path(), b"").unwrap();
    let err = store.load(&collaborators()).unwrap_err();
    assert!(matches!(err, PersistError::Format { .. }), "{err}");
}

#[test]
fn test_short_file_is_format_error() {
    let (_dir, store) = setup_store();
    std::fs::write(store.path(), b"short").unwrap();
    let err = store.load(&collaborators()).unwrap_err();
    assert!(matches!(err, PersistError::Format { .. }), "{err}");
}

#[test]
fn test_flipping_any_region_is_crypto_error() {
    let (_dir, store) = setup_store();
    let collab = collaborators();
    let shared = Pet::new("Fluffy", &collab).shared();
    store.save(&shared).unwrap();

    let valid = std::fs::read(store.path()).unwrap();
    // One byte in the IV, the ciphertext body, and the trailing tag.
    for index in [3, valid.len() / 2, valid.len() - 1] {
        let mut corrupted = valid.clone();
        corrupted[index] ^= 0x80;
        std::fs::write(store.path(), &corrupted).unwrap();

        let err = store.load(&collab).unwrap_err();
        assert!(
            matches!(err, PersistError::Crypto { .. }),
            "index {index}: {err}"
        );
    }
}

#[test]
fn test_decrypted_garbage_is_serialization_error() {
    let (_dir, store) = setup_store();
    plant_snapshot_json(&store, "not json at all");
    let err = store.load(&collaborators()).unwrap_err();
    assert!(matches!(err, PersistError::Serialization(_)), "{err}");
}

#[test]
fn test_out_of_range_stats_clamp_on_load() {
    let (_dir, store) = setup_store();
    plant_snapshot_json(
        &store,
        r#"{"format_version":"1","entity_name":"Fluffy","behavior_state_name":"AWAKE",
            "stats":{"happiness":9001,"hunger":-50},"inventory":{},
            "sleep_progress":0.0,"slept_this_cycle":false,"saved_at":0}"#,
    );

    let loaded = store.load(&collaborators()).unwrap().unwrap();
    assert_eq!(loaded.stats().get("happiness"), Some(STAT_MAX));
    assert_eq!(loaded.stats().get("hunger"), Some(STAT_MIN));
}

#[test]
fn test_unknown_behavior_state_falls_back_to_default() {
    let (_dir, store) = setup_store();
    plant_snapshot_json(
        &store,
        r#"{"format_version":"1","entity_name":"Fluffy","behavior_state_name":"MOONWALK"}"#,
    );

    let loaded = store.load(&collaborators()).unwrap().unwrap();
    assert_eq!(loaded.behavior_name(), "AWAKE");
}

#[test]
fn test_unknown_items_and_zero_quantities_are_dropped() {
    let (_dir, store) = setup_store();
    plant_snapshot_json(
        &store,
        r#"{"entity_name":"Fluffy","inventory":{"7":2,"999":5,"8":0}}"#,
    );

    let loaded = store.load(&collaborators()).unwrap().unwrap();
    assert_eq!(loaded.inventory().quantity(7), 2);
    assert_eq!(loaded.inventory().quantity(999), 0);
    assert_eq!(loaded.inventory().quantity(8), 0);
    assert_eq!(loaded.inventory().len(), 1);
}

#[test]
fn test_older_format_with_missing_fields_still_loads() {
    let (_dir, store) = setup_store();
    plant_snapshot_json(&store, r#"{"format_version":"0","entity_name":"Fluffy"}"#);

    let loaded = store.load(&collaborators()).unwrap().unwrap();
    assert_eq!(loaded.name(), "Fluffy");
    assert_eq!(loaded.behavior_name(), "AWAKE");
    assert!(loaded.stats().is_empty());
    assert!(loaded.inventory().is_empty());
    assert_eq!(loaded.sleep_progress(), 0.0);
    assert!(!loaded.slept_this_cycle());
}

#[test]
fn test_save_overwrites_previous_snapshot() {
    let (_dir, store) = setup_store();
    let collab = collaborators();
    let shared = Pet::new("Fluffy", &collab).shared();

    store.save(&shared).unwrap();
    {
        let mut pet = shared.lock().unwrap();
        pet.stats_mut().set("happiness", 1);
        pet.set_slept_this_cycle(true);
    }
    store.save(&shared).unwrap();

    let loaded = store.load(&collab).unwrap().unwrap();
    assert_eq!(loaded.stats().get("happiness"), Some(1));
    assert!(loaded.slept_this_cycle());
}

#[test]
fn test_wrong_key_cannot_read_snapshot() {
    let (dir, store) = setup_store();
    let collab = collaborators();
    store.save(&Pet::new("Fluffy", &collab).shared()).unwrap();

    let other = SaveStore::new(dir.path().join("pet.sav"), &[0x11; 32]);
    let err = other.load(&collab).unwrap_err();
    assert!(matches!(err, PersistError::Crypto { .. }), "{err}");
}

#[test]
fn test_save_into_missing_directory_is_io_error() {
    let dir = TempDir::new().unwrap();
    let store = SaveStore::new(dir.path().join("no-such-dir").join("pet.sav"), &TEST_KEY);
    let err = store
        .save(&Pet::new("Fluffy", &collaborators()).shared())
        .unwrap_err();
    assert!(matches!(err, PersistError::Io { .. }), "{err}");
}

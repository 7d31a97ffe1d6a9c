//! Snapshot codec
//!
//! Pure conversion between the live pet and its persisted snapshot form.
//! Nothing here touches the filesystem; encryption and disk I/O live in the
//! store crate, which is also where these results get wrapped into
//! persistence errors.

use crate::model::pet::{Collaborators, Pet};
use crate::snapshot::record::{PetSnapshot, FORMAT_VERSION};
use chrono::Utc;

/// Capture the pet's current state into a fresh snapshot
///
/// Reads every persisted field without mutating the pet. Inventory entries
/// are strictly positive by construction, so the capture needs no filtering.
pub fn capture(pet: &Pet) -> PetSnapshot {
    PetSnapshot {
        format_version: FORMAT_VERSION.to_string(),
        entity_name: pet.name().to_string(),
        behavior_state_name: pet.behavior_name().to_string(),
        stats: pet.stats().as_map().clone(),
        inventory: pet.inventory().as_map().clone(),
        sleep_progress: pet.sleep_progress(),
        slept_this_cycle: pet.slept_this_cycle(),
        saved_at: Utc::now().timestamp_millis(),
    }
}

/// Encode a snapshot to its JSON byte form
pub fn encode(snapshot: &PetSnapshot) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec_pretty(snapshot)
}

/// Decode a snapshot from its JSON byte form
///
/// Missing fields default and unknown fields are ignored (see the record
/// schema); structurally invalid JSON is an error.
pub fn decode(bytes: &[u8]) -> serde_json::Result<PetSnapshot> {
    serde_json::from_slice(bytes)
}

/// Rehydrate a pet from a snapshot
///
/// Constructs a fresh pet through the collaborators, then applies every
/// snapshot field onto it:
/// - an unresolvable behavior state name keeps the registry default
///   (warn-logged, not an error)
/// - stats are clamped on apply, so the range invariant holds even for
///   out-of-range values on disk
/// - inventory entries the catalog does not know, or with a zero quantity,
///   are dropped (warn-logged)
pub fn restore(snapshot: PetSnapshot, collaborators: &Collaborators) -> Pet {
    let mut pet = Pet::new(snapshot.entity_name, collaborators);

    match collaborators.behaviors.resolve(&snapshot.behavior_state_name) {
        Some(state) => pet.set_behavior(state),
        None => {
            tracing::warn!(
                state = %snapshot.behavior_state_name,
                fallback = pet.behavior_name(),
                "Persisted behavior state is not registered; keeping the default"
            );
        }
    }

    let stats = pet.stats_mut();
    stats.clear();
    for (key, value) in &snapshot.stats {
        stats.set(key.clone(), *value);
    }

    for (&item_id, &quantity) in &snapshot.inventory {
        if let Err(error) = pet.grant_item(item_id, quantity) {
            tracing::warn!(item_id, quantity, %error, "Dropping unrestorable inventory entry");
        }
    }

    pet.set_sleep_progress(snapshot.sleep_progress);
    pet.set_slept_this_cycle(snapshot.slept_this_cycle);
    pet
}

//! Snapshot record schema
//!
//! A snapshot is the complete persisted representation of one pet at one
//! point in time. It is constructed fresh on every save, never mutated, and
//! consumed exactly once on load.
//!
//! Every field carries `#[serde(default)]` so files written by an older
//! format decode with zero/false/empty defaults instead of failing. This is
//! best-effort forward compatibility, not a migration system.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Format tag written into every snapshot
///
/// Inspected on load (a mismatch is warn-logged) but not enforced.
pub const FORMAT_VERSION: &str = "1";

/// Complete persisted state of one pet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetSnapshot {
    /// Compatibility tag, currently [`FORMAT_VERSION`]
    #[serde(default)]
    pub format_version: String,

    /// The pet's name
    #[serde(default)]
    pub entity_name: String,

    /// Canonical identifier of the current behavior state
    #[serde(default)]
    pub behavior_state_name: String,

    /// Stat key → value, each within the global stat range
    #[serde(default)]
    pub stats: BTreeMap<String, i32>,

    /// Item id → owned quantity; zero-quantity entries are never persisted
    #[serde(default)]
    pub inventory: BTreeMap<u32, u32>,

    /// Accumulated time in the current sleep episode, non-negative
    #[serde(default)]
    pub sleep_progress: f64,

    /// Whether the pet slept in the current day/night cycle
    #[serde(default)]
    pub slept_this_cycle: bool,

    /// Wall-clock timestamp of the save, milliseconds since epoch
    #[serde(default)]
    pub saved_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_decode_to_defaults() {
        let snapshot: PetSnapshot = serde_json::from_str("{}").unwrap();
        assert_eq!(snapshot.format_version, "");
        assert_eq!(snapshot.entity_name, "");
        assert_eq!(snapshot.behavior_state_name, "");
        assert!(snapshot.stats.is_empty());
        assert!(snapshot.inventory.is_empty());
        assert_eq!(snapshot.sleep_progress, 0.0);
        assert!(!snapshot.slept_this_cycle);
        assert_eq!(snapshot.saved_at, 0);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let snapshot: PetSnapshot =
            serde_json::from_str(r#"{"entity_name":"Fluffy","weather":"rain"}"#).unwrap();
        assert_eq!(snapshot.entity_name, "Fluffy");
    }
}

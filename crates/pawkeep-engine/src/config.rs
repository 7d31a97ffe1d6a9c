//! Engine configuration

use pawkeep_store::{SaveStore, KEY_LEN};
use std::path::PathBuf;
use std::time::Duration;

/// Tunables for persistence scheduling
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Target save file
    pub save_path: PathBuf,
    /// Interval between periodic autosaves
    pub autosave_period: Duration,
    /// How long `shutdown` waits for the worker to drain before cancelling
    /// whatever is still queued
    pub shutdown_timeout: Duration,
}

impl EngineConfig {
    /// Open a store on the configured path with the supplied key
    pub fn open_store(&self, key: &[u8; KEY_LEN]) -> SaveStore {
        SaveStore::new(self.save_path.clone(), key)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            save_path: PathBuf::from("pet.sav"),
            autosave_period: Duration::from_secs(60),
            shutdown_timeout: Duration::from_secs(5),
        }
    }
}

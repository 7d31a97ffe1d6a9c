//! Encrypted snapshot store
//!
//! Provides the one component allowed to touch the filesystem:
//! capture → encode → encrypt → write on save, and the reverse on load.
//! The target file is overwritten in place; there is no temp-file-and-rename
//! step, so a crash mid-write leaves a file the authentication tag rejects
//! on the next load.

use crate::cipher::{SaveCipher, KEY_LEN};
use crate::errors::{PersistError, Result};
use pawkeep_core::model::pet::{Collaborators, Pet, SharedPet};
use pawkeep_core::snapshot::{codec, FORMAT_VERSION};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Encrypted single-file snapshot store
pub struct SaveStore {
    path: PathBuf,
    cipher: SaveCipher,
    // Held for the duration of one save; the file is written by one save at
    // a time even if the scheduler's queue and the final shutdown save race.
    write_lock: Mutex<()>,
}

impl SaveStore {
    /// Create a store for the given path and key
    ///
    /// The key is treated as opaque; provisioning it is the caller's
    /// concern. Nothing is read or written until `save`/`load`.
    pub fn new(path: impl Into<PathBuf>, key: &[u8; KEY_LEN]) -> Self {
        Self {
            path: path.into(),
            cipher: SaveCipher::new(key),
            write_lock: Mutex::new(()),
        }
    }

    /// The configured save file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Capture and persist the pet's current state
    ///
    /// The pet lock is held only for the capture itself; encoding,
    /// encryption, and disk I/O run after it is released, so the simulation
    /// thread never blocks on them.
    ///
    /// ## Errors
    ///
    /// Any stage failure (encoding, encryption, disk I/O) wraps into
    /// `PersistError` with the underlying cause. Partial writes are possible
    /// on failure.
    pub fn save(&self, pet: &SharedPet) -> Result<()> {
        let _write_guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let snapshot = {
            // A poisoned lock still holds the latest pet state; capture it.
            let guard = pet.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            codec::capture(&guard)
        };
        let encoded = codec::encode(&snapshot)?;

        let file = File::create(&self.path).map_err(|e| PersistError::Io {
            op: "create save file",
            source: e,
        })?;
        let mut sink = self
            .cipher
            .encrypt_to(BufWriter::new(file))
            .map_err(|e| PersistError::from_io("write iv", e))?;
        sink.write_all(&encoded)
            .map_err(|e| PersistError::from_io("encrypt snapshot", e))?;
        sink.finish()
            .map_err(|e| PersistError::from_io("seal save file", e))?;

        tracing::debug!(
            path = %self.path.display(),
            entity = %snapshot.entity_name,
            size_bytes = encoded.len(),
            "Persisted snapshot"
        );
        Ok(())
    }

    /// Load the persisted snapshot, if any, and rehydrate a pet
    ///
    /// A missing file is not an error: it returns `Ok(None)` so first-run
    /// callers construct a fresh pet on a normal code path.
    ///
    /// ## Errors
    ///
    /// - `PersistError::Format`: structurally malformed file (truncated IV)
    /// - `PersistError::Crypto`: authentication failure (corrupted file)
    /// - `PersistError::Serialization`: decrypted bytes are not a snapshot
    /// - `PersistError::Io`: any other read failure
    ///
    /// Whether a failed load is fatal or grounds for starting fresh is the
    /// caller's policy decision, not this store's.
    pub fn load(&self, collaborators: &Collaborators) -> Result<Option<Pet>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No snapshot present");
                return Ok(None);
            }
            Err(e) => {
                return Err(PersistError::Io {
                    op: "open save file",
                    source: e,
                })
            }
        };

        let mut source = self
            .cipher
            .decrypt_from(BufReader::new(file))
            .map_err(|e| PersistError::from_io("read iv", e))?;
        let mut encoded = Vec::new();
        source
            .read_to_end(&mut encoded)
            .map_err(|e| PersistError::from_io("decrypt snapshot", e))?;

        let snapshot = codec::decode(&encoded)?;
        if snapshot.format_version != FORMAT_VERSION {
            tracing::warn!(
                found = %snapshot.format_version,
                expected = FORMAT_VERSION,
                "Snapshot format version mismatch; attempting load anyway"
            );
        }

        tracing::debug!(
            path = %self.path.display(),
            entity = %snapshot.entity_name,
            saved_at = snapshot.saved_at,
            "Loaded snapshot"
        );
        Ok(Some(codec::restore(snapshot, collaborators)))
    }
}

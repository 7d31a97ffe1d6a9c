//! Pawkeep Core - pet domain model and snapshot codec
//!
//! This crate provides the in-memory representation of a pet and its pure
//! mapping to the persisted snapshot form, including:
//! - Pet entity with bounded stats, inventory, and behavior state
//! - Behavior-state registry (explicit registration table, no singletons)
//! - Snapshot record and capture/encode/decode/restore codec
//! - Logging facility with development/production/test profiles
//!
//! Nothing in this crate touches the filesystem or performs cryptography;
//! that is the store crate's job.

pub mod errors;
pub mod logging;
pub mod model;
pub mod snapshot;

// Re-export commonly used types
pub use errors::{PetError, Result};
pub use model::{
    BehaviorRegistry, BehaviorState, Collaborators, Inventory, ItemCatalog, Pet, SharedPet,
    StatBlock,
};
pub use snapshot::{PetSnapshot, FORMAT_VERSION};

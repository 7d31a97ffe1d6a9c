//! Pet entity
//!
//! The pet is mutated by the simulation thread and read by the background
//! save worker, so the canonical handle is `SharedPet` (`Arc<Mutex<Pet>>`);
//! the worker locks only for the duration of one capture.

use crate::errors::{PetError, Result};
use crate::model::behavior::{BehaviorRegistry, BehaviorState};
use crate::model::inventory::{Inventory, ItemCatalog};
use crate::model::stats::{StatBlock, STAT_MAX};
use std::fmt;
use std::sync::{Arc, Mutex};

/// External collaborators a pet is wired to at construction time
///
/// Both are constructed explicitly by the application and passed in; the
/// persistence core never owns a process-global registry or catalog.
#[derive(Clone)]
pub struct Collaborators {
    /// Behavior-state registration table
    pub behaviors: Arc<BehaviorRegistry>,
    /// Item definitions
    pub catalog: Arc<dyn ItemCatalog>,
}

/// Cross-thread handle to a pet
pub type SharedPet = Arc<Mutex<Pet>>;

/// The live simulated entity
pub struct Pet {
    name: String,
    behavior: Arc<dyn BehaviorState>,
    stats: StatBlock,
    inventory: Inventory,
    sleep_progress: f64,
    slept_this_cycle: bool,
    behaviors: Arc<BehaviorRegistry>,
    catalog: Arc<dyn ItemCatalog>,
}

impl Pet {
    /// Create a fresh pet in the registry's default state with the canonical
    /// stats at full value
    pub fn new(name: impl Into<String>, collaborators: &Collaborators) -> Self {
        Self {
            name: name.into(),
            behavior: collaborators.behaviors.default_state(),
            stats: StatBlock::with_defaults(STAT_MAX),
            inventory: Inventory::new(),
            sleep_progress: 0.0,
            slept_this_cycle: false,
            behaviors: Arc::clone(&collaborators.behaviors),
            catalog: Arc::clone(&collaborators.catalog),
        }
    }

    /// Wrap into the shared cross-thread handle
    pub fn shared(self) -> SharedPet {
        Arc::new(Mutex::new(self))
    }

    /// The pet's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current behavior state
    pub fn behavior(&self) -> &Arc<dyn BehaviorState> {
        &self.behavior
    }

    /// Canonical name of the current behavior state
    pub fn behavior_name(&self) -> &'static str {
        self.behavior.name()
    }

    /// Switch to the given behavior state
    pub fn set_behavior(&mut self, state: Arc<dyn BehaviorState>) {
        self.behavior = state;
    }

    /// Switch behavior by canonical name
    ///
    /// ## Errors
    ///
    /// `PetError::UnknownBehavior` if the name is not registered.
    pub fn set_behavior_by_name(&mut self, name: &str) -> Result<()> {
        match self.behaviors.resolve(name) {
            Some(state) => {
                self.behavior = state;
                Ok(())
            }
            None => Err(PetError::UnknownBehavior {
                name: name.to_string(),
            }),
        }
    }

    /// Read-only stats
    pub fn stats(&self) -> &StatBlock {
        &self.stats
    }

    /// Mutable stats (writes clamp into range)
    pub fn stats_mut(&mut self) -> &mut StatBlock {
        &mut self.stats
    }

    /// Read-only inventory
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Add items after checking the catalog knows the id
    ///
    /// ## Errors
    ///
    /// - `PetError::UnknownItem` if the catalog does not contain `item_id`
    /// - `PetError::ZeroQuantity` if `quantity` is zero
    pub fn grant_item(&mut self, item_id: u32, quantity: u32) -> Result<()> {
        if !self.catalog.contains(item_id) {
            return Err(PetError::UnknownItem { item_id });
        }
        self.inventory.add(item_id, quantity)
    }

    /// Remove items from the inventory
    ///
    /// ## Errors
    ///
    /// `PetError::InsufficientQuantity` if fewer than `quantity` are owned.
    pub fn consume_item(&mut self, item_id: u32, quantity: u32) -> Result<()> {
        self.inventory.remove(item_id, quantity)
    }

    /// Accumulated time in the current sleep episode (domain units)
    pub fn sleep_progress(&self) -> f64 {
        self.sleep_progress
    }

    /// Overwrite the sleep progress; negative values floor to zero
    pub fn set_sleep_progress(&mut self, progress: f64) {
        self.sleep_progress = progress.max(0.0);
    }

    /// Add elapsed time to the current sleep episode
    pub fn accumulate_sleep(&mut self, elapsed: f64) {
        self.set_sleep_progress(self.sleep_progress + elapsed);
    }

    /// Whether the pet has slept in the current day/night cycle
    pub fn slept_this_cycle(&self) -> bool {
        self.slept_this_cycle
    }

    /// Set the slept-this-cycle flag
    pub fn set_slept_this_cycle(&mut self, slept: bool) {
        self.slept_this_cycle = slept;
    }
}

impl fmt::Debug for Pet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pet")
            .field("name", &self.name)
            .field("behavior", &self.behavior.name())
            .field("stats", &self.stats)
            .field("inventory", &self.inventory)
            .field("sleep_progress", &self.sleep_progress)
            .field("slept_this_cycle", &self.slept_this_cycle)
            .finish()
    }
}

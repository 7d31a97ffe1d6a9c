pub mod behavior;
pub mod inventory;
pub mod pet;
pub mod stats;

pub use behavior::{BehaviorRegistry, BehaviorState};
pub use inventory::{Inventory, ItemCatalog};
pub use pet::{Collaborators, Pet, SharedPet};
pub use stats::{StatBlock, STAT_MAX, STAT_MIN};

use thiserror::Error;

/// Result type alias using PetError
pub type Result<T> = std::result::Result<T, PetError>;

/// Error taxonomy for pet domain operations
///
/// Persistence failures live in the store crate; these errors cover only the
/// in-memory model (catalog membership, inventory invariants, behavior
/// resolution).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PetError {
    /// Item id is not present in the catalog
    #[error("Unknown item: {item_id}")]
    UnknownItem { item_id: u32 },

    /// Behavior state name does not resolve against the registry
    #[error("Unknown behavior state: {name}")]
    UnknownBehavior { name: String },

    /// Inventory quantities are strictly positive
    #[error("Quantity for item {item_id} must be positive")]
    ZeroQuantity { item_id: u32 },

    /// Attempted to remove more of an item than is owned
    #[error("Cannot remove {requested} of item {item_id}: only {owned} owned")]
    InsufficientQuantity {
        item_id: u32,
        requested: u32,
        owned: u32,
    },
}

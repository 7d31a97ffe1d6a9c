//! Behavior-state registry
//!
//! Provides:
//! - `BehaviorState`, the trait implemented by every mode of the pet's
//!   state machine
//! - `BehaviorRegistry`, an explicit name → instance table with a designated
//!   default state
//!
//! The registry is populated at startup by listing known variants and passed
//! to whoever needs it; there is no process-global registry and no runtime
//! discovery.

use std::collections::BTreeMap;
use std::sync::Arc;

/// A named mode of the pet's internal state machine
///
/// The persistence core only needs the canonical name; behavior logic lives
/// with the simulation.
pub trait BehaviorState: Send + Sync {
    /// Canonical identifier persisted in snapshots
    fn name(&self) -> &'static str;
}

/// Default waking state
#[derive(Debug, Default)]
pub struct Awake;

impl BehaviorState for Awake {
    fn name(&self) -> &'static str {
        "AWAKE"
    }
}

/// Sleeping state; sleep progress accumulates while this is active
#[derive(Debug, Default)]
pub struct Asleep;

impl BehaviorState for Asleep {
    fn name(&self) -> &'static str {
        "ASLEEP"
    }
}

/// Explicit registration table resolving state names to instances
pub struct BehaviorRegistry {
    states: BTreeMap<&'static str, Arc<dyn BehaviorState>>,
    default_name: &'static str,
}

impl BehaviorRegistry {
    /// Registry seeded with the given default state
    pub fn new(default_state: Arc<dyn BehaviorState>) -> Self {
        let default_name = default_state.name();
        let mut states: BTreeMap<&'static str, Arc<dyn BehaviorState>> = BTreeMap::new();
        states.insert(default_name, default_state);
        Self {
            states,
            default_name,
        }
    }

    /// Registry with the stock states, defaulting to `AWAKE`
    pub fn standard() -> Self {
        let mut registry = Self::new(Arc::new(Awake));
        registry.register(Arc::new(Asleep));
        registry
    }

    /// Register a state under its canonical name, replacing any previous
    /// registration of that name
    pub fn register(&mut self, state: Arc<dyn BehaviorState>) {
        self.states.insert(state.name(), state);
    }

    /// Resolve a persisted name to a registered state
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn BehaviorState>> {
        self.states.get(name).cloned()
    }

    /// The designated default state
    pub fn default_state(&self) -> Arc<dyn BehaviorState> {
        // The constructor inserts the default, so the lookup cannot miss.
        self.states[self.default_name].clone()
    }

    /// Canonical names of every registered state, in name order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.states.keys().copied()
    }
}

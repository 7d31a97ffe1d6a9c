//! Pawkeep Engine - autosave scheduling over the encrypted store
//!
//! Provides:
//! - `Autosaver`: periodic background saves through a single serializing
//!   worker, with a drain-and-flush shutdown protocol
//! - `EngineConfig`: tunable period and shutdown timeout
//!
//! The simulation/UI thread never blocks on disk I/O; only the background
//! worker does, except for the one intentional blocking point at shutdown.

pub mod autosave;
pub mod config;

pub use autosave::{Autosaver, SchedulerState};
pub use config::EngineConfig;

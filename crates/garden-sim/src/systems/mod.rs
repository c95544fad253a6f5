//! Per-phase systems run by the engine each simulated step.
//!
//! Systems are free functions over `&mut World` plus whichever session
//! state they mutate. They do not own state; all state lives in components
//! and in the engine.

pub mod cleanup;
pub mod enemies;
pub mod projectiles;
pub mod snapshot;
pub mod soldiers;
pub mod spawning;
pub mod towers;
pub mod waves;

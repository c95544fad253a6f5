//! Simulation engine for Garden Defense.
//!
//! Owns the hecs ECS world, runs the per-phase systems once per simulated
//! step, and produces GameStateSnapshots for the host.

pub mod damage;
pub mod engine;
pub mod error;
pub mod factories;
pub mod geometry;
pub mod placement;
pub mod session;
pub mod status;
pub mod systems;
pub mod wave_composer;
pub mod world_setup;

pub use engine::{SimConfig, SimulationEngine};
pub use garden_core as core;

#[cfg(test)]
mod tests;

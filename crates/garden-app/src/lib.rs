//! Garden defense host.
//!
//! Runs the simulation engine on its own thread, persists meta progression
//! between sessions and drives headless autoplay sessions.

pub mod autoplay;
pub mod game_loop;
pub mod persistence;
pub mod state;

pub use garden_core as core;

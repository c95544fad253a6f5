//! Player intents sent from the host to the simulation.
//!
//! Intents are queued and applied at the next tick boundary, never while a
//! phase is running.

use serde::{Deserialize, Serialize};

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Building ---
    /// Place a tower of the given type at a pixel position.
    PlaceTower { x: f64, y: f64, tower_type: String },
    /// Select a tower for inspection (None clears the selection).
    SelectTower { tower_id: Option<u32> },
    UpgradeTower { tower_id: u32 },
    SellTower { tower_id: u32 },
    /// Merge three maxed towers of one type into a paragon.
    MergeParagon { tower_ids: [u32; 3] },

    // --- Waves ---
    /// Start the next wave, or resume spawning a cancelled one.
    StartWave,
    /// Stop spawning; enemies already on the field keep moving.
    CancelWave,

    // --- Simulation control ---
    TogglePause,
    /// Switch between one and two steps per frame.
    ToggleSpeed,
}

//! Discrete events emitted by the simulation for UI and host feedback.

use serde::{Deserialize, Serialize};

use crate::enums::RejectReason;

/// Something that happened during a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    WaveStarted { wave: u32, queued: usize },
    /// A wave cleared; `bonus` was credited.
    WaveCompleted { wave: u32, bonus: i64 },
    EnemyKilled {
        enemy_id: u32,
        kind: String,
        bounty: i64,
        xp: f64,
    },
    /// An enemy reached the goal.
    LifeLost {
        kind: String,
        amount: i64,
        lives_remaining: i64,
    },
    GameOver { wave: u32, meta_gold: i64 },

    TowerPlaced { tower_id: u32, kind: String, cost: i64 },
    TowerUpgraded { tower_id: u32, level: u32, cost: i64 },
    TowerSold { tower_id: u32, refund: i64 },
    ParagonFormed {
        tower_id: u32,
        kind: String,
        consumed: [u32; 3],
    },
    TrapTriggered { tower_id: u32, enemy_id: u32 },
    /// A tower fell through a cracked glass floor.
    TowerCracked { tower_id: u32 },

    IntentRejected { reason: RejectReason },
    /// A tick failed; the session no longer advances.
    LoopFaulted { message: String },
}

//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// What a tower's shots (or presence) do beyond raw damage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    #[default]
    None,
    /// Freezes the target (speed reduced).
    Slow,
    Burn,
    Poison,
    /// Stops the target in place.
    Void,
    Explosive,
    /// Hero lightning; pierces reinforced resistance.
    Shock,
    /// Passive money generator; never fires.
    Income,
    /// Spawns soldiers; never fires.
    Barracks,
}

/// Declared category of an enemy type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyCategory {
    #[default]
    Normal,
    /// Invisible to towers without camo detection.
    Stealth,
    Armored,
    Boss,
}

/// How an enemy mitigates incoming projectile damage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resistance {
    #[default]
    None,
    /// Burn and explosive bypass; everything else is reduced.
    Armor,
    /// Burn, explosive and shock bypass; everything else deals chip damage.
    Reinforced,
}

/// Periodic special behavior of an enemy type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyAbility {
    /// Restores a fraction of its own max health.
    Regenerate,
    /// Heals nearby allies.
    Heal,
    /// Grants nearby allies a speed buff.
    Haste,
}

/// Timed status conditions an enemy can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Frozen,
    Burning,
    Poisoned,
    Voided,
    Hasted,
}

/// Overall session phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Playing,
    Paused,
    GameOver,
    /// A tick failed; the session no longer advances.
    Faulted,
}

/// Steps simulated per rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameSpeed {
    #[default]
    Normal,
    Fast,
}

impl GameSpeed {
    pub fn steps_per_frame(self) -> u32 {
        match self {
            GameSpeed::Normal => 1,
            GameSpeed::Fast => 2,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            GameSpeed::Normal => GameSpeed::Fast,
            GameSpeed::Fast => GameSpeed::Normal,
        }
    }
}

/// Lifecycle of the current wave.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavePhase {
    #[default]
    Idle,
    /// Active with enemies still queued.
    Spawning,
    /// Active, queue empty, enemies still on the field.
    Draining,
}

/// Kind of special map spot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialFeatureKind {
    /// Bonus-range spot; land towers may be placed even over water.
    Stump,
}

/// Why a placement was refused, in check order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementRejection {
    TooCloseToEdge,
    HeroLimit,
    UnderGlass,
    TooCloseToPath,
    TrapOffPath,
    TowerCollision,
    WaterTowerOnStump,
    NeedsWater,
    CannotBuildOnWater,
}

/// Why a player intent was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    UnknownTowerType,
    TowerLocked,
    OutOfStock,
    InsufficientFunds,
    Placement(PlacementRejection),
    UnknownTower,
    ParagonMaxed,
    MergeMismatch,
    MergeTooEarly,
    GameNotRunning,
}

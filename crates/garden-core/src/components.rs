//! Entity records stored in the simulation world.
//!
//! Records are plain data. Game logic lives in the simulation crate's
//! factories and systems, not here.

use std::collections::BTreeMap;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::enums::{EffectKind, EnemyAbility, Resistance, StatusKind};

/// A placed tower.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tower {
    /// Session-unique id used by player intents.
    pub id: u32,
    /// Tower type identifier in the balance table.
    pub kind: String,
    pub position: DVec2,
    /// Purchase price of the type; upgrade costs scale from it.
    pub base_cost: i64,
    pub level: u32,
    pub damage: f64,
    pub range: f64,
    /// Ticks until the tower may fire again.
    pub cooldown: u32,
    /// Money spent on this tower so far; only ever grows.
    pub total_investment: i64,
    pub is_paragon: bool,
    /// Traps are single-use.
    pub used: bool,
}

/// An enemy walking a path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    /// Session-unique id in spawn order.
    pub id: u32,
    /// Enemy type identifier in the balance table.
    pub kind: String,
    pub position: DVec2,
    pub health: f64,
    pub max_health: f64,
    /// Speed in px/tick before status modifiers.
    pub speed: f64,
    pub bounty: i64,
    pub radius: f64,
    /// Index into the map's path list.
    pub path_index: usize,
    /// Index of the last waypoint reached; never decreases.
    pub waypoint_index: usize,
    pub effects: StatusEffects,
    pub stealthed: bool,
    pub resistance: Resistance,
    pub is_boss: bool,
    /// Lives lost when this enemy reaches the goal.
    pub lives_damage: i64,
    pub ability: Option<EnemyAbility>,
    /// Ticks since the ability last fired.
    pub ability_timer: u32,
}

/// A melee unit spawned by a barracks tower.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Soldier {
    pub id: u32,
    /// Id of the barracks tower that owns this soldier.
    pub barracks_id: u32,
    pub position: DVec2,
    /// Rally point the soldier returns to when idle.
    pub home: DVec2,
    pub health: f64,
    pub max_health: f64,
    pub damage: f64,
    /// Melee reach.
    pub range: f64,
    /// How far from home the soldier will chase an enemy.
    pub leash: f64,
    /// Ticks between melee exchanges.
    pub attack_cooldown: u32,
    pub cooldown: u32,
    pub regen_timer: u32,
}

/// A homing shot in flight. The target reference lives beside it in the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub position: DVec2,
    pub damage: f64,
    /// Speed in px/tick.
    pub speed: f64,
    pub effect: EffectKind,
    pub is_paragon: bool,
    /// Enemy id at fire time, for snapshots.
    pub target_id: u32,
}

/// Timed status conditions keyed by kind, with remaining ticks.
///
/// Each kind is independent; reapplying a kind overwrites its timer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusEffects {
    pub remaining: BTreeMap<StatusKind, u32>,
    /// Ticks accumulated toward the next damage pulse, per damage-over-time kind.
    pub pulse_counters: BTreeMap<StatusKind, u32>,
}

impl StatusEffects {
    pub fn is_active(&self, kind: StatusKind) -> bool {
        self.remaining.get(&kind).is_some_and(|t| *t > 0)
    }

    pub fn remaining_ticks(&self, kind: StatusKind) -> u32 {
        self.remaining.get(&kind).copied().unwrap_or(0)
    }

    /// Active kinds in a stable order.
    pub fn active(&self) -> Vec<StatusKind> {
        self.remaining
            .iter()
            .filter(|(_, t)| **t > 0)
            .map(|(k, _)| *k)
            .collect()
    }
}

impl Enemy {
    pub fn is_armored(&self) -> bool {
        self.resistance != Resistance::None
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn health_fraction(&self) -> f64 {
        if self.max_health > 0.0 {
            (self.health / self.max_health).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

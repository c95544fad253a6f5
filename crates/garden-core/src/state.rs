//! Game state snapshot: the complete visible state handed to the host each frame.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::GameEvent;
use crate::types::SimTime;

/// Read-only view of a session after a frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub speed: GameSpeed,
    pub wave: WaveView,
    pub money: i64,
    pub lives: i64,
    /// Experience earned this session.
    pub xp: f64,
    pub towers: Vec<TowerView>,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    pub soldiers: Vec<SoldierView>,
    pub selected: Option<SelectedTowerView>,
    /// Buildable quadrant on covered maps.
    pub open_quadrant: Option<u8>,
    /// Events raised since the previous snapshot.
    pub events: Vec<GameEvent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaveView {
    /// Current wave number, starting at 1.
    pub number: u32,
    pub active: bool,
    pub phase: WavePhase,
    /// Enemies still waiting to spawn.
    pub queued: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TowerView {
    pub id: u32,
    pub kind: String,
    pub position: DVec2,
    pub level: u32,
    pub damage: f64,
    pub range: f64,
    pub is_paragon: bool,
    pub cooldown: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: u32,
    pub kind: String,
    pub position: DVec2,
    pub radius: f64,
    /// Remaining health in 0..=1.
    pub health_fraction: f64,
    pub statuses: Vec<StatusKind>,
    pub stealthed: bool,
    pub armored: bool,
    pub is_boss: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileView {
    pub position: DVec2,
    pub effect: EffectKind,
    pub is_paragon: bool,
    pub target_id: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoldierView {
    pub id: u32,
    pub barracks_id: u32,
    pub position: DVec2,
    pub health_fraction: f64,
}

/// The selected tower with its current prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedTowerView {
    pub tower: TowerView,
    pub upgrade_cost: i64,
    pub sell_value: i64,
    pub can_upgrade: bool,
}

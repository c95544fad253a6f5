//! Mutable session state owned by the engine: economy, wave progress and
//! id allocation, plus the resolved static configuration.

use std::collections::VecDeque;

use glam::DVec2;

use garden_core::balance::{BalanceTable, Difficulty, Loadout};
use garden_core::enums::WavePhase;
use garden_core::maps::MapData;
use garden_core::rules::Rules;
use garden_core::types::BoardSize;

use crate::factories::EnemyScaling;
use crate::geometry::path_in_pixels;

/// Static configuration resolved once at session start.
#[derive(Debug, Clone)]
pub struct Session {
    pub balance: BalanceTable,
    pub map_key: String,
    pub map: MapData,
    pub difficulty: Difficulty,
    pub rules: Rules,
    pub board: BoardSize,
    /// Map paths scaled to pixels.
    pub paths: Vec<Vec<DVec2>>,
}

impl Session {
    pub fn new(
        balance: BalanceTable,
        map_key: String,
        map: MapData,
        difficulty: Difficulty,
        board: BoardSize,
    ) -> Self {
        let paths = map.paths.iter().map(|p| path_in_pixels(p, board)).collect();
        let rules = balance.rules.clone();
        Self {
            balance,
            map_key,
            map,
            difficulty,
            rules,
            board,
            paths,
        }
    }

    /// Spawn-time multipliers for enemies of the given wave.
    pub fn enemy_scaling(&self, wave_number: u32) -> EnemyScaling {
        EnemyScaling {
            wave_number,
            wave_health_multiplier: self.balance.waves.health_multiplier,
            map_health_multiplier: self.map.enemy_health_multiplier,
            speed_multiplier: self.difficulty.speed_multiplier * self.map.enemy_speed_multiplier,
        }
    }
}

/// Money, lives and experience.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Economy {
    pub money: i64,
    /// Only ever decreases. May go negative.
    pub lives: i64,
    pub xp: f64,
    /// Remaining tower stock and locks for this session.
    pub loadout: Loadout,
}

/// Progress of the current wave.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveState {
    /// Current wave number, starting at 1.
    pub number: u32,
    pub active: bool,
    /// Enemy type ids still to spawn, front first.
    pub queue: VecDeque<String>,
    pub spawn_timer: u32,
    /// Round-robin cursor over the map's paths.
    pub next_path: usize,
}

impl Default for WaveState {
    fn default() -> Self {
        Self {
            number: 1,
            active: false,
            queue: VecDeque::new(),
            spawn_timer: 0,
            next_path: 0,
        }
    }
}

impl WaveState {
    pub fn phase(&self) -> WavePhase {
        match (self.active, self.queue.is_empty()) {
            (false, _) => WavePhase::Idle,
            (true, false) => WavePhase::Spawning,
            (true, true) => WavePhase::Draining,
        }
    }
}

/// Monotonic id counters, one per entity kind.
#[derive(Debug, Clone, Default)]
pub struct IdCounters {
    tower: u32,
    enemy: u32,
    soldier: u32,
}

impl IdCounters {
    pub fn next_tower(&mut self) -> u32 {
        self.tower += 1;
        self.tower
    }

    pub fn next_enemy(&mut self) -> u32 {
        self.enemy += 1;
        self.enemy
    }

    pub fn next_soldier(&mut self) -> u32 {
        self.soldier += 1;
        self.soldier
    }
}

//! Entity factories and the pure tower economy: upgrade, sell, paragon merge.
//!
//! Every function takes plain records and returns new ones; nothing here
//! touches the ECS world.

use glam::DVec2;

use garden_core::balance::{EnemyType, TowerType};
use garden_core::components::{Enemy, Projectile, Soldier, StatusEffects, Tower};
use garden_core::constants::UNAFFORDABLE_COST;
use garden_core::enums::{EffectKind, EnemyCategory, RejectReason};
use garden_core::rules::Rules;

use crate::placement::PlacementSpot;

/// Multipliers applied to an enemy type when it spawns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyScaling {
    pub wave_number: u32,
    /// Per-wave health growth from the wave config.
    pub wave_health_multiplier: f64,
    /// Map-level health multiplier.
    pub map_health_multiplier: f64,
    /// Difficulty speed multiplier times the map's.
    pub speed_multiplier: f64,
}

impl Default for EnemyScaling {
    fn default() -> Self {
        Self {
            wave_number: 1,
            wave_health_multiplier: 0.0,
            map_health_multiplier: 1.0,
            speed_multiplier: 1.0,
        }
    }
}

/// A fresh level-1 tower. Stump spots extend range.
pub fn make_tower(
    id: u32,
    kind: &str,
    tower_type: &TowerType,
    position: DVec2,
    spot: PlacementSpot,
    rules: &Rules,
) -> Tower {
    let range = if spot.on_special_feature {
        tower_type.range * rules.stump_range_multiplier
    } else {
        tower_type.range
    };
    Tower {
        id,
        kind: kind.to_string(),
        position,
        base_cost: tower_type.cost,
        level: 1,
        damage: tower_type.damage,
        range,
        cooldown: 0,
        total_investment: tower_type.cost,
        is_paragon: false,
        used: false,
    }
}

pub fn make_enemy(
    id: u32,
    kind: &str,
    enemy_type: &EnemyType,
    scaling: EnemyScaling,
    spawn: DVec2,
    path_index: usize,
    rules: &Rules,
) -> Enemy {
    let health = enemy_type.base_health
        * (1.0 + f64::from(scaling.wave_number) * scaling.wave_health_multiplier)
        * scaling.map_health_multiplier;
    let is_boss = enemy_type.category == EnemyCategory::Boss;
    let lives_damage = enemy_type.lives_damage.unwrap_or(if is_boss {
        rules.boss_lives_damage
    } else {
        rules.basic_lives_damage
    });
    Enemy {
        id,
        kind: kind.to_string(),
        position: spawn,
        health,
        max_health: health,
        speed: enemy_type.base_speed * scaling.speed_multiplier,
        bounty: enemy_type.bounty,
        radius: enemy_type.radius,
        path_index,
        waypoint_index: 0,
        effects: StatusEffects::default(),
        stealthed: enemy_type.category == EnemyCategory::Stealth,
        resistance: enemy_type.effective_resistance(),
        is_boss,
        lives_damage,
        ability: enemy_type.ability,
        ability_timer: 0,
    }
}

/// A soldier leaving the given barracks for its rally point `home`.
/// Health and damage grow linearly with the barracks level.
pub fn make_soldier(id: u32, barracks: &Tower, home: DVec2, rules: &Rules) -> Soldier {
    let levels = f64::from(barracks.level.saturating_sub(1));
    let max_health = rules.soldier_base_hp + rules.soldier_hp_per_level * levels;
    Soldier {
        id,
        barracks_id: barracks.id,
        position: barracks.position,
        home,
        health: max_health,
        max_health,
        damage: rules.soldier_base_damage + rules.soldier_damage_per_level * levels,
        range: rules.soldier_attack_range,
        leash: barracks.range,
        attack_cooldown: rules.soldier_combat_rate,
        cooldown: 0,
        regen_timer: 0,
    }
}

/// A shot from `tower` at the enemy with id `target_id`.
pub fn make_projectile(
    tower: &Tower,
    tower_type: &TowerType,
    target_id: u32,
    rules: &Rules,
) -> Projectile {
    let effect = match tower_type.fire_unlock_level {
        Some(level) if tower.level >= level => EffectKind::Burn,
        _ => tower_type.effect,
    };
    Projectile {
        position: tower.position,
        damage: tower.damage,
        speed: tower_type
            .projectile_speed
            .unwrap_or(rules.default_projectile_speed),
        effect,
        is_paragon: tower.is_paragon,
        target_id,
    }
}

/// Ticks between shots for a tower of this type.
pub fn fire_cooldown(tower: &Tower, tower_type: &TowerType, rules: &Rules) -> u32 {
    if tower.is_paragon {
        (f64::from(tower_type.cooldown) * rules.paragon_cooldown_multiplier).round() as u32
    } else {
        tower_type.cooldown
    }
}

pub fn upgrade_cost(tower: &Tower, rules: &Rules) -> i64 {
    if tower.is_paragon {
        return UNAFFORDABLE_COST;
    }
    let cost = tower.base_cost as f64 * rules.upgrade_cost_multiplier * f64::from(tower.level);
    cost.floor() as i64
}

pub fn sell_value(tower: &Tower, rules: &Rules) -> i64 {
    (tower.total_investment as f64 * rules.sell_value_multiplier).floor() as i64
}

/// The tower one level up. Paragons come back unchanged.
pub fn upgrade(tower: &Tower, rules: &Rules) -> Tower {
    if tower.is_paragon {
        return tower.clone();
    }
    let cost = upgrade_cost(tower, rules);
    Tower {
        level: tower.level + 1,
        damage: tower.damage * rules.upgrade_damage_multiplier,
        range: tower.range * rules.upgrade_range_multiplier,
        total_investment: tower.total_investment + cost,
        ..tower.clone()
    }
}

/// Merge three maxed towers of one type into a paragon at their centroid.
///
/// The wave gate is the caller's concern; this checks only the towers.
pub fn merge_to_paragon(
    id: u32,
    sources: [&Tower; 3],
    rules: &Rules,
) -> Result<Tower, RejectReason> {
    let [a, b, c] = sources;
    if a.id == b.id || a.id == c.id || b.id == c.id {
        return Err(RejectReason::MergeMismatch);
    }
    if sources.iter().any(|t| t.is_paragon) {
        return Err(RejectReason::ParagonMaxed);
    }
    if sources.iter().any(|t| t.kind != a.kind || t.level < rules.paragon_merge_level) {
        return Err(RejectReason::MergeMismatch);
    }

    let centroid = (a.position + b.position + c.position) / 3.0;
    Ok(Tower {
        id,
        kind: a.kind.clone(),
        position: centroid,
        base_cost: a.base_cost,
        level: 1,
        damage: a.damage * rules.paragon_damage_multiplier,
        range: a.range * rules.paragon_range_multiplier,
        cooldown: 0,
        total_investment: sources.iter().map(|t| t.total_investment).sum(),
        is_paragon: true,
        used: false,
    })
}

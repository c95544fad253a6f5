//! Snapshot system: queries the world and builds a complete GameStateSnapshot.
//!
//! This system is read-only; it never modifies the world.

use hecs::World;

use garden_core::components::*;
use garden_core::enums::*;
use garden_core::events::GameEvent;
use garden_core::rules::Rules;
use garden_core::state::*;
use garden_core::types::SimTime;

use crate::factories::{sell_value, upgrade_cost};
use crate::session::{Economy, WaveState};

/// Build a complete GameStateSnapshot from the current world state.
#[allow(clippy::too_many_arguments)]
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    phase: GamePhase,
    speed: GameSpeed,
    wave: &WaveState,
    economy: &Economy,
    selected: Option<u32>,
    open_quadrant: Option<u8>,
    rules: &Rules,
    events: Vec<GameEvent>,
) -> GameStateSnapshot {
    let towers = build_towers(world);
    let selected = selected.and_then(|id| build_selected(world, id, economy, rules));

    GameStateSnapshot {
        time: *time,
        phase,
        speed,
        wave: WaveView {
            number: wave.number,
            active: wave.active,
            phase: wave.phase(),
            queued: wave.queue.len(),
        },
        money: economy.money,
        lives: economy.lives,
        xp: economy.xp,
        towers,
        enemies: build_enemies(world),
        projectiles: build_projectiles(world),
        soldiers: build_soldiers(world),
        selected,
        open_quadrant,
        events,
    }
}

fn tower_view(tower: &Tower) -> TowerView {
    TowerView {
        id: tower.id,
        kind: tower.kind.clone(),
        position: tower.position,
        level: tower.level,
        damage: tower.damage,
        range: tower.range,
        is_paragon: tower.is_paragon,
        cooldown: tower.cooldown,
    }
}

fn build_towers(world: &World) -> Vec<TowerView> {
    let mut towers: Vec<TowerView> = world
        .query::<&Tower>()
        .iter()
        .map(|(_, tower)| tower_view(tower))
        .collect();
    towers.sort_by_key(|t| t.id);
    towers
}

fn build_selected(
    world: &World,
    tower_id: u32,
    economy: &Economy,
    rules: &Rules,
) -> Option<SelectedTowerView> {
    let mut query = world.query::<&Tower>();
    let (_, tower) = query.iter().find(|(_, t)| t.id == tower_id)?;
    let cost = upgrade_cost(tower, rules);
    Some(SelectedTowerView {
        tower: tower_view(tower),
        upgrade_cost: cost,
        sell_value: sell_value(tower, rules),
        can_upgrade: !tower.is_paragon && economy.money >= cost,
    })
}

fn build_enemies(world: &World) -> Vec<EnemyView> {
    let mut enemies: Vec<EnemyView> = world
        .query::<&Enemy>()
        .iter()
        .map(|(_, enemy)| EnemyView {
            id: enemy.id,
            kind: enemy.kind.clone(),
            position: enemy.position,
            radius: enemy.radius,
            health_fraction: enemy.health_fraction(),
            statuses: enemy.effects.active(),
            stealthed: enemy.stealthed,
            armored: enemy.is_armored(),
            is_boss: enemy.is_boss,
        })
        .collect();
    enemies.sort_by_key(|e| e.id);
    enemies
}

fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    let mut projectiles: Vec<ProjectileView> = world
        .query::<&Projectile>()
        .iter()
        .map(|(_, p)| ProjectileView {
            position: p.position,
            effect: p.effect,
            is_paragon: p.is_paragon,
            target_id: p.target_id,
        })
        .collect();
    projectiles.sort_by(|a, b| {
        a.target_id
            .cmp(&b.target_id)
            .then(a.position.x.total_cmp(&b.position.x))
            .then(a.position.y.total_cmp(&b.position.y))
    });
    projectiles
}

fn build_soldiers(world: &World) -> Vec<SoldierView> {
    let mut soldiers: Vec<SoldierView> = world
        .query::<&Soldier>()
        .iter()
        .map(|(_, s)| SoldierView {
            id: s.id,
            barracks_id: s.barracks_id,
            position: s.position,
            health_fraction: if s.max_health > 0.0 {
                (s.health / s.max_health).clamp(0.0, 1.0)
            } else {
                0.0
            },
        })
        .collect();
    soldiers.sort_by_key(|s| s.id);
    soldiers
}

//! Tower phase: cooldowns, income, barracks recruiting, traps and firing.

use glam::DVec2;
use hecs::{Entity, World};
use tracing::{debug, warn};

use garden_core::components::{Enemy, Soldier, Tower};
use garden_core::enums::EffectKind;
use garden_core::events::GameEvent;

use crate::factories::{fire_cooldown, make_projectile, make_soldier};
use crate::geometry::nearest_point_on_paths;
use crate::session::{Economy, IdCounters, Session};
use crate::status;
use crate::world_setup;

/// A living enemy as seen by target acquisition.
#[derive(Debug, Clone, Copy)]
pub struct TargetInfo {
    pub entity: Entity,
    pub id: u32,
    pub position: DVec2,
    pub stealthed: bool,
    pub alive: bool,
}

/// Living enemies, oldest (lowest id) first.
pub fn collect_targets(world: &World) -> Vec<TargetInfo> {
    let mut targets: Vec<TargetInfo> = world
        .query::<&Enemy>()
        .iter()
        .filter(|(_, e)| e.is_alive())
        .map(|(entity, e)| TargetInfo {
            entity,
            id: e.id,
            position: e.position,
            stealthed: e.stealthed,
            alive: true,
        })
        .collect();
    targets.sort_by_key(|t| t.id);
    targets
}

/// The oldest living enemy within `range` of `from`. Stealthed enemies are
/// skipped unless the tower has camo detection.
pub fn select_target(
    targets: &[TargetInfo],
    from: DVec2,
    range: f64,
    camo_detection: bool,
) -> Option<&TargetInfo> {
    targets.iter().find(|t| {
        t.alive && (!t.stealthed || camo_detection) && t.position.distance(from) <= range
    })
}

pub fn run(
    world: &mut World,
    session: &Session,
    economy: &mut Economy,
    ids: &mut IdCounters,
    tick: u64,
    events: &mut Vec<GameEvent>,
) {
    let rules = &session.rules;
    let mut targets = collect_targets(world);
    let mut shots = Vec::new();
    let mut recruits: Vec<Soldier> = Vec::new();

    for (entity, mut tower) in world_setup::towers_by_id(world) {
        tower.cooldown = tower.cooldown.saturating_sub(1);
        let Some(tower_type) = session.balance.tower(&tower.kind) else {
            warn!(tower_id = tower.id, kind = %tower.kind, "tower has no type config");
            continue;
        };

        match tower_type.effect {
            EffectKind::Income => {
                let period = u64::from(tower_type.cooldown);
                if period > 0 && tick % period == 0 {
                    economy.money += rules.bank_income;
                }
            }
            EffectKind::Barracks => {
                let garrison = world_setup::soldier_count(world, tower.id)
                    + recruits.iter().filter(|s| s.barracks_id == tower.id).count();
                if tower.cooldown == 0 && garrison < rules.barracks_soldier_count {
                    let home = nearest_point_on_paths(tower.position, &session.paths)
                        .unwrap_or(tower.position);
                    recruits.push(make_soldier(ids.next_soldier(), &tower, home, rules));
                    tower.cooldown = fire_cooldown(&tower, tower_type, rules);
                }
            }
            _ if tower_type.is_trap => {
                if !tower.used {
                    if let Some(target) = targets
                        .iter_mut()
                        .find(|t| t.alive && t.position.distance(tower.position) <= tower.range)
                    {
                        // Detonations bypass resistance.
                        if let Ok(mut enemy) = world.get::<&mut Enemy>(target.entity) {
                            enemy.health -= tower.damage;
                            status::apply_effect(&mut enemy.effects, tower_type.effect, rules);
                            target.alive = enemy.is_alive();
                        }
                        tower.used = true;
                        debug!(tower_id = tower.id, enemy_id = target.id, "trap triggered");
                        events.push(GameEvent::TrapTriggered {
                            tower_id: tower.id,
                            enemy_id: target.id,
                        });
                    }
                }
            }
            _ => {
                if tower.cooldown == 0 {
                    if let Some(target) = select_target(
                        &targets,
                        tower.position,
                        tower.range,
                        tower_type.camo_detection,
                    ) {
                        let projectile = make_projectile(&tower, tower_type, target.id, rules);
                        shots.push((projectile, target.entity));
                        tower.cooldown = fire_cooldown(&tower, tower_type, rules);
                    }
                }
            }
        }

        if let Ok(mut stored) = world.get::<&mut Tower>(entity) {
            *stored = tower;
        }
    }

    for (projectile, target) in shots {
        world_setup::spawn_projectile(world, projectile, target);
    }
    for soldier in recruits {
        debug!(soldier_id = soldier.id, barracks_id = soldier.barracks_id, "soldier recruited");
        world_setup::spawn_soldier(world, soldier);
    }
}

//! Enemy phase: statuses, abilities, path movement, deaths and leaks.

use glam::DVec2;
use hecs::{Entity, World};
use tracing::debug;

use garden_core::components::Enemy;
use garden_core::enums::{EnemyAbility, StatusKind};
use garden_core::events::GameEvent;
use garden_core::rules::Rules;

use crate::error::{Result, SimError};
use crate::session::{Economy, Session};
use crate::status;
use crate::systems::cleanup;

pub fn run(
    world: &mut World,
    session: &Session,
    economy: &mut Economy,
    events: &mut Vec<GameEvent>,
    despawn_buffer: &mut Vec<Entity>,
) -> Result<()> {
    let rules = &session.rules;
    for (_entity, enemy) in world.query_mut::<&mut Enemy>() {
        status::advance(enemy, rules);
    }
    run_abilities(world, rules);
    move_along_paths(world, session)?;
    cleanup::reap_enemies(world, session, economy, events, despawn_buffer)?;
    resolve_leaks(world, session, economy, events, despawn_buffer);
    Ok(())
}

/// Advance each living, non-voided enemy toward its next waypoint.
pub fn move_along_paths(world: &mut World, session: &Session) -> Result<()> {
    for (_entity, enemy) in world.query_mut::<&mut Enemy>() {
        if !enemy.is_alive() {
            continue;
        }
        let path = session
            .paths
            .get(enemy.path_index)
            .ok_or(SimError::InvalidPath {
                enemy_id: enemy.id,
                path_index: enemy.path_index,
            })?;
        if enemy.waypoint_index >= path.len() {
            return Err(SimError::InvalidWaypoint {
                enemy_id: enemy.id,
                waypoint_index: enemy.waypoint_index,
                path_len: path.len(),
            });
        }
        let Some(&next) = path.get(enemy.waypoint_index + 1) else {
            continue;
        };

        let step = enemy.speed * status::movement_factor(&enemy.effects, &session.rules);
        if step <= 0.0 {
            continue;
        }
        let delta = next - enemy.position;
        let dist = delta.length();
        if dist < step {
            enemy.position = next;
            enemy.waypoint_index += 1;
        } else {
            enemy.position += delta / dist * step;
        }
        if !enemy.position.is_finite() {
            return Err(SimError::NonFiniteState {
                what: "enemy position",
                id: enemy.id,
            });
        }
    }
    Ok(())
}

/// Enemies that reached the last waypoint cost lives and leave the field.
fn resolve_leaks(
    world: &mut World,
    session: &Session,
    economy: &mut Economy,
    events: &mut Vec<GameEvent>,
    despawn_buffer: &mut Vec<Entity>,
) {
    despawn_buffer.clear();
    let mut leaked: Vec<(u32, Entity, String, i64)> = world
        .query::<&Enemy>()
        .iter()
        .filter(|(_, enemy)| {
            session
                .paths
                .get(enemy.path_index)
                .is_some_and(|path| enemy.waypoint_index + 1 >= path.len())
        })
        .map(|(entity, enemy)| (enemy.id, entity, enemy.kind.clone(), enemy.lives_damage))
        .collect();
    leaked.sort_by_key(|(id, ..)| *id);

    for (enemy_id, entity, kind, amount) in leaked {
        economy.lives -= amount;
        debug!(enemy_id, kind = %kind, amount, lives = economy.lives, "enemy reached the goal");
        events.push(GameEvent::LifeLost {
            kind,
            amount,
            lives_remaining: economy.lives,
        });
        despawn_buffer.push(entity);
    }
    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}

/// Periodic enemy abilities: self-regeneration, healing allies, hasting allies.
pub fn run_abilities(world: &mut World, rules: &Rules) {
    let mut roster: Vec<(Entity, u32, DVec2)> = world
        .query::<&Enemy>()
        .iter()
        .filter(|(_, e)| e.is_alive())
        .map(|(entity, e)| (entity, e.id, e.position))
        .collect();
    roster.sort_by_key(|(_, id, _)| *id);

    let mut heals: Vec<Entity> = Vec::new();
    let mut hastes: Vec<Entity> = Vec::new();

    for (entity, enemy) in world.query_mut::<&mut Enemy>() {
        let Some(ability) = enemy.ability else {
            continue;
        };
        if !enemy.is_alive() {
            continue;
        }
        enemy.ability_timer += 1;
        let here = enemy.position;
        match ability {
            EnemyAbility::Regenerate if enemy.ability_timer >= rules.troll_regen_rate => {
                enemy.ability_timer = 0;
                let regen = enemy.max_health * rules.troll_regen_percent;
                enemy.health = (enemy.health + regen).min(enemy.max_health);
            }
            EnemyAbility::Heal if enemy.ability_timer >= rules.healer_cooldown => {
                enemy.ability_timer = 0;
                heals.extend(allies_within(&roster, entity, here, rules.healer_range));
            }
            EnemyAbility::Haste if enemy.ability_timer >= rules.wizard_cooldown => {
                enemy.ability_timer = 0;
                hastes.extend(
                    allies_within(&roster, entity, here, rules.wizard_range)
                        .take(rules.wizard_buff_count),
                );
            }
            _ => {}
        }
    }

    for entity in heals {
        if let Ok(mut ally) = world.get::<&mut Enemy>(entity) {
            ally.health = (ally.health + rules.healer_heal_amount).min(ally.max_health);
        }
    }
    for entity in hastes {
        if let Ok(mut ally) = world.get::<&mut Enemy>(entity) {
            status::apply(&mut ally.effects, StatusKind::Hasted, rules.speed_buff_duration);
        }
    }
}

/// Other living enemies within `range` of `at`, oldest first.
fn allies_within(
    roster: &[(Entity, u32, DVec2)],
    caster: Entity,
    at: DVec2,
    range: f64,
) -> impl Iterator<Item = Entity> + '_ {
    roster
        .iter()
        .filter(move |(other, _, pos)| *other != caster && pos.distance(at) <= range)
        .map(|(other, _, _)| *other)
}

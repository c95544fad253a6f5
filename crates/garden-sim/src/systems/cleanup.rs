//! Cleanup: award and remove dead enemies, remove spent traps.

use hecs::{Entity, World};
use tracing::debug;

use garden_core::components::{Enemy, Tower};
use garden_core::events::GameEvent;

use crate::error::{Result, SimError};
use crate::session::{Economy, Session};

/// Remove every enemy at or below zero health, crediting its bounty
/// (scaled by the difficulty gold multiplier) and experience.
pub fn reap_enemies(
    world: &mut World,
    session: &Session,
    economy: &mut Economy,
    events: &mut Vec<GameEvent>,
    despawn_buffer: &mut Vec<Entity>,
) -> Result<()> {
    despawn_buffer.clear();
    let mut dead: Vec<(u32, Entity, String, i64)> = Vec::new();
    for (entity, enemy) in world.query::<&Enemy>().iter() {
        if !enemy.health.is_finite() {
            return Err(SimError::NonFiniteState {
                what: "enemy health",
                id: enemy.id,
            });
        }
        if !enemy.is_alive() {
            dead.push((enemy.id, entity, enemy.kind.clone(), enemy.bounty));
        }
    }
    dead.sort_by_key(|(id, ..)| *id);

    let difficulty = &session.difficulty;
    for (enemy_id, entity, kind, bounty) in dead {
        let reward = (bounty as f64 * difficulty.gold_multiplier).floor() as i64;
        let xp = bounty as f64 * difficulty.xp_multiplier;
        economy.money += reward;
        economy.xp += xp;
        debug!(enemy_id, kind = %kind, reward, "enemy killed");
        events.push(GameEvent::EnemyKilled {
            enemy_id,
            kind,
            bounty: reward,
            xp,
        });
        despawn_buffer.push(entity);
    }
    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
    Ok(())
}

/// End-of-step sweep.
pub fn run(
    world: &mut World,
    session: &Session,
    economy: &mut Economy,
    events: &mut Vec<GameEvent>,
    despawn_buffer: &mut Vec<Entity>,
) -> Result<()> {
    reap_enemies(world, session, economy, events, despawn_buffer)?;

    for (entity, tower) in world.query_mut::<&Tower>() {
        if tower.used {
            despawn_buffer.push(entity);
        }
    }
    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
    Ok(())
}

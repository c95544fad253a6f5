//! Spawn phase: release queued enemies at a fixed cadence.

use hecs::World;
use tracing::{debug, warn};

use crate::error::{Result, SimError};
use crate::factories::make_enemy;
use crate::session::{IdCounters, Session, WaveState};
use crate::world_setup;

/// Tick the spawn timer and release the next queued enemy when it fires.
/// Enemies alternate round-robin across the map's paths.
pub fn run(
    world: &mut World,
    session: &Session,
    wave: &mut WaveState,
    ids: &mut IdCounters,
) -> Result<()> {
    if !wave.active || wave.queue.is_empty() {
        return Ok(());
    }
    wave.spawn_timer += 1;
    if wave.spawn_timer < session.rules.spawn_delay_ticks {
        return Ok(());
    }
    wave.spawn_timer = 0;

    let Some(kind) = wave.queue.pop_front() else {
        return Ok(());
    };
    let Some(enemy_type) = session.balance.enemy(&kind) else {
        warn!(kind = %kind, "skipping unknown enemy type");
        return Ok(());
    };

    let id = ids.next_enemy();
    let path_index = wave
        .next_path
        .checked_rem(session.paths.len())
        .ok_or(SimError::InvalidPath {
            enemy_id: id,
            path_index: wave.next_path,
        })?;
    wave.next_path = (path_index + 1) % session.paths.len();
    let spawn = session
        .paths
        .get(path_index)
        .and_then(|path| path.first())
        .copied()
        .ok_or(SimError::InvalidPath {
            enemy_id: id,
            path_index,
        })?;

    let enemy = make_enemy(
        id,
        &kind,
        enemy_type,
        session.enemy_scaling(wave.number),
        spawn,
        path_index,
        &session.rules,
    );
    debug!(
        enemy_id = id,
        kind = %kind,
        health = enemy.health,
        path = path_index,
        "enemy spawned"
    );
    world_setup::spawn_enemy(world, enemy);
    Ok(())
}

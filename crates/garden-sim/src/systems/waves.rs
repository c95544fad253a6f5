//! Wave lifecycle: completion bonus, wave advance and end-of-wave map events.

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use garden_core::events::GameEvent;

use crate::session::{Economy, Session, WaveState};
use crate::world_setup;

/// Complete the wave once it is active, its queue is empty and no enemies remain.
/// Returns the completed wave number.
pub fn run(
    world: &mut World,
    session: &Session,
    wave: &mut WaveState,
    economy: &mut Economy,
    rng: &mut ChaCha8Rng,
    open_quadrant: &mut u8,
    events: &mut Vec<GameEvent>,
) -> Option<u32> {
    if !wave.active || !wave.queue.is_empty() || world_setup::enemy_count(world) > 0 {
        return None;
    }

    let rules = &session.rules;
    let completed = wave.number;
    wave.active = false;
    wave.spawn_timer = 0;
    economy.money += rules.wave_bonus_money;
    info!(wave = completed, bonus = rules.wave_bonus_money, money = economy.money, "wave complete");
    events.push(GameEvent::WaveCompleted {
        wave: completed,
        bonus: rules.wave_bonus_money,
    });

    if session.map.glass_floor && completed >= rules.glass_floor_min_wave {
        crack_glass(world, session, rng, events);
    }
    if session.map.covered {
        *open_quadrant = (*open_quadrant + 1) % 4;
    }
    wave.number += 1;
    Some(completed)
}

/// On glass-floor maps, low-level land towers may fall through after a wave.
/// Cracked towers are removed without refund.
pub fn crack_glass(
    world: &mut World,
    session: &Session,
    rng: &mut ChaCha8Rng,
    events: &mut Vec<GameEvent>,
) {
    let rules = &session.rules;
    let chance = rules.glass_floor_crack_chance.clamp(0.0, 1.0);
    for (entity, tower) in world_setup::towers_by_id(world) {
        let Some(tower_type) = session.balance.tower(&tower.kind) else {
            continue;
        };
        let exposed = !tower_type.is_trap
            && !tower_type.water_only
            && !tower_type.amphibious
            && tower.level < rules.glass_floor_min_level;
        if exposed && rng.gen_bool(chance) {
            info!(tower_id = tower.id, kind = %tower.kind, "tower cracked the glass floor");
            world_setup::despawn_tower(world, entity, tower.id);
            events.push(GameEvent::TowerCracked { tower_id: tower.id });
        }
    }
}

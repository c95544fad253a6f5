//! Soldier phase: barracks units rally, chase, brawl and heal.

use glam::DVec2;
use hecs::{Entity, World};
use tracing::debug;

use garden_core::components::{Enemy, Soldier};
use garden_core::rules::Rules;

use crate::systems::towers::collect_targets;

/// Move `from` toward `to` by at most `step`.
pub fn step_toward(from: DVec2, to: DVec2, step: f64) -> DVec2 {
    let delta = to - from;
    let dist = delta.length();
    if dist <= step || dist == 0.0 {
        to
    } else {
        from + delta / dist * step
    }
}

pub fn run(world: &mut World, rules: &Rules, despawn_buffer: &mut Vec<Entity>) {
    let targets = collect_targets(world);
    let mut hits: Vec<(Entity, f64)> = Vec::new();

    for (_entity, soldier) in world.query_mut::<&mut Soldier>() {
        soldier.cooldown = soldier.cooldown.saturating_sub(1);
        soldier.regen_timer += 1;
        if soldier.regen_timer >= rules.soldier_regen_rate {
            soldier.regen_timer = 0;
            soldier.health = (soldier.health + rules.soldier_regen_amount).min(soldier.max_health);
        }

        let home = soldier.home;
        let leash = soldier.leash;
        let target = targets
            .iter()
            .find(|t| t.position.distance(home) <= leash);

        match target {
            Some(target) if soldier.position.distance(target.position) > soldier.range => {
                soldier.position =
                    step_toward(soldier.position, target.position, rules.soldier_move_speed);
            }
            Some(target) => {
                if soldier.cooldown == 0 {
                    hits.push((target.entity, soldier.damage));
                    soldier.health -= rules.soldier_damage_taken;
                    soldier.cooldown = soldier.attack_cooldown;
                }
            }
            None => {
                soldier.position = step_toward(soldier.position, home, rules.soldier_return_speed);
            }
        }
    }

    for (entity, damage) in hits {
        if let Ok(mut enemy) = world.get::<&mut Enemy>(entity) {
            enemy.health -= damage;
        }
    }

    despawn_buffer.clear();
    for (entity, soldier) in world.query_mut::<&Soldier>() {
        if soldier.health <= 0.0 {
            debug!(soldier_id = soldier.id, "soldier fell");
            despawn_buffer.push(entity);
        }
    }
    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_stops_at_destination() {
        let to = DVec2::new(3.0, 4.0);
        assert_eq!(step_toward(DVec2::ZERO, to, 10.0), to);
        let mid = step_toward(DVec2::ZERO, to, 2.5);
        assert!((mid - DVec2::new(1.5, 2.0)).length() < 1e-12);
    }
}

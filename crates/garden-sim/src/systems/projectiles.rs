//! Projectile phase: homing flight and impact.

use hecs::{Entity, World};

use garden_core::components::{Enemy, Projectile};
use garden_core::rules::Rules;

use crate::damage::resolve_damage;
use crate::error::{Result, SimError};
use crate::status;
use crate::world_setup::Homing;

/// Fly every projectile at its target's current position. A projectile
/// within one step hits; one whose target is gone or dead fizzles.
pub fn run(world: &mut World, rules: &Rules, despawn_buffer: &mut Vec<Entity>) -> Result<()> {
    despawn_buffer.clear();
    let flights: Vec<(Entity, Entity)> = world
        .query::<(&Projectile, &Homing)>()
        .iter()
        .map(|(entity, (_, homing))| (entity, homing.0))
        .collect();

    for (entity, target) in flights {
        let aim = world
            .get::<&Enemy>(target)
            .ok()
            .filter(|enemy| enemy.is_alive())
            .map(|enemy| enemy.position);
        let Some(target_pos) = aim else {
            despawn_buffer.push(entity);
            continue;
        };

        let impact = {
            let Ok(mut projectile) = world.get::<&mut Projectile>(entity) else {
                continue;
            };
            let speed = projectile.speed;
            let delta = target_pos - projectile.position;
            let dist = delta.length();
            if dist < speed || dist == 0.0 {
                Some((projectile.damage, projectile.effect))
            } else {
                projectile.position += delta / dist * speed;
                if !projectile.position.is_finite() {
                    return Err(SimError::NonFiniteState {
                        what: "projectile position",
                        id: projectile.target_id,
                    });
                }
                None
            }
        };

        if let Some((damage, effect)) = impact {
            if let Ok(mut enemy) = world.get::<&mut Enemy>(target) {
                let hit = resolve_damage(damage, effect, enemy.resistance, rules);
                enemy.health -= hit.damage;
                status::apply_effect(&mut enemy.effects, effect, rules);
            }
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
    Ok(())
}

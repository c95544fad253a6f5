//! Spawn helpers and lookups over the simulation world.
//!
//! Every live entity carries exactly one record component (Tower, Enemy,
//! Soldier or Projectile). Projectiles also carry a [`Homing`] reference.

use hecs::{Entity, World};

use garden_core::components::{Enemy, Projectile, Soldier, Tower};

use crate::placement::Occupant;

/// The enemy a projectile is flying at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Homing(pub Entity);

pub fn spawn_tower(world: &mut World, tower: Tower) -> Entity {
    world.spawn((tower,))
}

pub fn spawn_enemy(world: &mut World, enemy: Enemy) -> Entity {
    world.spawn((enemy,))
}

pub fn spawn_soldier(world: &mut World, soldier: Soldier) -> Entity {
    world.spawn((soldier,))
}

pub fn spawn_projectile(world: &mut World, projectile: Projectile, target: Entity) -> Entity {
    world.spawn((projectile, Homing(target)))
}

/// Entity of the tower with the given id.
pub fn find_tower(world: &World, tower_id: u32) -> Option<Entity> {
    world
        .query::<&Tower>()
        .iter()
        .find(|(_, t)| t.id == tower_id)
        .map(|(e, _)| e)
}

/// Copy of the tower with the given id.
pub fn tower_by_id(world: &World, tower_id: u32) -> Option<(Entity, Tower)> {
    let entity = find_tower(world, tower_id)?;
    let tower = world.get::<&Tower>(entity).ok()?;
    Some((entity, (*tower).clone()))
}

/// All towers ordered by id.
pub fn towers_by_id(world: &World) -> Vec<(Entity, Tower)> {
    let mut towers: Vec<(Entity, Tower)> = world
        .query::<&Tower>()
        .iter()
        .map(|(e, t)| (e, t.clone()))
        .collect();
    towers.sort_by_key(|(_, t)| t.id);
    towers
}

/// Placement occupants. Hero status comes from the caller's type lookup.
pub fn occupants(world: &World, is_hero: impl Fn(&str) -> bool) -> Vec<Occupant> {
    world
        .query::<&Tower>()
        .iter()
        .map(|(_, t)| Occupant {
            position: t.position,
            is_hero: is_hero(&t.kind),
        })
        .collect()
}

/// Number of live soldiers belonging to a barracks.
pub fn soldier_count(world: &World, barracks_id: u32) -> usize {
    world
        .query::<&Soldier>()
        .iter()
        .filter(|(_, s)| s.barracks_id == barracks_id)
        .count()
}

/// Remove a tower and every soldier it owns.
pub fn despawn_tower(world: &mut World, entity: Entity, tower_id: u32) {
    let soldiers: Vec<Entity> = world
        .query::<&Soldier>()
        .iter()
        .filter(|(_, s)| s.barracks_id == tower_id)
        .map(|(e, _)| e)
        .collect();
    for soldier in soldiers {
        let _ = world.despawn(soldier);
    }
    let _ = world.despawn(entity);
}

pub fn enemy_count(world: &World) -> usize {
    world.query::<&Enemy>().iter().count()
}

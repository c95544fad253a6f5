//! Tests for the simulation engine: intents, phases, economy and determinism.

use glam::DVec2;

use garden_core::balance::TowerUnlock;
use garden_core::commands::PlayerCommand;
use garden_core::components::{Enemy, Projectile, Soldier, Tower};
use garden_core::enums::*;
use garden_core::events::GameEvent;
use garden_core::state::GameStateSnapshot;

use crate::engine::{SimConfig, SimulationEngine};
use crate::world_setup::{self, Homing};

/// Open ground 60px east of the garden path's first vertical leg.
const NEAR_PATH: (f64, f64) = (260.0, 300.0);
/// Open ground out of reach of every path segment.
const OPEN_FIELD: (f64, f64) = (350.0, 300.0);
/// Directly on the garden path's first vertical leg.
const ON_PATH: (f64, f64) = (200.0, 300.0);

fn engine_on(map: &str) -> SimulationEngine {
    SimulationEngine::new(SimConfig::builtin(map, "medium").unwrap()).unwrap()
}

fn engine() -> SimulationEngine {
    engine_on("garden")
}

fn place(kind: &str, at: (f64, f64)) -> PlayerCommand {
    PlayerCommand::PlaceTower {
        x: at.0,
        y: at.1,
        tower_type: kind.into(),
    }
}

fn enemy_count(engine: &SimulationEngine) -> usize {
    world_setup::enemy_count(engine.world())
}

fn tower_ids(engine: &SimulationEngine) -> Vec<u32> {
    world_setup::towers_by_id(engine.world())
        .into_iter()
        .map(|(_, t)| t.id)
        .collect()
}

/// Tick until `done` holds or the budget runs out, collecting every event.
fn run_until(
    engine: &mut SimulationEngine,
    max_ticks: usize,
    mut done: impl FnMut(&SimulationEngine, &GameStateSnapshot) -> bool,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for _ in 0..max_ticks {
        let snap = engine.tick();
        events.extend(snap.events.iter().cloned());
        if done(engine, &snap) {
            break;
        }
    }
    events
}

fn rejections(events: &[GameEvent]) -> Vec<RejectReason> {
    events
        .iter()
        .filter_map(|e| match e {
            GameEvent::IntentRejected { reason } => Some(*reason),
            _ => None,
        })
        .collect()
}

// ---- Configuration ----

#[test]
fn test_missing_map_refuses_to_start() {
    let config = SimConfig::builtin("atlantis", "medium").unwrap();
    let err = SimulationEngine::new(config).err().unwrap();
    assert!(err.to_string().contains("atlantis"));
}

#[test]
fn test_missing_difficulty_refuses_to_start() {
    let config = SimConfig::builtin("garden", "nightmare").unwrap();
    assert!(SimulationEngine::new(config).is_err());
}

#[test]
fn test_loadout_with_unknown_tower_refuses_to_start() {
    let mut config = SimConfig::builtin("garden", "medium").unwrap();
    config.loadout = Some([("laser".to_string(), TowerUnlock::default())].into());
    assert!(SimulationEngine::new(config).is_err());
}

#[test]
fn test_session_starts_with_difficulty_money() {
    let engine = engine();
    assert_eq!(engine.money(), 600);
    assert_eq!(engine.lives(), 20);
    assert_eq!(engine.wave_number(), 1);
    assert_eq!(engine.phase(), GamePhase::Playing);
}

// ---- Determinism ----

fn scripted_run(seed: u64) -> Vec<String> {
    let mut config = SimConfig::builtin("garden", "medium").unwrap();
    config.seed = seed;
    let mut engine = SimulationEngine::new(config).unwrap();
    engine.queue_command(place("pea_shooter", NEAR_PATH));
    engine.queue_command(PlayerCommand::StartWave);
    (0..900)
        .map(|_| serde_json::to_string(&engine.tick()).unwrap())
        .collect()
}

#[test]
fn test_determinism_same_seed() {
    assert_eq!(scripted_run(12345), scripted_run(12345));
}

#[test]
fn test_wave_queue_depends_on_seed() {
    let mut queues = std::collections::BTreeSet::new();
    for seed in 0..20 {
        let mut config = SimConfig::builtin("garden", "medium").unwrap();
        config.seed = seed;
        let mut engine = SimulationEngine::new(config).unwrap();
        engine.queue_command(PlayerCommand::StartWave);
        engine.tick();
        queues.insert(engine.wave().queue.iter().cloned().collect::<Vec<_>>());
    }
    assert!(queues.len() > 1);
}

// ---- Frame control ----

#[test]
fn test_pause_freezes_steps_but_not_frames() {
    let mut engine = engine();
    engine.tick();
    engine.queue_command(PlayerCommand::TogglePause);
    for _ in 0..10 {
        let snap = engine.tick();
        assert_eq!(snap.phase, GamePhase::Paused);
    }
    assert_eq!(engine.time().tick, 1);
    assert_eq!(engine.time().frame, 11);

    engine.queue_command(PlayerCommand::TogglePause);
    engine.tick();
    assert_eq!(engine.time().tick, 2);
}

#[test]
fn test_fast_speed_runs_two_steps_per_frame() {
    let mut engine = engine();
    engine.queue_command(PlayerCommand::ToggleSpeed);
    let snap = engine.tick();
    assert_eq!(snap.speed, GameSpeed::Fast);
    assert_eq!(engine.time().tick, 2);
    engine.queue_command(PlayerCommand::ToggleSpeed);
    engine.tick();
    assert_eq!(engine.time().tick, 3);
}

// ---- Waves ----

#[test]
fn test_spawn_cadence() {
    let mut engine = engine();
    engine.queue_command(PlayerCommand::StartWave);
    let snap = engine.tick();
    assert!(snap.wave.active);
    assert_eq!(snap.wave.phase, WavePhase::Spawning);
    let queued = snap.wave.queued;
    for _ in 0..38 {
        engine.tick();
    }
    assert_eq!(enemy_count(&engine), 0);
    engine.tick();
    assert_eq!(enemy_count(&engine), 1);
    assert_eq!(engine.wave().queue.len(), queued - 1);
}

#[test]
fn test_cancel_stops_spawning_and_start_resumes() {
    let mut engine = engine();
    engine.queue_command(PlayerCommand::StartWave);
    for _ in 0..40 {
        engine.tick();
    }
    assert_eq!(enemy_count(&engine), 1);
    let queued = engine.wave().queue.clone();

    engine.queue_command(PlayerCommand::CancelWave);
    for _ in 0..200 {
        engine.tick();
    }
    assert_eq!(engine.wave().queue, queued);
    assert!(enemy_count(&engine) <= 1);

    engine.queue_command(PlayerCommand::StartWave);
    engine.tick();
    assert!(engine.wave().active);
    assert_eq!(engine.wave().queue, queued);
}

#[test]
fn test_wave_completion_awards_bonus_and_advances() {
    let mut engine = engine();
    engine.queue_command(PlayerCommand::StartWave);
    let start_money = engine.money();
    let events = run_until(&mut engine, 20_000, |e, _| e.wave_number() == 2);
    assert_eq!(engine.wave_number(), 2);
    assert!(!engine.wave().active);
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::WaveCompleted { wave: 1, bonus: 20 })));
    // Nothing defended, so every enemy leaked and no bounty was paid.
    assert_eq!(engine.money(), start_money + 20);
    assert_eq!(engine.lives(), 20 - 7);
}

// ---- Enemies & lives ----

#[test]
fn test_waypoint_progress_is_monotonic() {
    let mut engine = engine();
    let entity = engine.spawn_enemy("beetle", 0).unwrap();
    let mut last = 0;
    for _ in 0..5_000 {
        engine.tick();
        let Ok(enemy) = engine.world().get::<&Enemy>(entity) else {
            break;
        };
        assert!(enemy.waypoint_index >= last);
        last = enemy.waypoint_index;
    }
    assert_eq!(enemy_count(&engine), 0, "enemy should reach the goal");
    assert_eq!(engine.lives(), 19);
}

#[test]
fn test_emperor_costs_more_lives_and_lives_go_negative() {
    let mut engine = engine();
    engine.spawn_enemy("emperor", 0).unwrap();
    let events = run_until(&mut engine, 10_000, |e, _| e.phase() == GamePhase::GameOver);
    assert_eq!(engine.phase(), GamePhase::GameOver);
    assert_eq!(engine.lives(), 20 - 1000);
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::LifeLost { amount: 1000, .. }
    )));
    let meta = engine.session().rules.meta_gold_for(1);
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::GameOver { wave: 1, meta_gold } if *meta_gold == meta)));

    // Over means over: time stops and intents bounce.
    let tick = engine.time().tick;
    engine.queue_command(PlayerCommand::StartWave);
    let snap = engine.tick();
    assert_eq!(engine.time().tick, tick);
    assert_eq!(rejections(&snap.events), vec![RejectReason::GameNotRunning]);
}

#[test]
fn test_voided_enemy_does_not_move() {
    let mut engine = engine();
    let entity = engine.spawn_enemy("aphid", 0).unwrap();
    let start = {
        let mut enemy = engine.world().get::<&mut Enemy>(entity).unwrap();
        crate::status::apply(&mut enemy.effects, StatusKind::Voided, 30);
        enemy.position
    };
    for _ in 0..20 {
        engine.tick();
    }
    assert_eq!(engine.world().get::<&Enemy>(entity).unwrap().position, start);
    for _ in 0..20 {
        engine.tick();
    }
    assert_ne!(engine.world().get::<&Enemy>(entity).unwrap().position, start);
}

// ---- Towers ----

#[test]
fn test_place_tower_debits_money() {
    let mut engine = engine();
    engine.queue_command(place("pea_shooter", NEAR_PATH));
    let snap = engine.tick();
    assert_eq!(snap.towers.len(), 1);
    assert_eq!(engine.money(), 500);
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::TowerPlaced { cost: 100, .. })));
}

#[test]
fn test_invalid_intents_change_nothing() {
    let mut engine = engine();
    engine.queue_commands([
        place("pea_shooter", (205.0, 300.0)),
        place("laser", OPEN_FIELD),
        place("pea_shooter", (5.0, 5.0)),
        PlayerCommand::UpgradeTower { tower_id: 77 },
        PlayerCommand::SellTower { tower_id: 77 },
    ]);
    let snap = engine.tick();
    assert_eq!(engine.money(), 600);
    assert!(snap.towers.is_empty());
    assert_eq!(
        rejections(&snap.events),
        vec![
            RejectReason::Placement(PlacementRejection::TooCloseToPath),
            RejectReason::UnknownTowerType,
            RejectReason::Placement(PlacementRejection::TooCloseToEdge),
            RejectReason::UnknownTower,
            RejectReason::UnknownTower,
        ]
    );
}

#[test]
fn test_insufficient_funds() {
    let mut engine = engine();
    engine.queue_command(place("gardener_hero", OPEN_FIELD));
    engine.queue_command(place("gardener_hero", (600.0, 400.0)));
    let snap = engine.tick();
    assert_eq!(engine.money(), 600 - 600);
    assert_eq!(rejections(&snap.events), vec![RejectReason::InsufficientFunds]);
}

#[test]
fn test_upgrade_select_and_sell() {
    let mut engine = engine();
    engine.queue_command(place("pea_shooter", NEAR_PATH));
    engine.tick();
    let id = tower_ids(&engine)[0];

    engine.queue_command(PlayerCommand::SelectTower { tower_id: Some(id) });
    let snap = engine.tick();
    let selected = snap.selected.unwrap();
    assert_eq!(selected.upgrade_cost, 75);
    assert_eq!(selected.sell_value, 70);
    assert!(selected.can_upgrade);

    engine.queue_command(PlayerCommand::UpgradeTower { tower_id: id });
    let snap = engine.tick();
    assert_eq!(engine.money(), 500 - 75);
    let selected = snap.selected.unwrap();
    assert_eq!(selected.tower.level, 2);
    assert_eq!(selected.sell_value, 122);

    engine.queue_command(PlayerCommand::SellTower { tower_id: id });
    let snap = engine.tick();
    assert_eq!(engine.money(), 500 - 75 + 122);
    assert!(snap.towers.is_empty());
    assert!(snap.selected.is_none());
}

#[test]
fn test_tower_kills_enemy_for_bounty() {
    let mut engine = engine();
    engine.queue_command(place("pea_shooter", NEAR_PATH));
    engine.tick();
    engine.spawn_enemy("aphid", 0).unwrap();
    let events = run_until(&mut engine, 2_000, |e, _| enemy_count(e) == 0);
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::EnemyKilled { bounty: 5, .. })));
    assert_eq!(engine.money(), 500 + 5);
    assert_eq!(engine.lives(), 20);
    assert!(engine.xp() > 0.0);
}

#[test]
fn test_stealth_ignored_without_camo() {
    let mut engine = engine();
    engine.queue_command(place("pea_shooter", NEAR_PATH));
    engine.tick();
    engine.spawn_enemy("sneak", 0).unwrap();
    let events = run_until(&mut engine, 5_000, |e, _| enemy_count(e) == 0);
    assert!(!events
        .iter()
        .any(|e| matches!(e, GameEvent::EnemyKilled { .. })));
    assert_eq!(engine.lives(), 19);
}

#[test]
fn test_trap_detonates_once_and_is_removed() {
    let mut engine = engine();
    engine.queue_command(place("thorn_trap", ON_PATH));
    engine.tick();
    assert_eq!(tower_ids(&engine).len(), 1);
    engine.spawn_enemy("aphid", 0).unwrap();
    let events = run_until(&mut engine, 2_000, |e, _| enemy_count(e) == 0);
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::TrapTriggered { .. })));
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::EnemyKilled { .. })));
    assert!(tower_ids(&engine).is_empty());
}

#[test]
fn test_trap_damage_ignores_armor() {
    let mut config = SimConfig::builtin("garden", "medium").unwrap();
    config
        .balance
        .towers
        .get_mut("thorn_trap")
        .unwrap()
        .effect = EffectKind::None;
    let mut engine = SimulationEngine::new(config).unwrap();
    engine.queue_command(place("thorn_trap", ON_PATH));
    engine.tick();
    let knight = engine.spawn_enemy("knight", 0).unwrap();
    let events = run_until(&mut engine, 2_000, |_, snap| {
        snap.events
            .iter()
            .any(|e| matches!(e, GameEvent::TrapTriggered { .. }))
    });
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::TrapTriggered { .. })));
    let enemy = engine.world().get::<&Enemy>(knight).unwrap();
    assert_eq!(enemy.resistance, Resistance::Armor);
    assert!((enemy.max_health - enemy.health - 80.0).abs() < 1e-9);
}

#[test]
fn test_income_tower_pays_on_schedule() {
    let mut engine = engine();
    engine.queue_command(place("money_tree", OPEN_FIELD));
    engine.tick();
    // Step 0 is a multiple of every period.
    assert_eq!(engine.money(), 600 - 300 + 20);
    for _ in 0..299 {
        engine.tick();
    }
    assert_eq!(engine.money(), 600 - 300 + 20);
    engine.tick();
    assert_eq!(engine.money(), 600 - 300 + 40);
}

#[test]
fn test_barracks_population_cap_and_dismissal() {
    let mut engine = engine();
    engine.queue_command(place("beehive", NEAR_PATH));
    engine.tick();
    let id = tower_ids(&engine)[0];
    for _ in 0..2_000 {
        engine.tick();
        let soldiers = engine.world().query::<&Soldier>().iter().count();
        assert!(soldiers <= 3);
    }
    assert_eq!(engine.world().query::<&Soldier>().iter().count(), 3);

    engine.queue_command(PlayerCommand::SellTower { tower_id: id });
    let snap = engine.tick();
    assert!(snap.soldiers.is_empty());
}

#[test]
fn test_soldiers_rally_at_the_path() {
    let mut engine = engine();
    engine.queue_command(place("beehive", NEAR_PATH));
    for _ in 0..200 {
        engine.tick();
    }
    let soldier = engine
        .world()
        .query::<&Soldier>()
        .iter()
        .map(|(_, s)| s.clone())
        .min_by_key(|s| s.id)
        .unwrap();
    assert_eq!(soldier.home, DVec2::new(200.0, 300.0));
    assert_eq!(soldier.position, soldier.home);
}

#[test]
fn test_loadout_locks_and_stock() {
    let mut config = SimConfig::builtin("garden", "medium").unwrap();
    config.loadout = Some(
        [
            (
                "void_orchid".to_string(),
                TowerUnlock {
                    locked: true,
                    quantity: None,
                },
            ),
            (
                "thorn_trap".to_string(),
                TowerUnlock {
                    locked: false,
                    quantity: Some(1),
                },
            ),
        ]
        .into(),
    );
    let mut engine = SimulationEngine::new(config).unwrap();
    engine.queue_commands([
        place("void_orchid", OPEN_FIELD),
        place("thorn_trap", ON_PATH),
        place("thorn_trap", (200.0, 400.0)),
    ]);
    let snap = engine.tick();
    assert_eq!(
        rejections(&snap.events),
        vec![RejectReason::TowerLocked, RejectReason::OutOfStock]
    );
    assert_eq!(engine.loadout()["thorn_trap"].quantity, Some(0));
    assert_eq!(snap.towers.len(), 1);
}

#[test]
fn test_merge_requires_late_wave() {
    let mut engine = engine();
    engine.queue_command(PlayerCommand::MergeParagon {
        tower_ids: [1, 2, 3],
    });
    let snap = engine.tick();
    assert_eq!(rejections(&snap.events), vec![RejectReason::MergeTooEarly]);
}

#[test]
fn test_paragon_merge_through_intents() {
    let mut config = SimConfig::builtin("garden", "medium").unwrap();
    config.balance.rules.paragon_min_wave = 1;
    config.balance.rules.paragon_merge_level = 2;
    config
        .balance
        .difficulties
        .get_mut("medium")
        .unwrap()
        .start_money = 10_000;
    let mut engine = SimulationEngine::new(config).unwrap();
    let spots = [(350.0, 300.0), (350.0, 380.0), (400.0, 340.0)];
    engine.queue_commands(spots.iter().map(|s| place("pea_shooter", *s)));
    engine.tick();
    let ids = tower_ids(&engine);
    engine.queue_commands(ids.iter().map(|id| PlayerCommand::UpgradeTower { tower_id: *id }));
    engine.tick();
    engine.queue_command(PlayerCommand::MergeParagon {
        tower_ids: [ids[0], ids[1], ids[2]],
    });
    let snap = engine.tick();

    assert_eq!(snap.towers.len(), 1);
    let paragon = &snap.towers[0];
    assert!(paragon.is_paragon);
    assert_eq!(paragon.level, 1);
    let selected = snap.selected.unwrap();
    assert_eq!(selected.tower.id, paragon.id);
    assert_eq!(selected.upgrade_cost, garden_core::constants::UNAFFORDABLE_COST);
    assert!(!selected.can_upgrade);

    engine.queue_command(PlayerCommand::UpgradeTower {
        tower_id: paragon.id,
    });
    let snap = engine.tick();
    assert_eq!(rejections(&snap.events), vec![RejectReason::ParagonMaxed]);
}

// ---- Projectiles ----

#[test]
fn test_projectile_fizzles_when_target_is_gone() {
    let mut engine = engine();
    let target = engine.spawn_enemy("aphid", 0).unwrap();
    let projectile = Projectile {
        position: DVec2::new(400.0, 400.0),
        damage: 10.0,
        speed: 8.0,
        effect: EffectKind::None,
        is_paragon: false,
        target_id: 1,
    };
    world_setup::spawn_projectile(engine.world_mut(), projectile, target);
    engine.world_mut().despawn(target).unwrap();
    let snap = engine.tick();
    assert!(snap.projectiles.is_empty());
    assert_eq!(snap.phase, GamePhase::Playing);
}

#[test]
fn test_projectile_applies_status_on_hit() {
    let mut engine = engine();
    let target = engine.spawn_enemy("beetle", 0).unwrap();
    let at = engine.world().get::<&Enemy>(target).unwrap().position;
    let projectile = Projectile {
        position: at,
        damage: 4.0,
        speed: 7.0,
        effect: EffectKind::Slow,
        is_paragon: false,
        target_id: 1,
    };
    engine.world_mut().spawn((projectile, Homing(target)));
    engine.tick();
    let enemy = engine.world().get::<&Enemy>(target).unwrap();
    assert!(enemy.effects.is_active(StatusKind::Frozen));
    assert!(enemy.health < enemy.max_health);
}

// ---- Faults ----

#[test]
fn test_fault_halts_the_loop() {
    let mut engine = engine();
    engine.queue_command(place("pea_shooter", NEAR_PATH));
    engine.tick();
    let money = engine.money();
    let entity = engine.spawn_enemy("aphid", 0).unwrap();
    engine.world().get::<&mut Enemy>(entity).unwrap().path_index = 99;

    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Faulted);
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::LoopFaulted { .. })));
    assert!(engine.fault().is_some());
    assert_eq!(snap.money, money);

    let tick = engine.time().tick;
    engine.tick();
    assert_eq!(engine.time().tick, tick);
}

// ---- Map mechanics ----

#[test]
fn test_covered_garden_exposes_open_quadrant() {
    let mut engine = engine_on("covered_garden");
    let snap = engine.tick();
    assert_eq!(snap.open_quadrant, Some(0));
    // Bottom-left is open, top-right is under glass.
    assert!(engine.check_placement(DVec2::new(300.0, 500.0), "pea_shooter").is_ok());
    assert_eq!(
        engine.check_placement(DVec2::new(700.0, 250.0), "pea_shooter"),
        Err(RejectReason::Placement(PlacementRejection::UnderGlass))
    );
}

#[test]
fn test_map_multipliers_scale_enemies() {
    let mut plain = engine_on("garden");
    let mut spooky = engine_on("graveyard");
    let a = plain.spawn_enemy("beetle", 0).unwrap();
    let b = spooky.spawn_enemy("beetle", 0).unwrap();
    let plain_enemy = plain.world().get::<&Enemy>(a).unwrap().clone();
    let spooky_enemy = spooky.world().get::<&Enemy>(b).unwrap().clone();
    assert!((spooky_enemy.max_health - plain_enemy.max_health * 1.15).abs() < 1e-9);
    assert!((spooky_enemy.speed - plain_enemy.speed * 1.15).abs() < 1e-9);
}

#[test]
fn test_tower_records_survive_in_world() {
    let mut engine = engine();
    engine.queue_command(place("frost_lily", NEAR_PATH));
    engine.tick();
    let towers: Vec<Tower> = engine
        .world()
        .query::<&Tower>()
        .iter()
        .map(|(_, t)| t.clone())
        .collect();
    assert_eq!(towers.len(), 1);
    assert_eq!(towers[0].kind, "frost_lily");
    assert_eq!(towers[0].total_investment, 150);
}

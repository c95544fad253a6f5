//! Headless autoplay: a simple build-then-start strategy that plays whole
//! waves without a frontend.

use glam::DVec2;
use serde::Serialize;
use tracing::{debug, info};

use garden_core::balance::Loadout;
use garden_core::commands::PlayerCommand;
use garden_core::enums::{EffectKind, GamePhase};
use garden_core::error::ConfigError;
use garden_core::events::GameEvent;
use garden_core::rules::Rules;
use garden_sim::engine::{SimConfig, SimulationEngine};
use garden_sim::factories::upgrade_cost;
use garden_sim::geometry::nearest_point_on_paths;
use garden_sim::world_setup;

/// Spacing of the candidate build grid in pixels.
const GRID_STEP: f64 = 40.0;

/// Upper bound on frames for one autoplay session.
const DEFAULT_MAX_FRAMES: u64 = 2_000_000;

#[derive(Debug, Clone)]
pub struct AutoplayConfig {
    pub map: String,
    pub difficulty: String,
    pub seed: u64,
    /// Stop once this many waves are cleared.
    pub wave_cap: u32,
    pub max_frames: u64,
    pub loadout: Option<Loadout>,
}

impl AutoplayConfig {
    pub fn new(map: &str, difficulty: &str, seed: u64, wave_cap: u32) -> Self {
        Self {
            map: map.to_string(),
            difficulty: difficulty.to_string(),
            seed,
            wave_cap,
            max_frames: DEFAULT_MAX_FRAMES,
            loadout: None,
        }
    }
}

/// Outcome of an autoplay session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AutoplayReport {
    pub waves_cleared: u32,
    pub phase: GamePhase,
    pub lives: i64,
    pub money: i64,
    pub xp: f64,
    pub towers_built: u32,
    pub upgrades: u32,
    pub meta_gold: i64,
    pub frames: u64,
}

/// What the strategy does during a build phase.
#[derive(Debug, Clone, PartialEq)]
enum Plan {
    Place { at: DVec2, kind: String },
    Upgrade { tower_id: u32 },
    StartWave,
}

/// Candidate build spots, nearest to the path first.
fn candidate_spots(engine: &SimulationEngine) -> Vec<DVec2> {
    let session = engine.session();
    let board = session.board;
    let mut spots: Vec<(f64, DVec2)> = Vec::new();
    let mut y = GRID_STEP;
    while y < board.height {
        let mut x = GRID_STEP;
        while x < board.width {
            let point = DVec2::new(x, y);
            if let Some(nearest) = nearest_point_on_paths(point, &session.paths) {
                spots.push((point.distance(nearest), point));
            }
            x += GRID_STEP;
        }
        y += GRID_STEP;
    }
    spots.sort_by(|a, b| a.0.total_cmp(&b.0));
    spots.into_iter().map(|(_, p)| p).collect()
}

/// Shooting towers the profile can field, cheapest first.
fn shooter_kinds(engine: &SimulationEngine) -> Vec<(String, i64)> {
    let balance = &engine.session().balance;
    let mut kinds: Vec<(String, i64)> = balance
        .towers
        .iter()
        .filter(|(key, t)| {
            !t.is_trap
                && !t.is_hero
                && !matches!(t.effect, EffectKind::Income | EffectKind::Barracks)
                && !engine.loadout().get(*key).is_some_and(|u| u.locked)
        })
        .map(|(key, t)| (key.clone(), t.cost))
        .collect();
    kinds.sort_by_key(|(_, cost)| *cost);
    kinds
}

fn plan(engine: &SimulationEngine, spots: &[DVec2], kinds: &[(String, i64)]) -> Plan {
    let money = engine.money();
    let towers = world_setup::towers_by_id(engine.world());

    // Build out to one tower per kind, then upgrade the weakest.
    let affordable = kinds
        .iter()
        .filter(|(_, cost)| *cost <= money)
        .find(|(kind, _)| !towers.iter().any(|(_, t)| &t.kind == kind));
    if let Some((kind, _)) = affordable {
        if let Some(at) = spots
            .iter()
            .find(|at| engine.check_placement(**at, kind).is_ok())
        {
            return Plan::Place {
                at: *at,
                kind: kind.clone(),
            };
        }
    }

    let rules = &engine.session().rules;
    let weakest = towers
        .iter()
        .filter(|(_, t)| !t.is_paragon)
        .min_by_key(|(_, t)| (t.level, t.id));
    match weakest {
        Some((_, tower)) if upgrade_cost(tower, rules) <= money => Plan::Upgrade {
            tower_id: tower.id,
        },
        _ => Plan::StartWave,
    }
}

/// Placements and upgrades the engine accepted, as `(placed, upgraded)`.
fn count_builds(events: &[GameEvent]) -> (u32, u32) {
    events.iter().fold((0, 0), |(placed, upgraded), event| match event {
        GameEvent::TowerPlaced { .. } => (placed + 1, upgraded),
        GameEvent::TowerUpgraded { .. } => (placed, upgraded + 1),
        _ => (placed, upgraded),
    })
}

/// Meta gold banked for a finished run. A faulted session earns nothing.
fn earned_meta_gold(phase: GamePhase, rules: &Rules, wave_number: u32) -> i64 {
    match phase {
        GamePhase::Faulted => 0,
        _ => rules.meta_gold_for(wave_number),
    }
}

/// Play a session until the wave cap, game over, a fault or the frame budget.
pub fn run_autoplay(config: &AutoplayConfig) -> Result<AutoplayReport, ConfigError> {
    let mut sim_config = SimConfig::builtin(&config.map, &config.difficulty)?;
    sim_config.seed = config.seed;
    sim_config.loadout = config.loadout.clone();
    let mut engine = SimulationEngine::new(sim_config)?;
    engine.queue_command(PlayerCommand::ToggleSpeed);

    let spots = candidate_spots(&engine);
    let kinds = shooter_kinds(&engine);
    let mut towers_built = 0;
    let mut upgrades = 0;
    let mut frames = 0;

    while frames < config.max_frames {
        if engine.wave_number() > config.wave_cap
            || matches!(engine.phase(), GamePhase::GameOver | GamePhase::Faulted)
        {
            break;
        }
        if !engine.wave().active {
            match plan(&engine, &spots, &kinds) {
                Plan::Place { at, kind } => {
                    debug!(kind = %kind, x = at.x, y = at.y, "autoplay placing tower");
                    engine.queue_command(PlayerCommand::PlaceTower {
                        x: at.x,
                        y: at.y,
                        tower_type: kind,
                    });
                }
                Plan::Upgrade { tower_id } => {
                    engine.queue_command(PlayerCommand::UpgradeTower { tower_id });
                }
                Plan::StartWave => engine.queue_command(PlayerCommand::StartWave),
            }
        }
        let snapshot = engine.tick();
        frames += 1;
        let (placed, upgraded) = count_builds(&snapshot.events);
        towers_built += placed;
        upgrades += upgraded;
    }

    let waves_cleared = engine.wave_number().saturating_sub(1);
    let report = AutoplayReport {
        waves_cleared,
        phase: engine.phase(),
        lives: engine.lives(),
        money: engine.money(),
        xp: engine.xp(),
        towers_built,
        upgrades,
        meta_gold: earned_meta_gold(engine.phase(), &engine.session().rules, engine.wave_number()),
        frames,
    };
    info!(
        waves_cleared,
        phase = ?report.phase,
        lives = report.lives,
        meta_gold = report.meta_gold,
        "autoplay finished"
    );
    Ok(report)
}

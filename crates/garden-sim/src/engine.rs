//! Simulation engine: the orchestrator.
//!
//! `SimulationEngine` owns the hecs world and all session state, applies
//! queued player intents between steps, runs the per-phase systems and
//! produces `GameStateSnapshot`s. Completely headless, so every session is
//! reproducible from its seed.

use std::collections::VecDeque;

use glam::DVec2;
use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, error, info};

use garden_core::balance::{BalanceTable, Loadout};
use garden_core::commands::PlayerCommand;
use garden_core::components::Tower;
use garden_core::enums::{GamePhase, GameSpeed, RejectReason};
use garden_core::error::ConfigError;
use garden_core::events::GameEvent;
use garden_core::maps::MapCatalog;
use garden_core::state::GameStateSnapshot;
use garden_core::types::{BoardSize, SimTime};

use crate::error::SimError;
use crate::factories;
use crate::placement::{validate_placement, PlacementContext, PlacementSpot};
use crate::session::{Economy, IdCounters, Session, WaveState};
use crate::systems;
use crate::wave_composer::generate_wave;
use crate::world_setup;

/// Configuration for starting a new session.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed and intents = same session.
    pub seed: u64,
    /// Map key in the catalog.
    pub map: String,
    /// Difficulty key in the balance table.
    pub difficulty: String,
    pub board: BoardSize,
    pub balance: BalanceTable,
    pub maps: MapCatalog,
    /// Tower locks and stock carried in from meta progression.
    pub loadout: Option<Loadout>,
}

impl SimConfig {
    /// A config over the bundled balance table and maps.
    pub fn builtin(map: &str, difficulty: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            seed: 42,
            map: map.to_string(),
            difficulty: difficulty.to_string(),
            board: BoardSize::default(),
            balance: BalanceTable::builtin()?,
            maps: MapCatalog::builtin()?,
            loadout: None,
        })
    }
}

/// The simulation engine. Owns the ECS world and all session state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    speed: GameSpeed,
    rng: ChaCha8Rng,
    session: Session,
    economy: Economy,
    wave: WaveState,
    ids: IdCounters,
    selected: Option<u32>,
    open_quadrant: u8,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<Entity>,
    events: Vec<GameEvent>,
    fault: Option<SimError>,
}

impl SimulationEngine {
    /// Start a session. Fails if any configuration it needs is missing.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.balance.validate()?;
        let map = config.maps.get(&config.map)?.clone();
        map.validate(&config.map)?;
        let difficulty = config.balance.difficulty(&config.difficulty)?.clone();
        let loadout = config.loadout.unwrap_or_default();
        if let Some(missing) = loadout.keys().find(|k| config.balance.tower(k).is_none()) {
            return Err(ConfigError::MissingTowerType(missing.clone()));
        }

        info!(
            map = %config.map,
            difficulty = %config.difficulty,
            seed = config.seed,
            "session started"
        );
        let session = Session::new(config.balance, config.map, map, difficulty, config.board);
        let economy = Economy {
            money: session.difficulty.start_money,
            lives: session.rules.starting_lives,
            xp: 0.0,
            loadout,
        };

        Ok(Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            speed: GameSpeed::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            session,
            economy,
            wave: WaveState::default(),
            ids: IdCounters::default(),
            selected: None,
            open_quadrant: 0,
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            fault: None,
        })
    }

    /// Queue a player command for processing at the next frame boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance one rendered frame and return the resulting snapshot.
    ///
    /// Queued intents are applied first. While playing, the full step runs
    /// once per frame, or twice at fast speed. Paused, over and faulted
    /// sessions only advance the frame counter.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.time.frame += 1;
        self.process_commands();

        for _ in 0..self.speed.steps_per_frame() {
            if self.phase != GamePhase::Playing {
                break;
            }
            if let Err(err) = self.step() {
                self.enter_fault(err);
            }
        }

        self.snapshot()
    }

    /// Current state without advancing.
    pub fn snapshot(&mut self) -> GameStateSnapshot {
        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.phase,
            self.speed,
            &self.wave,
            &self.economy,
            self.selected,
            self.session.map.covered.then_some(self.open_quadrant),
            &self.session.rules,
            events,
        )
    }

    /// Check a spot for a tower type without placing anything.
    pub fn check_placement(
        &self,
        position: DVec2,
        tower_type: &str,
    ) -> Result<PlacementSpot, RejectReason> {
        let Some(config) = self.session.balance.tower(tower_type) else {
            return Err(RejectReason::UnknownTowerType);
        };
        let occupants = world_setup::occupants(&self.world, |kind| {
            self.session.balance.tower(kind).is_some_and(|t| t.is_hero)
        });
        let ctx = PlacementContext {
            map: &self.session.map,
            paths: &self.session.paths,
            board: self.session.board,
            rules: &self.session.rules,
            open_quadrant: Some(self.open_quadrant),
        };
        validate_placement(position, config, &occupants, &ctx).map_err(RejectReason::Placement)
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn speed(&self) -> GameSpeed {
        self.speed
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn money(&self) -> i64 {
        self.economy.money
    }

    pub fn lives(&self) -> i64 {
        self.economy.lives
    }

    pub fn xp(&self) -> f64 {
        self.economy.xp
    }

    pub fn wave_number(&self) -> u32 {
        self.wave.number
    }

    pub fn wave(&self) -> &WaveState {
        &self.wave
    }

    /// Remaining locks and stock after this session's purchases.
    pub fn loadout(&self) -> &Loadout {
        &self.economy.loadout
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The fault that stopped the session, if any.
    pub fn fault(&self) -> Option<&SimError> {
        self.fault.as_ref()
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world access for scenario setup.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Spawn an enemy of the given type at the start of a path, outside any wave.
    pub fn spawn_enemy(&mut self, kind: &str, path_index: usize) -> Option<Entity> {
        let enemy_type = self.session.balance.enemy(kind)?;
        let spawn = *self.session.paths.get(path_index)?.first()?;
        let enemy = factories::make_enemy(
            self.ids.next_enemy(),
            kind,
            enemy_type,
            self.session.enemy_scaling(self.wave.number),
            spawn,
            path_index,
            &self.session.rules,
        );
        Some(world_setup::spawn_enemy(&mut self.world, enemy))
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        if matches!(self.phase, GamePhase::GameOver | GamePhase::Faulted) {
            self.reject(RejectReason::GameNotRunning);
            return;
        }
        let outcome = match command {
            PlayerCommand::TogglePause => {
                self.phase = match self.phase {
                    GamePhase::Playing => GamePhase::Paused,
                    _ => GamePhase::Playing,
                };
                Ok(())
            }
            PlayerCommand::ToggleSpeed => {
                self.speed = self.speed.toggled();
                Ok(())
            }
            PlayerCommand::StartWave => {
                self.start_wave();
                Ok(())
            }
            PlayerCommand::CancelWave => {
                if self.wave.active {
                    debug!(
                        wave = self.wave.number,
                        queued = self.wave.queue.len(),
                        "wave cancelled"
                    );
                }
                self.wave.active = false;
                Ok(())
            }
            PlayerCommand::PlaceTower { x, y, tower_type } => {
                self.place_tower(DVec2::new(x, y), &tower_type)
            }
            PlayerCommand::SelectTower { tower_id } => self.select_tower(tower_id),
            PlayerCommand::UpgradeTower { tower_id } => self.upgrade_tower(tower_id),
            PlayerCommand::SellTower { tower_id } => self.sell_tower(tower_id),
            PlayerCommand::MergeParagon { tower_ids } => self.merge_paragon(tower_ids),
        };
        if let Err(reason) = outcome {
            self.reject(reason);
        }
    }

    fn reject(&mut self, reason: RejectReason) {
        debug!(?reason, "intent rejected");
        self.events.push(GameEvent::IntentRejected { reason });
    }

    /// Start the current wave, resuming a cancelled queue if one is left.
    fn start_wave(&mut self) {
        if self.wave.active {
            return;
        }
        if self.wave.queue.is_empty() {
            let queue = generate_wave(self.wave.number, &self.session.balance.waves, &mut self.rng);
            self.wave.queue = queue.into();
            self.wave.spawn_timer = 0;
        }
        self.wave.active = true;
        info!(wave = self.wave.number, queued = self.wave.queue.len(), "wave started");
        self.events.push(GameEvent::WaveStarted {
            wave: self.wave.number,
            queued: self.wave.queue.len(),
        });
    }

    fn place_tower(&mut self, position: DVec2, kind: &str) -> Result<(), RejectReason> {
        let Some(tower_type) = self.session.balance.tower(kind) else {
            return Err(RejectReason::UnknownTowerType);
        };
        if let Some(unlock) = self.economy.loadout.get(kind) {
            if unlock.locked {
                return Err(RejectReason::TowerLocked);
            }
            if unlock.quantity == Some(0) {
                return Err(RejectReason::OutOfStock);
            }
        }
        if self.economy.money < tower_type.cost {
            return Err(RejectReason::InsufficientFunds);
        }
        let spot = self.check_placement(position, kind)?;

        let id = self.ids.next_tower();
        let tower =
            factories::make_tower(id, kind, tower_type, position, spot, &self.session.rules);
        let cost = tower_type.cost;
        world_setup::spawn_tower(&mut self.world, tower);
        self.economy.money -= cost;
        if let Some(stock) = self
            .economy
            .loadout
            .get_mut(kind)
            .and_then(|unlock| unlock.quantity.as_mut())
        {
            *stock -= 1;
        }
        debug!(tower_id = id, kind, cost, x = position.x, y = position.y, "tower placed");
        self.events.push(GameEvent::TowerPlaced {
            tower_id: id,
            kind: kind.to_string(),
            cost,
        });
        Ok(())
    }

    fn select_tower(&mut self, tower_id: Option<u32>) -> Result<(), RejectReason> {
        match tower_id {
            Some(id) if world_setup::find_tower(&self.world, id).is_none() => {
                Err(RejectReason::UnknownTower)
            }
            _ => {
                self.selected = tower_id;
                Ok(())
            }
        }
    }

    fn upgrade_tower(&mut self, tower_id: u32) -> Result<(), RejectReason> {
        let (entity, tower) =
            world_setup::tower_by_id(&self.world, tower_id).ok_or(RejectReason::UnknownTower)?;
        if tower.is_paragon {
            return Err(RejectReason::ParagonMaxed);
        }
        let rules = &self.session.rules;
        let cost = factories::upgrade_cost(&tower, rules);
        if self.economy.money < cost {
            return Err(RejectReason::InsufficientFunds);
        }
        let upgraded = factories::upgrade(&tower, rules);
        let level = upgraded.level;
        if let Ok(mut stored) = self.world.get::<&mut Tower>(entity) {
            *stored = upgraded;
        }
        self.economy.money -= cost;
        debug!(tower_id, level, cost, "tower upgraded");
        self.events.push(GameEvent::TowerUpgraded {
            tower_id,
            level,
            cost,
        });
        Ok(())
    }

    fn sell_tower(&mut self, tower_id: u32) -> Result<(), RejectReason> {
        let (entity, tower) =
            world_setup::tower_by_id(&self.world, tower_id).ok_or(RejectReason::UnknownTower)?;
        let refund = factories::sell_value(&tower, &self.session.rules);
        world_setup::despawn_tower(&mut self.world, entity, tower_id);
        self.economy.money += refund;
        if self.selected == Some(tower_id) {
            self.selected = None;
        }
        debug!(tower_id, refund, "tower sold");
        self.events.push(GameEvent::TowerSold { tower_id, refund });
        Ok(())
    }

    fn merge_paragon(&mut self, tower_ids: [u32; 3]) -> Result<(), RejectReason> {
        if self.wave.number < self.session.rules.paragon_min_wave {
            return Err(RejectReason::MergeTooEarly);
        }
        let mut sources = Vec::with_capacity(3);
        for id in tower_ids {
            let source =
                world_setup::tower_by_id(&self.world, id).ok_or(RejectReason::UnknownTower)?;
            sources.push(source);
        }
        let [(ea, a), (eb, b), (ec, c)]: [(Entity, Tower); 3] = sources
            .try_into()
            .map_err(|_| RejectReason::MergeMismatch)?;

        let id = self.ids.next_tower();
        let paragon = factories::merge_to_paragon(id, [&a, &b, &c], &self.session.rules)?;
        let kind = paragon.kind.clone();
        for (entity, source) in [(ea, &a), (eb, &b), (ec, &c)] {
            world_setup::despawn_tower(&mut self.world, entity, source.id);
        }
        world_setup::spawn_tower(&mut self.world, paragon);
        self.selected = Some(id);
        info!(tower_id = id, kind = %kind, "paragon formed");
        self.events.push(GameEvent::ParagonFormed {
            tower_id: id,
            kind,
            consumed: tower_ids,
        });
        Ok(())
    }

    /// One simulated step: every phase in order, then the game-over check.
    fn step(&mut self) -> Result<(), SimError> {
        // 1. Spawn
        systems::spawning::run(&mut self.world, &self.session, &mut self.wave, &mut self.ids)?;
        // 2. Enemies: statuses, abilities, movement, deaths, leaks
        systems::enemies::run(
            &mut self.world,
            &self.session,
            &mut self.economy,
            &mut self.events,
            &mut self.despawn_buffer,
        )?;
        // 3. Towers
        systems::towers::run(
            &mut self.world,
            &self.session,
            &mut self.economy,
            &mut self.ids,
            self.time.tick,
            &mut self.events,
        );
        // 4. Soldiers
        systems::soldiers::run(&mut self.world, &self.session.rules, &mut self.despawn_buffer);
        // 5. Projectiles
        systems::projectiles::run(&mut self.world, &self.session.rules, &mut self.despawn_buffer)?;
        // 6. Cleanup and wave completion
        systems::cleanup::run(
            &mut self.world,
            &self.session,
            &mut self.economy,
            &mut self.events,
            &mut self.despawn_buffer,
        )?;
        systems::waves::run(
            &mut self.world,
            &self.session,
            &mut self.wave,
            &mut self.economy,
            &mut self.rng,
            &mut self.open_quadrant,
            &mut self.events,
        );
        self.time.advance();

        // 7. Game over
        if self.economy.lives <= 0 {
            let meta_gold = self.session.rules.meta_gold_for(self.wave.number);
            self.phase = GamePhase::GameOver;
            self.wave.active = false;
            info!(wave = self.wave.number, lives = self.economy.lives, meta_gold, "game over");
            self.events.push(GameEvent::GameOver {
                wave: self.wave.number,
                meta_gold,
            });
        }
        Ok(())
    }

    fn enter_fault(&mut self, err: SimError) {
        error!(error = %err, tick = self.time.tick, "simulation step failed; halting");
        self.phase = GamePhase::Faulted;
        self.events.push(GameEvent::LoopFaulted {
            message: err.to_string(),
        });
        self.fault = Some(err);
    }
}

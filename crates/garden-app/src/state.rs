//! Host state shared between the caller and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use thiserror::Error;

use garden_core::commands::PlayerCommand;
use garden_core::error::ConfigError;
use garden_core::events::GameEvent;
use garden_core::state::GameStateSnapshot;
use garden_sim::engine::{SimConfig, SimulationEngine};

use crate::game_loop;

/// Commands sent from the host to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the simulation engine.
    PlayerCommand(PlayerCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("simulation already running")]
    AlreadyRunning,

    #[error("simulation not started")]
    NotStarted,

    #[error("game loop has stopped")]
    LoopStopped,

    #[error("host state lock poisoned")]
    Poisoned,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to spawn game loop thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Shared host state.
///
/// - `mpsc::Sender` sits in a `Mutex` so the state is `Sync`
/// - the latest snapshot is shared with the game loop thread
pub struct AppState {
    /// `None` before `start_simulation` is called.
    pub command_tx: Mutex<Option<mpsc::Sender<GameLoopCommand>>>,
    /// Updated by the game loop thread after each frame.
    pub latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
    pub running: Mutex<bool>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
            running: Mutex::new(false),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the engine and start the game loop. Configuration errors surface
    /// here, before any thread is spawned.
    pub fn start_simulation(
        &self,
        config: SimConfig,
        event_sink: Option<mpsc::Sender<GameEvent>>,
    ) -> Result<(), AppError> {
        let mut running = self.running.lock().map_err(|_| AppError::Poisoned)?;
        if *running {
            return Err(AppError::AlreadyRunning);
        }

        let engine = SimulationEngine::new(config)?;
        let cmd_tx = game_loop::spawn_game_loop(engine, self.latest_snapshot.clone(), event_sink)?;

        let mut tx_lock = self.command_tx.lock().map_err(|_| AppError::Poisoned)?;
        *tx_lock = Some(cmd_tx);
        *running = true;
        Ok(())
    }

    /// Forward a player command to the running simulation.
    pub fn send_command(&self, command: PlayerCommand) -> Result<(), AppError> {
        let tx_lock = self.command_tx.lock().map_err(|_| AppError::Poisoned)?;
        match tx_lock.as_ref() {
            Some(tx) => tx
                .send(GameLoopCommand::PlayerCommand(command))
                .map_err(|_| AppError::LoopStopped),
            None => Err(AppError::NotStarted),
        }
    }

    /// Latest snapshot, for polling.
    pub fn get_snapshot(&self) -> Result<Option<GameStateSnapshot>, AppError> {
        let lock = self.latest_snapshot.lock().map_err(|_| AppError::Poisoned)?;
        Ok(lock.clone())
    }

    /// Stop the game loop. A no-op when nothing is running.
    pub fn shutdown(&self) -> Result<(), AppError> {
        let mut running = self.running.lock().map_err(|_| AppError::Poisoned)?;
        let mut tx_lock = self.command_tx.lock().map_err(|_| AppError::Poisoned)?;
        if let Some(tx) = tx_lock.take() {
            let _ = tx.send(GameLoopCommand::Shutdown);
        }
        *running = false;
        Ok(())
    }
}

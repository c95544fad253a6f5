//! Game loop thread: runs the simulation engine at 60Hz and publishes snapshots.
//!
//! The engine is built by the caller so configuration errors surface before
//! the thread starts. Commands arrive via an `mpsc` channel. Snapshots are
//! stored in shared state for polling, and events go to an optional sink.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use garden_core::constants::TICK_RATE;
use garden_core::events::GameEvent;
use garden_core::state::GameStateSnapshot;
use garden_sim::engine::SimulationEngine;

use crate::state::GameLoopCommand;

/// Wall-clock duration of one frame. Fast speed runs extra steps per frame
/// inside the engine, so this never changes.
pub const FRAME_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Spawns the game loop in a new thread and returns its command sender.
pub fn spawn_game_loop(
    engine: SimulationEngine,
    latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
    event_sink: Option<mpsc::Sender<GameEvent>>,
) -> std::io::Result<mpsc::Sender<GameLoopCommand>> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    std::thread::Builder::new()
        .name("garden-game-loop".into())
        .spawn(move || {
            run_game_loop(engine, cmd_rx, &latest_snapshot, event_sink);
        })?;

    Ok(cmd_tx)
}

/// Drain every pending command into the engine. Returns false once the loop
/// should stop.
fn drain_commands(engine: &mut SimulationEngine, cmd_rx: &mpsc::Receiver<GameLoopCommand>) -> bool {
    loop {
        match cmd_rx.try_recv() {
            Ok(GameLoopCommand::PlayerCommand(cmd)) => engine.queue_command(cmd),
            Ok(GameLoopCommand::Shutdown) => return false,
            Err(mpsc::TryRecvError::Empty) => return true,
            Err(mpsc::TryRecvError::Disconnected) => return false,
        }
    }
}

/// Advance one frame, then publish the snapshot and its events.
fn run_frame(
    engine: &mut SimulationEngine,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
    event_sink: &mut Option<mpsc::Sender<GameEvent>>,
) {
    let snapshot = engine.tick();

    if let Some(sink) = event_sink.as_ref() {
        let delivered = snapshot
            .events
            .iter()
            .all(|event| sink.send(event.clone()).is_ok());
        if !delivered {
            debug!("event sink dropped; no longer forwarding events");
            *event_sink = None;
        }
    }

    if let Ok(mut lock) = latest_snapshot.lock() {
        *lock = Some(snapshot);
    }
}

/// The game loop. Runs until Shutdown or channel disconnect.
fn run_game_loop(
    mut engine: SimulationEngine,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
    mut event_sink: Option<mpsc::Sender<GameEvent>>,
) {
    info!("game loop started");
    let mut next_frame_time = Instant::now();

    while drain_commands(&mut engine, &cmd_rx) {
        run_frame(&mut engine, latest_snapshot, &mut event_sink);

        next_frame_time += FRAME_DURATION;
        let now = Instant::now();
        if next_frame_time > now {
            std::thread::sleep(next_frame_time - now);
        } else if now - next_frame_time > FRAME_DURATION * 2 {
            // Too far behind; reset to avoid a catch-up spiral.
            next_frame_time = now;
        }
    }
    info!(frame = engine.time().frame, "game loop stopped");
}

//! Game loop thread: runs the simulation engine and forwards its output.
//!
//! The engine is created inside this thread because it's cleaner for ownership.
//! Session events arrive via an `mpsc` channel; outbound messages leave via
//! another. Each tick is scheduled one interval after the previous tick's work
//! completes, so an overloaded tick stretches the cadence instead of
//! overlapping the next one.

use std::io;
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use broadside_core::commands::SessionEvent;
use broadside_core::events::Outbound;
use broadside_core::types::PlayerId;
use broadside_sim::{FrameClock, SimulationEngine};

use crate::config::ServerConfig;

/// Commands sent from the transport to the game loop thread.
#[derive(Debug)]
pub enum LoopCommand {
    /// A session event to forward to the simulation engine.
    Session(PlayerId, SessionEvent),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Spawns the game loop in a new thread.
///
/// Returns the command sender for the transport to use and the thread handle.
pub fn spawn_game_loop(
    config: ServerConfig,
    outbound: mpsc::Sender<Outbound>,
) -> io::Result<(mpsc::Sender<LoopCommand>, JoinHandle<()>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<LoopCommand>();

    let handle = std::thread::Builder::new()
        .name("broadside-game-loop".into())
        .spawn(move || run_game_loop(config, cmd_rx, outbound))?;

    Ok((cmd_tx, handle))
}

/// The game loop. Runs until Shutdown, or until either channel disconnects.
fn run_game_loop(config: ServerConfig, cmd_rx: mpsc::Receiver<LoopCommand>, outbound: mpsc::Sender<Outbound>) {
    let interval = tick_interval(config.tick_rate);
    let mut clock = FrameClock::new(interval, config.sim.max_frame_scale);
    let mut engine = SimulationEngine::new(config.sim);
    info!(tick_rate = config.tick_rate, seed = engine.config().seed, "game loop started");

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(LoopCommand::Session(player, event)) => engine.queue_event(player, event),
                Ok(LoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => {
                    info!(ticks = engine.time().tick, "game loop stopped");
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance one tick at the measured frame scale
        let scale = clock.scale_at(Instant::now());
        let messages = engine.tick_scaled(scale);

        // 3. Hand every message to the transport
        for message in messages {
            if outbound.send(message).is_err() {
                debug!("outbound channel closed");
                return;
            }
        }

        // 4. Schedule the next tick after this one's work
        std::thread::sleep(interval);
    }
}

/// Nominal duration of one tick.
pub fn tick_interval(tick_rate: u32) -> Duration {
    Duration::from_secs(1) / tick_rate.max(1)
}

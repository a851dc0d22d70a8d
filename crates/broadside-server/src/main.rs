use std::io;
use std::sync::mpsc;

use anyhow::{anyhow, Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use broadside_server::config::ServerConfig;
use broadside_server::game_loop::{self, LoopCommand};
use broadside_server::transport;

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    let config = ServerConfig::from_env().context("loading configuration")?;
    info!(tick_rate = config.tick_rate, seed = config.sim.seed, "starting broadside server");

    let (out_tx, out_rx) = mpsc::channel();
    let (cmd_tx, loop_handle) = game_loop::spawn_game_loop(config, out_tx).context("spawning game loop thread")?;

    let writer = std::thread::Builder::new()
        .name("broadside-writer".into())
        .spawn(move || transport::write_outbound(io::stdout().lock(), out_rx))
        .context("spawning writer thread")?;

    let forwarded = transport::read_inbound(io::stdin().lock(), &cmd_tx).context("reading session frames from stdin")?;
    info!(forwarded, "input closed, shutting down");

    // The loop may already be gone if the writer failed.
    let _ = cmd_tx.send(LoopCommand::Shutdown);
    loop_handle.join().map_err(|_| anyhow!("game loop thread panicked"))?;
    writer
        .join()
        .map_err(|_| anyhow!("writer thread panicked"))?
        .context("writing messages to stdout")?;
    Ok(())
}

//! Rock Paper Scissors Arena

use anyhow::Result;
use arena_game::Arena;
use arena_server::config::ArenaArgs;
use clap::Parser;
use std::sync::Arc;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> Result<()> {
    let args = ArenaArgs::parse();
    arena_server::logging::init_tracing();

    let config = args.net.server_config()?;
    let limits = args.limits()?;
    let arena = Arc::new(Arena::new(limits)?);

    tracing::info!(
        static_dir = %args.static_dir.display(),
        history_capacity = limits.history_capacity,
        max_players = limits.max_players,
        "rock paper scissors arena starting"
    );

    let state = arena_server::app::arena_state(arena, args.static_dir);
    arena_server::run("rps-arena", config, state)
}

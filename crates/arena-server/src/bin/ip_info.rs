//! IP Information Service

use anyhow::Result;
use arena_server::config::IpInfoArgs;
use clap::Parser;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> Result<()> {
    let args = IpInfoArgs::parse();
    arena_server::logging::init_tracing();

    let config = args.net.server_config()?;
    arena_server::run("ip-info", config, arena_server::app::ip_info_state())
}

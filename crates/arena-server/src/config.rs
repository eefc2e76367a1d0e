//! Command-line configuration
//!
//! Every flag can also come from the environment (`PORT=9000 rps-arena`).

use anyhow::{Context, Result};
use arena_core::ServerConfig;
use arena_game::ArenaLimits;
use clap::{Args, Parser};
use std::path::PathBuf;
use std::time::Duration;

/// Network flags shared by both services
#[derive(Debug, Clone, Args)]
pub struct NetArgs {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Tokio worker threads
    #[arg(long, env = "WORKERS", default_value_t = num_cpus::get())]
    pub workers: usize,

    /// Largest accepted request body
    #[arg(long, env = "MAX_BODY_BYTES", default_value_t = 1024 * 1024)]
    pub max_body_bytes: usize,

    /// How long shutdown waits for open connections
    #[arg(long, env = "SHUTDOWN_TIMEOUT_MS", default_value_t = 10_000)]
    pub shutdown_timeout_ms: u64,
}

impl NetArgs {
    pub fn server_config(&self) -> Result<ServerConfig> {
        let config = ServerConfig {
            hostname: self.host.clone(),
            port: self.port,
            workers: self.workers,
            max_body_size: self.max_body_bytes,
            shutdown_timeout: Duration::from_millis(self.shutdown_timeout_ms),
        };
        config.validate().context("invalid server configuration")?;
        Ok(config)
    }
}

/// Rock Paper Scissors Arena
#[derive(Debug, Parser)]
#[command(name = "rps-arena", version)]
pub struct ArenaArgs {
    #[command(flatten)]
    pub net: NetArgs,

    /// Directory served under /static/
    #[arg(long, env = "STATIC_DIR", default_value = "./web/static")]
    pub static_dir: PathBuf,

    /// Games kept in the recent history
    #[arg(long, env = "HISTORY_CAPACITY", default_value_t = 1000)]
    pub history_capacity: usize,

    /// Players kept before eviction kicks in
    #[arg(long, env = "MAX_PLAYERS", default_value_t = 500)]
    pub max_players: usize,

    /// Idle seconds after which a player is evicted first
    #[arg(long, env = "INACTIVITY_SECS", default_value_t = 24 * 60 * 60)]
    pub inactivity_secs: i64,
}

impl ArenaArgs {
    pub fn limits(&self) -> Result<ArenaLimits> {
        let inactivity = chrono::Duration::try_seconds(self.inactivity_secs)
            .context("inactivity threshold out of range")?;
        let limits = ArenaLimits::default()
            .history_capacity(self.history_capacity)
            .max_players(self.max_players)
            .inactivity(inactivity);
        limits.validate().context("invalid arena limits")?;
        Ok(limits)
    }
}

/// IP Information Service
#[derive(Debug, Parser)]
#[command(name = "ip-info", version)]
pub struct IpInfoArgs {
    #[command(flatten)]
    pub net: NetArgs,
}

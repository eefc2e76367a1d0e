//! arena-server: the runnable services
//!
//! - `rps-arena` - rock-paper-scissors game server
//! - `ip-info` - reflects the caller's address and request headers
//!
//! Both binaries parse flags, install tracing, build a route table and
//! hand it to [`run`].

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod app;
pub mod config;
pub mod ipinfo;
pub mod logging;
pub mod shutdown;
pub mod views;

use anyhow::{Context, Result};
use arena_core::{Server, ServerConfig, ServerState};

/// Serve `state` until SIGINT/SIGTERM, then drain and return
pub fn run(service: &'static str, config: ServerConfig, state: ServerState) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.workers)
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;

    runtime.block_on(async move {
        let server = Server::new(config, state);
        let listener = server.bind().with_context(|| {
            format!(
                "failed to bind {}:{}",
                server.config().hostname,
                server.config().port
            )
        })?;

        tracing::info!(
            service,
            addr = %listener.local_addr()?,
            workers = server.config().workers,
            "listening"
        );

        let report = server.serve_with_shutdown(listener, shutdown::shutdown_signal()).await?;
        if report.drained {
            tracing::info!("all connections drained");
        } else {
            tracing::warn!(
                remaining = report.remaining,
                "shutdown timed out with connections still open"
            );
        }

        Ok(())
    })
}

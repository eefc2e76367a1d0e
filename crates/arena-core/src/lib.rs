//! arena-core: HTTP plumbing for the arena services
//!
//! Request/response types, a small middleware chain, built-in handlers
//! and a hyper/tokio server loop with graceful shutdown. Both the game
//! server and the IP reflector are assembled from these pieces.
//!
//! ## Features
//! - `compress` - gzip, brotli and deflate response compression (default)

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod error;
pub mod request;
pub mod response;
pub mod middleware;
pub mod handlers;
pub mod server;

// Re-exports
pub use arena_router::{Match, Router};
pub use error::{Error, Result};
pub use request::{Method, Request, RequestBuilder};
pub use response::{Response, ResponseBuilder, StatusCode};

// Middleware re-exports
pub use middleware::{Middleware, MiddlewareChain};

// Handlers re-exports
pub use handlers::{StaticFileConfig, StaticFiles};

pub use server::{
    create_optimized_socket, from_hyper_request, handler, to_hyper_response, ConnectionTracker,
    DynamicHandler, Server, ServerConfig, ServerState, ShutdownReport,
};

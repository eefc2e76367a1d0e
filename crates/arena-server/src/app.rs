//! Route tables for both services

use crate::ipinfo::IpInfo;
use crate::views;
use arena_core::handlers::health;
use arena_core::middleware::{resolve_client_ip, AccessLog, ClientIpPolicy, Compress, Security};
use arena_core::{handler, Method, Request, Response, ServerState, StaticFiles};
use arena_game::{Arena, GameError, PlayRequest};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Serialize `value` as a JSON response body, newline-terminated
fn json<T: Serialize>(value: &T) -> Response {
    match serde_json::to_vec(value) {
        Ok(mut body) => {
            body.push(b'\n');
            Response::json(body)
        }
        Err(err) => {
            tracing::error!(%err, "response encoding failed");
            Response::internal_error("Internal Server Error")
        }
    }
}

fn render(page: Result<String, std::fmt::Error>) -> Response {
    match page {
        Ok(html) => Response::html(html),
        Err(err) => {
            tracing::error!(%err, "template execution error");
            Response::internal_error("Template execution error")
        }
    }
}

/// Game server routes and middleware
///
/// Paths are matched regardless of method; `/play` checks for POST itself.
pub fn arena_state(arena: Arc<Arena>, static_dir: impl Into<PathBuf>) -> ServerState {
    let files = Arc::new(StaticFiles::serve(static_dir));
    let mut state = ServerState::new();

    let play_arena = arena.clone();
    let stats_arena = arena.clone();
    let home_arena = arena;

    state
        .any(
            "/play",
            handler(move |req| {
                let arena = play_arena.clone();
                async move { play(&arena, req) }
            }),
        )
        .any(
            "/api/stats",
            handler(move |_req| {
                let arena = stats_arena.clone();
                async move { json(&arena.stats()) }
            }),
        )
        .any("/health", handler(|_req| async { health() }))
        .any(
            "/static/*path",
            handler(move |req: Request| {
                let files = files.clone();
                async move {
                    let relative = req.param("path").unwrap_or("").to_string();
                    files.handle(&req, &relative).await
                }
            }),
        )
        .fallback(handler(move |_req| {
            let arena = home_arena.clone();
            async move { render(views::render_home(&arena.stats())) }
        }))
        .middleware(Compress::default())
        .middleware(Security::arena())
        .middleware(AccessLog::default());

    state
}

fn play(arena: &Arena, req: Request) -> Response {
    if req.method != Method::Post {
        return Response::method_not_allowed();
    }

    // Only the first JSON value counts; trailing bytes are ignored
    let mut values = serde_json::Deserializer::from_slice(&req.body).into_iter::<PlayRequest>();
    let request = match values.next() {
        Some(Ok(request)) => request,
        _ => return Response::bad_request("Invalid JSON"),
    };

    let client_ip = resolve_client_ip(&ClientIpPolicy::arena(), &req);
    match arena.play(&request, &client_ip) {
        Ok(record) => {
            tracing::debug!(
                id = record.id,
                player = %record.player_name,
                result = %record.result,
                "game played"
            );
            json(&record)
        }
        Err(err @ GameError::MissingFields) => Response::bad_request(&err.to_string()),
        Err(GameError::InvalidMove(_)) => Response::bad_request("Invalid move"),
        Err(err) => {
            tracing::error!(%err, "play failed");
            Response::internal_error("Internal Server Error")
        }
    }
}

/// IP reflector routes
pub fn ip_info_state() -> ServerState {
    let mut state = ServerState::new();

    state
        .any(
            "/api",
            handler(|req: Request| async move { json(&IpInfo::collect(&req).await) }),
        )
        .any("/health", handler(|_req| async { health() }))
        .fallback(handler(|req: Request| async move {
            let info = IpInfo::collect(&req).await;
            render(views::render_ip_info(&info))
        }))
        .middleware(AccessLog::default());

    state
}

//! Game server routes, driven in-process through the server's dispatch path

use arena_core::{Method, RequestBuilder, Response, ServerState, StatusCode};
use arena_game::{Arena, ArenaLimits, FixedOpponent, Move, StatsSnapshot, SystemClock};
use arena_server::app::arena_state;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

fn static_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("web/static")
}

fn app(computer: Move) -> ServerState {
    let arena = Arena::with_parts(
        ArenaLimits::default(),
        Box::new(FixedOpponent(computer)),
        Box::new(SystemClock),
    )
    .unwrap();
    arena_state(Arc::new(arena), static_dir())
}

fn peer() -> SocketAddr {
    "198.51.100.20:40000".parse().unwrap()
}

async fn play(state: &ServerState, body: &str) -> Response {
    play_at(state, "/play", body).await
}

async fn play_at(state: &ServerState, path: &str, body: &str) -> Response {
    let req = RequestBuilder::new(Method::Post, path)
        .header("content-type", "application/json")
        .body(body.to_string())
        .remote_addr(peer())
        .build();
    state.handle(req).await
}

async fn stats(state: &ServerState) -> StatsSnapshot {
    let res = state
        .handle(RequestBuilder::new(Method::Get, "/api/stats").build())
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.content_type(), Some("application/json"));
    serde_json::from_slice(&res.body).unwrap()
}

#[tokio::test]
async fn test_alice_beats_forced_scissors() {
    let state = app(Move::Scissors);

    let res = play(&state, r#"{"player_name":"alice","player_move":"rock"}"#).await;
    assert_eq!(res.status, StatusCode::OK);
    let game: serde_json::Value = serde_json::from_slice(&res.body).unwrap();
    assert_eq!(game["id"], 1);
    assert_eq!(game["player_name"], "alice");
    assert_eq!(game["player_move"], "rock");
    assert_eq!(game["computer_move"], "scissors");
    assert_eq!(game["result"], "win");
    assert_eq!(game["player_ip"], "198.51.100.20:40000");

    let snapshot = stats(&state).await;
    assert_eq!(snapshot.total_games, 1);
    assert_eq!(snapshot.total_players, 1);
    assert_eq!(snapshot.move_stats.rock, 1);
    assert_eq!(snapshot.win_stats.win, 1);
    assert_eq!(snapshot.leaderboard.len(), 1);
    assert_eq!(snapshot.leaderboard[0].name, "alice");
    assert_eq!(snapshot.leaderboard[0].wins, 1);
    assert_eq!(snapshot.leaderboard[0].total, 1);
    assert_eq!(snapshot.leaderboard[0].win_rate(), 100.0);
}

#[tokio::test]
async fn test_play_rejections() {
    let state = app(Move::Rock);

    let get = state
        .handle(RequestBuilder::new(Method::Get, "/play").build())
        .await;
    assert_eq!(get.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(get.body_string().as_deref(), Some("Method not allowed\n"));

    let cases = [
        ("not json", "Invalid JSON\n"),
        ("", "Invalid JSON\n"),
        (r#"{"player_name":"bob"}"#, "Player name and move are required\n"),
        (r#"{"player_name":"","player_move":"rock"}"#, "Player name and move are required\n"),
        (r#"{"player_name":"bob","player_move":"Rock"}"#, "Invalid move\n"),
        (r#"{"player_name":"bob","player_move":"lizard"}"#, "Invalid move\n"),
    ];
    for (body, message) in cases {
        let res = play(&state, body).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(res.body_string().as_deref(), Some(message), "body: {body}");
    }

    // Nothing above touched the books
    let snapshot = stats(&state).await;
    assert_eq!(snapshot.total_games, 0);
    assert_eq!(snapshot.total_players, 0);
}

#[tokio::test]
async fn test_forwarded_address_recorded() {
    let state = app(Move::Paper);
    let req = RequestBuilder::new(Method::Post, "/play")
        .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
        .body(r#"{"player_name":"erin","player_move":"rock"}"#)
        .remote_addr(peer())
        .build();

    let res = state.handle(req).await;
    let game: serde_json::Value = serde_json::from_slice(&res.body).unwrap();
    assert_eq!(game["player_ip"], "203.0.113.7");
    assert_eq!(game["result"], "loss");
}

#[tokio::test]
async fn test_stats_repeatable() {
    let state = app(Move::Rock);
    for (name, mv) in [("a", "paper"), ("b", "rock"), ("c", "scissors")] {
        let body = format!(r#"{{"player_name":"{name}","player_move":"{mv}"}}"#);
        assert_eq!(play(&state, &body).await.status, StatusCode::OK);
    }

    let first = state
        .handle(RequestBuilder::new(Method::Get, "/api/stats").build())
        .await;
    let second = state
        .handle(RequestBuilder::new(Method::Get, "/api/stats").build())
        .await;
    assert_eq!(first.body, second.body);

    let snapshot: StatsSnapshot = serde_json::from_slice(&first.body).unwrap();
    let names: Vec<&str> = snapshot.leaderboard.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
    assert_eq!(snapshot.recent_games[0].player_name, "c");
}

#[tokio::test]
async fn test_health_and_security_headers() {
    let state = app(Move::Rock);
    let res = state
        .handle(RequestBuilder::new(Method::Get, "/health").build())
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body_string().as_deref(), Some("OK"));
    assert_eq!(res.header("x-frame-options"), Some("DENY"));
    assert_eq!(res.header("x-content-type-options"), Some("nosniff"));
    assert_eq!(
        res.header("content-security-policy"),
        Some("default-src 'self'; img-src 'self' data:; script-src 'self'; style-src 'self';")
    );
    assert!(res.header("x-request-id").is_some());
}

#[tokio::test]
async fn test_home_page_escapes_and_compresses() {
    let state = app(Move::Scissors);
    play(&state, r#"{"player_name":"<i>zoe</i>","player_move":"rock"}"#).await;

    let res = state
        .handle(RequestBuilder::new(Method::Get, "/anything/else").build())
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.content_type(), Some("text/html; charset=utf-8"));
    let html = res.body_string().unwrap();
    assert!(html.contains("&lt;i&gt;zoe&lt;/i&gt;"));
    assert!(html.contains("100.0%"));
    assert!(html.contains(">WIN</span>"));

    let gzipped = state
        .handle(
            RequestBuilder::new(Method::Get, "/")
                .header("accept-encoding", "gzip")
                .build(),
        )
        .await;
    assert_eq!(gzipped.header("content-encoding"), Some("gzip"));
    assert_eq!(gzipped.header("vary"), Some("Accept-Encoding"));
    assert!(gzipped.body.len() < html.len());
}

#[tokio::test]
async fn test_static_assets() {
    let state = app(Move::Rock);

    let res = state
        .handle(RequestBuilder::new(Method::Get, "/static/js/game.js").build())
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.content_type(), Some("text/javascript; charset=utf-8"));
    let etag = res.header("etag").unwrap().to_string();
    assert!(!etag.starts_with("W/"));

    let gzipped = state
        .handle(
            RequestBuilder::new(Method::Get, "/static/js/game.js")
                .header("accept-encoding", "gzip")
                .build(),
        )
        .await;
    assert_eq!(gzipped.header("content-encoding"), Some("gzip"));
    let weak = gzipped.header("etag").unwrap().to_string();
    assert_eq!(weak, format!("W/{}", etag));

    // Revalidating with the weakened tag still hits
    let revalidate = state
        .handle(
            RequestBuilder::new(Method::Get, "/static/js/game.js")
                .header("accept-encoding", "gzip")
                .header("if-none-match", weak)
                .build(),
        )
        .await;
    assert_eq!(revalidate.status, StatusCode::NOT_MODIFIED);

    let traversal = state
        .handle(RequestBuilder::new(Method::Get, "/static/../Cargo.toml").build())
        .await;
    assert_eq!(traversal.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_trailing_slash_and_bare_mount() {
    let state = app(Move::Rock);

    // Empty segments are ignored, so "/play/" is the play route
    let res = state
        .handle(RequestBuilder::new(Method::Get, "/play/").build())
        .await;
    assert_eq!(res.status, StatusCode::METHOD_NOT_ALLOWED);

    let res = play_at(&state, "/play/", r#"{"player_name":"sam","player_move":"rock"}"#).await;
    assert_eq!(res.status, StatusCode::OK);

    // The bare mount point resolves to the asset root, which has no index
    let res = state
        .handle(RequestBuilder::new(Method::Get, "/static").build())
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

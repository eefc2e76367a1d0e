//! arena-game: rock-paper-scissors bookkeeping
//!
//! In-memory state behind the game server:
//! - Bounded game ledger (sliding window over recent games)
//! - Player directory with win/loss/draw aggregates and a leaderboard
//! - All-time stats cache updated once per game
//! - Eviction policy capping the directory size
//!
//! ```
//! use arena_game::{Arena, ArenaLimits, FixedOpponent, Move, Outcome, PlayRequest, SystemClock};
//!
//! let arena = Arena::with_parts(
//!     ArenaLimits::default(),
//!     Box::new(FixedOpponent(Move::Scissors)),
//!     Box::new(SystemClock),
//! ).unwrap();
//!
//! let game = arena.play(&PlayRequest::new("alice", "rock"), "127.0.0.1:9000").unwrap();
//! assert_eq!(game.result, Outcome::Win);
//! assert_eq!(arena.stats().move_stats.rock, 1);
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod arena;
pub mod config;
pub mod directory;
pub mod error;
pub mod eviction;
pub mod ledger;
pub mod moves;
pub mod seams;
pub mod stats;

pub use arena::{Arena, PlayRequest, StatsSnapshot};
pub use config::ArenaLimits;
pub use directory::{leaderboard_order, Directory, PlayerAggregate};
pub use error::{GameError, Result};
pub use eviction::{EvictionPolicy, EvictionReport};
pub use ledger::{GameDraft, GameRecord, Ledger};
pub use moves::{resolve, Move, Outcome};
pub use seams::{Clock, FixedOpponent, ManualClock, Opponent, RandomOpponent, SystemClock};
pub use stats::{MoveCounts, OutcomeCounts, StatsCache, StatsCounters};

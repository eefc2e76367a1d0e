//! The arena service object
//!
//! Owns the ledger, directory and stats cache. Locking is two-level:
//!
//! - `books` guards the ledger and directory. `play` holds it for writing
//!   across the whole append/update/evict sequence, `stats` for reading.
//! - The stats cache has its own lock, taken briefly inside `books`.
//!
//! Always acquire `books` before the cache lock.

use crate::{
    resolve, ArenaLimits, Clock, Directory, EvictionPolicy, GameDraft, GameError, GameRecord, Ledger,
    Move, MoveCounts, Opponent, OutcomeCounts, PlayerAggregate, RandomOpponent, Result, StatsCache,
    SystemClock,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Body of a play request
///
/// Absent fields decode as empty strings and are reported as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayRequest {
    pub player_name: String,
    pub player_move: String,
}

impl PlayRequest {
    pub fn new(player_name: impl Into<String>, player_move: impl Into<String>) -> Self {
        Self {
            player_name: player_name.into(),
            player_move: player_move.into(),
        }
    }

    /// Check presence first, then the move itself
    pub fn validate(&self) -> Result<Move> {
        if self.player_name.is_empty() || self.player_move.is_empty() {
            return Err(GameError::MissingFields);
        }
        self.player_move.parse()
    }
}

/// Read model served by the stats endpoint and the home page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total_games: u64,
    pub total_players: usize,
    pub recent_games: Vec<GameRecord>,
    pub leaderboard: Vec<PlayerAggregate>,
    pub move_stats: MoveCounts,
    pub win_stats: OutcomeCounts,
}

struct Books {
    ledger: Ledger,
    directory: Directory,
}

/// Rock-paper-scissors bookkeeping service
pub struct Arena {
    books: RwLock<Books>,
    stats: StatsCache,
    limits: ArenaLimits,
    policy: EvictionPolicy,
    opponent: Box<dyn Opponent>,
    clock: Box<dyn Clock>,
}

impl Arena {
    /// Arena with a random opponent and the system clock
    pub fn new(limits: ArenaLimits) -> Result<Self> {
        Self::with_parts(limits, Box::new(RandomOpponent), Box::new(SystemClock))
    }

    pub fn with_parts(
        limits: ArenaLimits,
        opponent: Box<dyn Opponent>,
        clock: Box<dyn Clock>,
    ) -> Result<Self> {
        limits.validate()?;

        Ok(Self {
            books: RwLock::new(Books {
                ledger: Ledger::new(limits.history_capacity),
                directory: Directory::new(),
            }),
            stats: StatsCache::new(clock.now()),
            policy: EvictionPolicy::new(limits.max_players, limits.inactivity),
            limits,
            opponent,
            clock,
        })
    }

    pub fn limits(&self) -> &ArenaLimits {
        &self.limits
    }

    /// Play one game for `request`, attributed to `client_ip`
    ///
    /// Input is validated before any state is touched.
    pub fn play(&self, request: &PlayRequest, client_ip: &str) -> Result<GameRecord> {
        let player_move = request.validate()?;
        let computer_move = self.opponent.choose();
        let result = resolve(player_move, computer_move);

        let mut books = self.books.write();
        let now = self.clock.now();

        let record = books.ledger.record(GameDraft {
            player_name: request.player_name.clone(),
            player_move,
            computer_move,
            result,
            timestamp: now,
            player_ip: client_ip.to_string(),
        });
        books.directory.apply(&record.player_name, result, now);
        self.stats.apply(player_move, result, now);

        let evicted = self.policy.enforce(&mut books.directory, now);
        if evicted.total() > 0 {
            tracing::debug!(
                stale = evicted.stale,
                overflow = evicted.overflow,
                players = books.directory.len(),
                "evicted players"
            );
        }

        Ok(record)
    }

    /// Assemble the current read model
    pub fn stats(&self) -> StatsSnapshot {
        let books = self.books.read();
        let counters = self.stats.snapshot();

        StatsSnapshot {
            total_games: counters.total_games,
            total_players: books.directory.len(),
            recent_games: books.ledger.recent(self.limits.recent_games),
            leaderboard: books.directory.leaderboard(self.limits.leaderboard_size),
            move_stats: counters.moves,
            win_stats: counters.outcomes,
        }
    }

    /// Copy of one player's aggregate
    pub fn player(&self, name: &str) -> Option<PlayerAggregate> {
        self.books.read().directory.get(name).cloned()
    }

    /// Games currently held in the ledger window
    pub fn history_len(&self) -> usize {
        self.books.read().ledger.len()
    }
}

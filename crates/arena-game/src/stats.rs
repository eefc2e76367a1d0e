//! All-time stats cache
//!
//! Counters updated once per game instead of rescanning history on every
//! read. They cover every game ever played, including the ones that have
//! already slid out of the ledger window.

use crate::{Move, Outcome};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Per-move counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCounts {
    pub rock: u64,
    pub paper: u64,
    pub scissors: u64,
}

impl MoveCounts {
    pub fn get(&self, mv: Move) -> u64 {
        match mv {
            Move::Rock => self.rock,
            Move::Paper => self.paper,
            Move::Scissors => self.scissors,
        }
    }

    fn bump(&mut self, mv: Move) {
        match mv {
            Move::Rock => self.rock += 1,
            Move::Paper => self.paper += 1,
            Move::Scissors => self.scissors += 1,
        }
    }
}

/// Per-outcome counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub win: u64,
    pub loss: u64,
    pub draw: u64,
}

impl OutcomeCounts {
    pub fn get(&self, outcome: Outcome) -> u64 {
        match outcome {
            Outcome::Win => self.win,
            Outcome::Loss => self.loss,
            Outcome::Draw => self.draw,
        }
    }

    fn bump(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win => self.win += 1,
            Outcome::Loss => self.loss += 1,
            Outcome::Draw => self.draw += 1,
        }
    }
}

/// Copy of the cache counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsCounters {
    pub total_games: u64,
    pub moves: MoveCounts,
    pub outcomes: OutcomeCounts,
    pub last_updated: DateTime<Utc>,
}

/// Incrementally maintained counters behind their own lock
#[derive(Debug)]
pub struct StatsCache {
    inner: RwLock<StatsCounters>,
}

impl StatsCache {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            inner: RwLock::new(StatsCounters {
                total_games: 0,
                moves: MoveCounts::default(),
                outcomes: OutcomeCounts::default(),
                last_updated: now,
            }),
        }
    }

    /// Count one game
    pub fn apply(&self, mv: Move, outcome: Outcome, at: DateTime<Utc>) {
        let mut counters = self.inner.write();
        counters.total_games += 1;
        counters.moves.bump(mv);
        counters.outcomes.bump(outcome);
        counters.last_updated = at;
    }

    pub fn snapshot(&self) -> StatsCounters {
        *self.inner.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_counts() {
        let cache = StatsCache::new(Utc::now());
        cache.apply(Move::Rock, Outcome::Win, Utc::now());
        cache.apply(Move::Rock, Outcome::Draw, Utc::now());
        cache.apply(Move::Scissors, Outcome::Loss, Utc::now());

        let snap = cache.snapshot();
        assert_eq!(snap.total_games, 3);
        assert_eq!(snap.moves, MoveCounts { rock: 2, paper: 0, scissors: 1 });
        assert_eq!(snap.outcomes, OutcomeCounts { win: 1, loss: 1, draw: 1 });
        assert_eq!(snap.moves.get(Move::Rock), 2);
        assert_eq!(snap.outcomes.get(Outcome::Draw), 1);
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let cache = StatsCache::new(Utc::now());
        let before = cache.snapshot();
        cache.apply(Move::Paper, Outcome::Win, Utc::now());

        assert_eq!(before.total_games, 0);
        assert_eq!(cache.snapshot().total_games, 1);
    }

    #[test]
    fn test_counter_json_names() {
        let json = serde_json::to_value(OutcomeCounts { win: 1, loss: 2, draw: 3 }).unwrap();
        assert_eq!(json, serde_json::json!({"win": 1, "loss": 2, "draw": 3}));
    }
}

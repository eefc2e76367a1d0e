//! Bounded game history
//!
//! A sliding window over completed games. Once the window is full the
//! oldest record is dropped on every append; dropped records are gone
//! for good.

use crate::{Move, Outcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A completed game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: u64,
    pub player_name: String,
    pub player_move: Move,
    pub computer_move: Move,
    pub result: Outcome,
    pub timestamp: DateTime<Utc>,
    pub player_ip: String,
}

/// A game waiting for its sequence id
#[derive(Debug, Clone)]
pub struct GameDraft {
    pub player_name: String,
    pub player_move: Move,
    pub computer_move: Move,
    pub result: Outcome,
    pub timestamp: DateTime<Utc>,
    pub player_ip: String,
}

impl GameDraft {
    fn into_record(self, id: u64) -> GameRecord {
        GameRecord {
            id,
            player_name: self.player_name,
            player_move: self.player_move,
            computer_move: self.computer_move,
            result: self.result,
            timestamp: self.timestamp,
            player_ip: self.player_ip,
        }
    }
}

/// Ordered, capacity-bounded game history
#[derive(Debug)]
pub struct Ledger {
    records: VecDeque<GameRecord>,
    capacity: usize,
    next_id: u64,
}

impl Ledger {
    /// Create an empty ledger keeping at most `capacity` records
    pub fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            next_id: 1,
        }
    }

    /// Assign the next id, append, and drop whatever falls out of the window
    pub fn record(&mut self, draft: GameDraft) -> GameRecord {
        let record = draft.into_record(self.next_id);
        self.next_id += 1;

        self.records.push_back(record.clone());
        while self.records.len() > self.capacity {
            self.records.pop_front();
        }

        record
    }

    /// Up to `k` most recent records, newest first
    pub fn recent(&self, k: usize) -> Vec<GameRecord> {
        self.records.iter().rev().take(k).cloned().collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

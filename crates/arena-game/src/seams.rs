//! Time and opponent sources
//!
//! The arena never calls `Utc::now()` or a RNG directly, so tests can pin
//! both.

use crate::Move;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use rand::Rng;

/// Source of "now"
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, at: DateTime<Utc>) {
        *self.now.lock() = at;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// Picks the computer's move
pub trait Opponent: Send + Sync {
    fn choose(&self) -> Move;
}

/// Uniform over the three moves
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomOpponent;

impl Opponent for RandomOpponent {
    fn choose(&self) -> Move {
        Move::ALL[rand::thread_rng().gen_range(0..Move::ALL.len())]
    }
}

/// Always plays the same move
#[derive(Debug, Clone, Copy)]
pub struct FixedOpponent(pub Move);

impl Opponent for FixedOpponent {
    fn choose(&self) -> Move {
        self.0
    }
}

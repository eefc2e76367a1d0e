//! Player directory
//!
//! Running win/loss/draw counters per player name, created on first play.

use crate::Outcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Running totals for one player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerAggregate {
    pub name: String,
    pub wins: u64,
    pub losses: u64,
    pub draws: u64,
    pub total: u64,
    pub last_active: DateTime<Utc>,
}

impl PlayerAggregate {
    /// Zeroed aggregate; `last_active` is the epoch until the first game
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            wins: 0,
            losses: 0,
            draws: 0,
            total: 0,
            last_active: DateTime::<Utc>::default(),
        }
    }

    /// Win percentage in 0..=100, 0 when no games were played
    pub fn win_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.wins as f64 / self.total as f64 * 100.0
        }
    }

    /// wins/total as an exact fraction; 0/1 for a player with no games
    fn rate_fraction(&self) -> (u128, u128) {
        if self.total == 0 {
            (0, 1)
        } else {
            (self.wins as u128, self.total as u128)
        }
    }
}

/// Leaderboard order: win rate desc, total desc, name asc
pub fn leaderboard_order(a: &PlayerAggregate, b: &PlayerAggregate) -> Ordering {
    let (an, ad) = a.rate_fraction();
    let (bn, bd) = b.rate_fraction();

    (bn * ad)
        .cmp(&(an * bd))
        .then_with(|| b.total.cmp(&a.total))
        .then_with(|| a.name.cmp(&b.name))
}

/// Player name to aggregate mapping
#[derive(Debug, Default)]
pub struct Directory {
    players: HashMap<String, PlayerAggregate>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Existing aggregate for `name`, or a freshly zeroed one
    pub fn upsert(&mut self, name: &str) -> &mut PlayerAggregate {
        self.players
            .entry(name.to_string())
            .or_insert_with(|| PlayerAggregate::new(name))
    }

    /// Count one game for `name` and mark it active at `at`
    pub fn apply(&mut self, name: &str, outcome: Outcome, at: DateTime<Utc>) -> &PlayerAggregate {
        let player = self.upsert(name);
        match outcome {
            Outcome::Win => player.wins += 1,
            Outcome::Loss => player.losses += 1,
            Outcome::Draw => player.draws += 1,
        }
        player.total += 1;
        player.last_active = at;
        player
    }

    /// Top `k` players in leaderboard order
    pub fn leaderboard(&self, k: usize) -> Vec<PlayerAggregate> {
        let mut board: Vec<&PlayerAggregate> = self.players.values().collect();
        board.sort_by(|a, b| leaderboard_order(a, b));
        board.into_iter().take(k).cloned().collect()
    }

    pub fn get(&self, name: &str) -> Option<&PlayerAggregate> {
        self.players.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<PlayerAggregate> {
        self.players.remove(name)
    }

    /// Drop every player for which `keep` returns false; returns how many went
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&PlayerAggregate) -> bool,
    {
        let before = self.players.len();
        self.players.retain(|_, p| keep(p));
        before - self.players.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerAggregate> {
        self.players.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn play(dir: &mut Directory, name: &str, wins: u64, losses: u64) {
        for _ in 0..wins {
            dir.apply(name, Outcome::Win, at(1));
        }
        for _ in 0..losses {
            dir.apply(name, Outcome::Loss, at(1));
        }
    }

    #[test]
    fn test_upsert_creates_zeroed() {
        let mut dir = Directory::new();
        let p = dir.upsert("alice");
        assert_eq!(p.total, 0);
        assert_eq!(p.win_rate(), 0.0);
        assert_eq!(dir.len(), 1);

        dir.upsert("alice");
        assert_eq!(dir.len(), 1);
    }

    #[test]
    fn test_apply_counts_and_touches() {
        let mut dir = Directory::new();
        dir.apply("bob", Outcome::Win, at(10));
        dir.apply("bob", Outcome::Draw, at(20));
        let bob = dir.apply("bob", Outcome::Loss, at(30));

        assert_eq!((bob.wins, bob.losses, bob.draws, bob.total), (1, 1, 1, 3));
        assert_eq!(bob.last_active, at(30));
    }

    #[test]
    fn test_rate_beats_volume() {
        let mut dir = Directory::new();
        play(&mut dir, "three_of_four", 3, 1);
        play(&mut dir, "half_of_many", 50, 50);

        let board = dir.leaderboard(10);
        assert_eq!(board[0].name, "three_of_four");
        assert_eq!(board[1].name, "half_of_many");
    }

    #[test]
    fn test_equal_rate_more_games_first() {
        let mut dir = Directory::new();
        play(&mut dir, "small", 1, 1);
        play(&mut dir, "large", 4, 4);

        let board = dir.leaderboard(10);
        assert_eq!(board[0].name, "large");
        assert_eq!(board[1].name, "small");
    }

    #[test]
    fn test_full_tie_by_name() {
        let mut dir = Directory::new();
        play(&mut dir, "zed", 1, 0);
        play(&mut dir, "amy", 1, 0);

        let names: Vec<String> = dir.leaderboard(10).into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["amy", "zed"]);
    }

    #[test]
    fn test_no_games_ranks_below_any_win() {
        let mut dir = Directory::new();
        dir.upsert("idle");
        play(&mut dir, "one_in_three", 1, 2);

        let board = dir.leaderboard(10);
        assert_eq!(board[0].name, "one_in_three");
        assert_eq!(board[1].name, "idle");
    }

    #[test]
    fn test_leaderboard_truncates() {
        let mut dir = Directory::new();
        for i in 0..15 {
            play(&mut dir, &format!("p{:02}", i), 1, 0);
        }
        assert_eq!(dir.leaderboard(10).len(), 10);
        assert_eq!(dir.leaderboard(100).len(), 15);
    }
}

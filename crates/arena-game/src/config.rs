//! Bookkeeping limits

use crate::{GameError, Result};
use chrono::Duration;

/// Sizes and thresholds for the arena's in-memory state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaLimits {
    /// Games kept in the ledger window
    pub history_capacity: usize,
    /// Directory cap enforced by eviction
    pub max_players: usize,
    /// Idle time after which a player is evictable first
    pub inactivity: Duration,
    /// Games listed in a stats snapshot
    pub recent_games: usize,
    /// Players listed in a stats snapshot
    pub leaderboard_size: usize,
}

impl Default for ArenaLimits {
    fn default() -> Self {
        Self {
            history_capacity: 1000,
            max_players: 500,
            inactivity: Duration::hours(24),
            recent_games: 10,
            leaderboard_size: 10,
        }
    }
}

impl ArenaLimits {
    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn max_players(mut self, max: usize) -> Self {
        self.max_players = max;
        self
    }

    pub fn inactivity(mut self, idle: Duration) -> Self {
        self.inactivity = idle;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.history_capacity == 0 {
            return Err(GameError::InvalidConfig("history capacity must be at least 1".into()));
        }
        if self.max_players == 0 {
            return Err(GameError::InvalidConfig("max players must be at least 1".into()));
        }
        if self.inactivity <= Duration::zero() {
            return Err(GameError::InvalidConfig("inactivity threshold must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let limits = ArenaLimits::default();
        assert_eq!(limits.history_capacity, 1000);
        assert_eq!(limits.max_players, 500);
        assert_eq!(limits.inactivity, Duration::hours(24));
        assert!(limits.validate().is_ok());
    }

    #[test]
    fn test_zero_values_rejected() {
        assert!(ArenaLimits::default().history_capacity(0).validate().is_err());
        assert!(ArenaLimits::default().max_players(0).validate().is_err());
        assert!(matches!(
            ArenaLimits::default().inactivity(Duration::zero()).validate(),
            Err(GameError::InvalidConfig(_))
        ));
    }
}

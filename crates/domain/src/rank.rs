//! Ranks within the division hierarchy.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// An entity's rank. Valid ranks start at 1; the ceiling is configured by
/// the engine (`MAX_LEVEL` by default).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rank(u8);

impl Rank {
    pub const MAX_LEVEL: Rank = Rank(30);
    /// Largest representable rank, used when validating a configured ceiling.
    pub const HIGHEST: Rank = Rank(u8::MAX);

    // Predefined ranks
    pub const GOD: Rank = Rank(30);
    pub const DIRECTOR: Rank = Rank(29);
    pub const ADMIN: Rank = Rank(28);
    pub const SYSCODER: Rank = Rank(27);
    pub const SYSBUILDER: Rank = Rank(26);
    pub const GENERAL_BUILDER: Rank = Rank(25);
    pub const EMPIRE_HEAD: Rank = Rank(24);
    pub const EMPIRE_ADMIN: Rank = Rank(23);
    pub const EMPIRE_BUILDER: Rank = Rank(22);
    pub const RP_ADMIN: Rank = Rank(21);
    pub const BUILDER: Rank = Rank(20);
    pub const IC_LEADER: Rank = Rank(19);
    pub const PLAYER: Rank = Rank(3);
    pub const UNREGISTERED: Rank = Rank(2);
    pub const GUEST: Rank = Rank(1);

    /// Build a rank, rejecting zero and anything above `max`.
    pub fn new(value: u8, max: Rank) -> Result<Self, DomainError> {
        if value == 0 {
            return Err(DomainError::validation("rank must be at least 1"));
        }
        if value > max.0 {
            return Err(DomainError::validation(format!(
                "rank {} exceeds maximum of {}",
                value, max.0
            )));
        }
        Ok(Self(value))
    }

    /// Build a rank from persisted data, clamping into `1..=max`.
    pub fn clamped(value: i64, max: Rank) -> Self {
        Self(value.clamp(1, i64::from(max.0)) as u8)
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

impl Default for Rank {
    fn default() -> Self {
        Rank::GUEST
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

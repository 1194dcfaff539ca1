//! Engine configuration.
//!
//! Values come from the environment (optionally seeded from `.env` files by
//! the binary) and fall back to the stock game settings.

use std::str::FromStr;

use divscope_domain::{Dbref, Rank};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

impl ConfigError {
    fn invalid(key: &'static str, message: impl ToString) -> Self {
        Self::Invalid {
            key,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// The all-powerful actor.
    pub root: Dbref,
    /// Highest rank; root always reads as this.
    pub max_rank: Rank,
    /// Rank given to entities left outside any division.
    pub rank_floor: Rank,
    /// Rank of entities with no recorded rank.
    pub default_rank: Rank,
    /// Group every player may hold regardless of division.
    pub default_group: String,
    /// Owner hops allowed when borrowing an owner's powers.
    pub max_inherit_depth: usize,
    /// Fee asked of the owner when creating a division.
    pub division_cost: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            root: Dbref::new(1),
            max_rank: Rank::MAX_LEVEL,
            rank_floor: Rank::UNREGISTERED,
            default_rank: Rank::GUEST,
            default_group: "Player".to_string(),
            max_inherit_depth: 12,
            division_cost: 0,
        }
    }
}

impl EngineConfig {
    /// Read `DIVSCOPE_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; missing keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let root = parse_or(&lookup, "DIVSCOPE_ROOT", defaults.root)?;
        let max_rank = match lookup("DIVSCOPE_MAX_RANK") {
            Some(raw) => parse_rank("DIVSCOPE_MAX_RANK", &raw, Rank::HIGHEST)?,
            None => defaults.max_rank,
        };
        let rank_floor = match lookup("DIVSCOPE_RANK_FLOOR") {
            Some(raw) => parse_rank("DIVSCOPE_RANK_FLOOR", &raw, max_rank)?,
            None => defaults.rank_floor.min(max_rank),
        };
        let default_group = lookup("DIVSCOPE_DEFAULT_GROUP")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.default_group);
        let max_inherit_depth = parse_or(
            &lookup,
            "DIVSCOPE_MAX_INHERIT_DEPTH",
            defaults.max_inherit_depth,
        )?;
        let division_cost = parse_or(&lookup, "DIVSCOPE_DIVISION_COST", defaults.division_cost)?;

        Ok(Self {
            root,
            max_rank,
            rank_floor,
            default_rank: defaults.default_rank,
            default_group,
            max_inherit_depth,
            division_cost,
        })
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ConfigError::invalid(key, format!("'{}': {}", raw, e))),
        None => Ok(default),
    }
}

fn parse_rank(key: &'static str, raw: &str, max: Rank) -> Result<Rank, ConfigError> {
    let value: u8 = raw
        .trim()
        .parse()
        .map_err(|e| ConfigError::invalid(key, format!("'{}': {}", raw, e)))?;
    Rank::new(value, max).map_err(|e| ConfigError::invalid(key, e))
}

//! `Power[:Tier]` tokens.
//!
//! Operators and the persisted database both describe tier assignments as
//! space separated tokens:
//!
//! - `Boot` requests `Yes`
//! - `Boot:LTE`, `Boot:2` request an explicit tier
//! - `!Boot` requests `No` (removal)
//!
//! Operator input is parsed strictly so a typo never silently becomes a
//! revocation; persisted lists are parsed leniently.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::tier::Tier;

/// Leading character that turns a token into a removal.
pub const NOT_TOKEN: char = '!';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerToken {
    pub name: String,
    pub tier: Tier,
}

impl PowerToken {
    pub fn new(name: impl Into<String>, tier: Tier) -> Self {
        Self {
            name: name.into(),
            tier,
        }
    }

    /// Parse an operator-supplied token.
    pub fn parse(token: &str) -> Result<Self, DomainError> {
        Self::parse_with(token, |raw| raw.parse())
    }

    /// Parse a persisted token; unknown tier spellings read as `No`.
    pub fn parse_lenient(token: &str) -> Result<Self, DomainError> {
        Self::parse_with(token, |raw| Ok(Tier::parse_lenient(raw)))
    }

    fn parse_with(
        token: &str,
        tier_of: impl Fn(&str) -> Result<Tier, DomainError>,
    ) -> Result<Self, DomainError> {
        let token = token.trim();
        if let Some(name) = token.strip_prefix(NOT_TOKEN) {
            return Self::named(name, Tier::No);
        }
        match token.split_once(':') {
            Some((name, tier)) => Self::named(name, tier_of(tier.trim_start())?),
            None => Self::named(token, Tier::Yes),
        }
    }

    fn named(name: &str, tier: Tier) -> Result<Self, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::parse("power token without a power name"));
        }
        Ok(Self::new(name, tier))
    }

    /// Persisted form, `Name:<digit>`.
    pub fn to_persisted(&self) -> String {
        format!("{}:{}", self.name, self.tier.code())
    }
}

impl fmt::Display for PowerToken {
    /// Display form: bare name for `Yes`, `Name(YesLTE)` for partial tiers.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tier {
            Tier::Yes => write!(f, "{}", self.name),
            tier => write!(f, "{}({})", self.name, tier),
        }
    }
}

/// Split a space separated token list, dropping empty entries.
pub fn split_tokens(list: &str) -> impl Iterator<Item = &str> {
    list.split_whitespace()
}

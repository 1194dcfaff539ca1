//! Comparator variants selected when a power is registered.
//!
//! The variant decides how a held tier is turned into a yes/no answer for a
//! particular actor/target pair. Evaluation needs ranks, ownership and
//! nested power checks, so it lives in the engine; this module only carries
//! the tag and its persisted type name.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparator {
    /// Usable only over oneself.
    SelfOnly,
    /// Rank-graded: Yes over anyone, YesLTE over equal or lower, YesLT over lower.
    LevelCheck,
    /// Usable over equal or lower ranks regardless of tier.
    LevelCheckLte,
    /// `LevelCheck`, plus the "Division" power when the target is a division.
    LevelSet,
    /// Requires the "Builder" power and an equal or higher rank.
    BuilderCreate,
}

impl Comparator {
    pub fn all() -> &'static [Comparator] {
        &[
            Comparator::SelfOnly,
            Comparator::LevelCheck,
            Comparator::LevelCheckLte,
            Comparator::LevelSet,
            Comparator::BuilderCreate,
        ]
    }

    /// Type name used in the persisted power section.
    pub fn type_name(self) -> &'static str {
        match self {
            Comparator::SelfOnly => "self",
            Comparator::LevelCheck => "levchk",
            Comparator::LevelCheckLte => "levchk_lte",
            Comparator::LevelSet => "levset",
            Comparator::BuilderCreate => "bcreate",
        }
    }

    /// Whether the three tiers need their own bit positions.
    pub fn distinguishes_tiers(self) -> bool {
        matches!(self, Comparator::LevelCheck | Comparator::LevelSet)
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

impl FromStr for Comparator {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Comparator::all()
            .iter()
            .copied()
            .find(|c| c.type_name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DomainError::parse(format!("Unknown power type: {}", s)))
    }
}

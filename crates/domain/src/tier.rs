//! Grant tiers.
//!
//! A power is never simply "held": it is held at one of three tiers, each of
//! which widens the set of targets the holder may act on.
//!
//! | Tier     | Digit | Meaning                                  |
//! |----------|-------|------------------------------------------|
//! | `No`     | 0     | Not held                                 |
//! | `YesLt`  | 1     | Only over strictly lower-ranked targets  |
//! | `YesLte` | 2     | Over targets ranked at or below the actor|
//! | `Yes`    | 3     | Unconditional                            |
//!
//! The derived ordering follows the digit, so `tier_a > tier_b` reads as
//! "tier_a grants more than tier_b".

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    #[default]
    No,
    YesLt,
    YesLte,
    Yes,
}

impl Tier {
    /// All tiers from lowest to highest.
    pub fn all() -> &'static [Tier] {
        &[Tier::No, Tier::YesLt, Tier::YesLte, Tier::Yes]
    }

    /// Numeric code used in persisted `Name:<digit>` lists.
    pub fn code(self) -> u8 {
        match self {
            Tier::No => 0,
            Tier::YesLt => 1,
            Tier::YesLte => 2,
            Tier::Yes => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Tier::No),
            1 => Some(Tier::YesLt),
            2 => Some(Tier::YesLte),
            3 => Some(Tier::Yes),
            _ => None,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Tier::No => "No",
            Tier::YesLt => "YesLT",
            Tier::YesLte => "YesLTE",
            Tier::Yes => "Yes",
        }
    }

    pub fn is_granted(self) -> bool {
        self > Tier::No
    }

    /// Lenient parse used for persisted data: anything unrecognised is `No`.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or(Tier::No)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Tier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "3" => Ok(Tier::Yes),
            "yeslte" | "lte" | "2" => Ok(Tier::YesLte),
            "yeslt" | "lt" | "1" => Ok(Tier::YesLt),
            "no" | "0" => Ok(Tier::No),
            _ => Err(DomainError::parse(format!("Unknown tier: {}", s))),
        }
    }
}

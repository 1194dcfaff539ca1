use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

macro_rules! define_ref {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            pub const fn raw(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $prefix, self.0)
            }
        }

        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                Self(value)
            }
        }

        impl From<$name> for u32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

// Game database object reference
define_ref!(Dbref, "#");

impl FromStr for Dbref {
    type Err = DomainError;

    /// Accepts `#12` as well as a bare `12`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        digits
            .parse::<u32>()
            .map(Dbref)
            .map_err(|_| DomainError::invalid_dbref(format!("not a dbref: '{}'", s)))
    }
}

/// Parse an optional dbref where `#-1`, `-1` and an empty string mean "none".
pub fn parse_optional_dbref(s: &str) -> Result<Option<Dbref>, DomainError> {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed == "#-1" || trimmed == "-1" {
        return Ok(None);
    }
    trimmed.parse().map(Some)
}

/// Render an optional dbref the way the database does (`#-1` for none).
pub fn format_optional_dbref(dbref: Option<Dbref>) -> String {
    match dbref {
        Some(d) => d.to_string(),
        None => "#-1".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dbref_parses_with_and_without_hash() {
        assert_eq!("#12".parse::<Dbref>().unwrap(), Dbref::new(12));
        assert_eq!("7".parse::<Dbref>().unwrap(), Dbref::new(7));
        assert!("#abc".parse::<Dbref>().is_err());
    }

    #[test]
    fn optional_dbref_treats_minus_one_as_none() {
        assert_eq!(parse_optional_dbref("#-1").unwrap(), None);
        assert_eq!(parse_optional_dbref("").unwrap(), None);
        assert_eq!(parse_optional_dbref("#3").unwrap(), Some(Dbref::new(3)));
        assert_eq!(format_optional_dbref(None), "#-1");
        assert_eq!(format_optional_dbref(Some(Dbref::new(4))), "#4");
    }
}

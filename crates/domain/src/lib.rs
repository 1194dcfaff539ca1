//! Value types for division-scoped authorization.
//!
//! Everything here is plain data: object references, grant tiers, ranks,
//! comparator tags and the `Power[:Tier]` tokens operators type. The
//! engine crate builds the registries and checks on top of these.

pub mod comparator;
pub mod entity_kind;
pub mod error;
pub mod ids;
pub mod names;
pub mod power_token;
pub mod rank;
pub mod tier;

pub use comparator::Comparator;
pub use entity_kind::EntityKind;
pub use error::DomainError;
pub use ids::{format_optional_dbref, parse_optional_dbref, Dbref};
pub use names::validate_name;
pub use power_token::{split_tokens, PowerToken, NOT_TOKEN};
pub use rank::Rank;
pub use tier::Tier;

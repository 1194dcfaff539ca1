//! Entity modules - in-memory authorization state.
//!
//! The power table, group table and per-entity scope records all live in
//! one owned [`PowerSpace`]; use cases borrow it mutably for the duration
//! of a single operation.

pub mod allocator;
pub mod bitset;
pub mod power;
pub mod power_group;
pub mod power_space;
pub mod scope;

pub use allocator::BitAllocator;
pub use bitset::CapabilityBitset;
pub use power::{name_key, Alias, Power, PowerBits, PowerTable};
pub use power_group::{GroupList, GroupTable, PowerGroup};
pub use power_space::PowerSpace;
pub use scope::{ScopeRecord, ScopeTable};

use divscope_domain::DomainError;

/// Failures of the power and group tables.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Invalid name: {0}")]
    InvalidName(#[from] DomainError),

    #[error("{kind} '{name}' already exists")]
    Duplicate { kind: &'static str, name: String },

    #[error("No such {kind} '{name}'")]
    NotFound { kind: &'static str, name: String },

    #[error("'{alias}' already refers to power '{existing}'")]
    AliasConflict { alias: String, existing: String },

    #[error("'{0}' is a power name, not an alias")]
    NotAnAlias(String),

    /// Growing the shared bitsets failed; nothing was changed.
    #[error("Unable to grow capability storage to {bytes} bytes")]
    Allocation { bytes: usize },
}

impl RegistryError {
    pub fn not_found(kind: &'static str, name: impl ToString) -> Self {
        Self::NotFound {
            kind,
            name: name.to_string(),
        }
    }

    pub fn duplicate(kind: &'static str, name: impl ToString) -> Self {
        Self::Duplicate {
            kind,
            name: name.to_string(),
        }
    }
}

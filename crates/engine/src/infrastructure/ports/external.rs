//! Collaborator port traits: the game's object store, economy, and the
//! notification, audit and fatal-error sinks.

use chrono::{DateTime, Utc};
use divscope_domain::{Dbref, EntityKind, PowerToken};
use serde::{Deserialize, Serialize};

use super::error::RepoError;

// =============================================================================
// Object Store
// =============================================================================

/// Read access to the game's object database, plus creation of new objects.
#[cfg_attr(test, mockall::automock)]
pub trait ObjectDirectory: Send + Sync {
    fn is_valid(&self, dbref: Dbref) -> bool;

    fn kind(&self, dbref: Dbref) -> Option<EntityKind>;

    fn owner(&self, dbref: Dbref) -> Option<Dbref>;

    /// Whether the object may borrow its owner's powers.
    fn inherits_owner_powers(&self, dbref: Dbref) -> bool;

    /// Every object owned by `owner`, the owner included if it owns itself.
    fn owned_by(&self, owner: Dbref) -> Vec<Dbref>;

    fn create_object(&self, owner: Dbref, name: &str, kind: EntityKind)
        -> Result<Dbref, RepoError>;
}

// =============================================================================
// Economy
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait EconomyPort: Send + Sync {
    fn can_pay_fees(&self, payer: Dbref, amount: u32) -> bool;

    /// Charge `count` objects of quota to a division. False when short.
    fn pay_quota(&self, division: Dbref, count: u32) -> bool;

    fn refund_quota(&self, division: Dbref, count: u32);
}

// =============================================================================
// Notifications
// =============================================================================

/// Structured messages for the command layer to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notice {
    DivisionSet { division: Dbref, by: Dbref },
    DivisionReset { by: Dbref },
    DivisionCleared { division: Dbref },
    Empowered { by: Dbref, powers: Vec<PowerToken> },
    GroupAdded { group: String, by: Dbref },
    GroupRemoved { group: String, by: Dbref },
    RankSet { rank: u8, by: Dbref },
}

#[cfg_attr(test, mockall::automock)]
pub trait NotifySink: Send + Sync {
    fn notify(&self, recipient: Dbref, notice: Notice);
}

// =============================================================================
// Audit
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub at: DateTime<Utc>,
    pub actor: Dbref,
    pub target: Dbref,
    pub action: String,
}

#[cfg_attr(test, mockall::automock)]
pub trait AuditSink: Send + Sync {
    fn record(&self, entry: AuditEntry);
}

// =============================================================================
// Fatal errors
// =============================================================================

/// Receives unrecoverable engine failures. Implementations never return.
pub trait FatalSink: Send + Sync {
    fn fatal(&self, message: &str) -> !;
}

//! Administrative operation errors.

use divscope_domain::{DomainError, PowerToken};
use serde::Serialize;

use crate::entities::RegistryError;
use crate::infrastructure::ports::RepoError;

/// Why an administrative operation was refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Denial {
    #[error("missing the '{power}' power over the target")]
    MissingPower { power: String },
    #[error("target is outside the actor's divisions")]
    OutOfScope,
    #[error("target may not hold power group '{group}'")]
    NotEligible { group: String },
    #[error("actor lacks '{power}' at the tier power group '{group}' allows")]
    LacksCeilingPower { power: String, group: String },
    #[error("target already holds power group '{group}'")]
    AlreadyAssigned { group: String },
    #[error("target does not hold power group '{group}'")]
    NotAssigned { group: String },
    #[error("unable to pay the fee")]
    InsufficientFees,
    #[error("destination division is out of quota")]
    QuotaExceeded,
    #[error("may not lower one's own rank")]
    SelfDemotion,
    #[error("requested rank exceeds what the actor may set")]
    RankAboveActor,
    #[error("only the root actor may do this")]
    RootOnly,
    #[error("a division may not be moved under itself")]
    WouldCreateCycle,
    #[error("an object may not be its own division")]
    SelfTarget,
    #[error("{0} is not a division")]
    NotADivision(divscope_domain::Dbref),
}

#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("Permission denied: {0}")]
    Denied(#[from] Denial),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },
    #[error("Validation error: {0}")]
    Validation(#[from] DomainError),
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl AdminError {
    pub fn denied(denial: Denial) -> Self {
        Self::Denied(denial)
    }

    pub fn missing_power(power: &str) -> Self {
        Self::Denied(Denial::MissingPower {
            power: power.to_string(),
        })
    }

    pub fn not_found(kind: &'static str, name: impl ToString) -> Self {
        Self::NotFound {
            kind,
            name: name.to_string(),
        }
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Denied(_))
    }
}

/// Result of one token in a power list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TokenOutcome {
    Applied { token: PowerToken },
    /// The list already held the power at that tier.
    Unchanged { token: PowerToken },
    UnknownPower { name: String },
    Malformed { message: String },
    /// The actor's own tier is lower than what it tried to give or take.
    NotHeld { token: PowerToken },
    /// No group of the target allows that tier.
    CannotReceive { token: PowerToken },
    /// The target holds the power above the actor and would be lowered.
    Outranked { token: PowerToken },
}

impl TokenOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, TokenOutcome::Applied { .. })
    }
}

/// Per-token outcomes of an empower-style call, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TokenReport {
    pub outcomes: Vec<TokenOutcome>,
}

impl TokenReport {
    pub fn push(&mut self, outcome: TokenOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn applied(&self) -> Vec<PowerToken> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                TokenOutcome::Applied { token } => Some(token.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn any_applied(&self) -> bool {
        self.outcomes.iter().any(TokenOutcome::is_applied)
    }
}

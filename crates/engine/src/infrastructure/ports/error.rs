//! Errors reported by the host server's object store.

use divscope_domain::Dbref;

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("{0} is not a valid object")]
    InvalidObject(Dbref),

    /// The host declined the request (out of dbrefs, a creation limit).
    #[error("Object store refused {operation}: {reason}")]
    Refused {
        operation: &'static str,
        reason: String,
    },
}

impl RepoError {
    pub fn refused(operation: &'static str, reason: impl ToString) -> Self {
        Self::Refused {
            operation,
            reason: reason.to_string(),
        }
    }
}

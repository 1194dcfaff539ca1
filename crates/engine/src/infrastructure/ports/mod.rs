//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - The game's object store and economy (owned by the host server)
//! - Notification, audit and fatal-error sinks
//! - Labeled persistence (could swap the text format for another store)
//! - Clock (for testing)

mod error;
mod external;
mod storage;
mod testing;

pub use error::RepoError;
pub use external::{
    AuditEntry, AuditSink, EconomyPort, FatalSink, Notice, NotifySink, ObjectDirectory,
};
pub use storage::{LabeledReader, LabeledWriter};
pub use testing::ClockPort;

#[cfg(test)]
pub use external::{MockAuditSink, MockEconomyPort, MockNotifySink, MockObjectDirectory};
#[cfg(test)]
pub use testing::MockClockPort;

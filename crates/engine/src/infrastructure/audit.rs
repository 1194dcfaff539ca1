//! Log-backed sinks.
//!
//! The default audit sink writes each entry as an `info` event on the
//! `audit` target, so operators can route it with `RUST_LOG=audit=info`.

use divscope_domain::Dbref;

use crate::infrastructure::ports::{AuditEntry, AuditSink, FatalSink, Notice, NotifySink};

pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, entry: AuditEntry) {
        tracing::info!(
            target: "audit",
            at = %entry.at,
            actor = %entry.actor,
            target_obj = %entry.target,
            "{}",
            entry.action
        );
    }
}

/// Notification sink for hosts without a connected command layer.
pub struct TracingNotifySink;

impl NotifySink for TracingNotifySink {
    fn notify(&self, recipient: Dbref, notice: Notice) {
        tracing::debug!(recipient = %recipient, notice = ?notice, "Notice");
    }
}

/// Logs the failure and aborts the process.
pub struct AbortFatalSink;

impl FatalSink for AbortFatalSink {
    fn fatal(&self, message: &str) -> ! {
        tracing::error!(reason = message, "Fatal authorization engine failure, aborting");
        std::process::abort()
    }
}

//! Use cases - administrative operations over the power space.
//!
//! Each module holds one area's operations. They borrow the
//! [`PowerSpace`](crate::entities::PowerSpace) mutably for the length of a
//! call and reach the host server only through ports.

pub mod authorize;
pub mod bootstrap;
pub mod divisions;
pub mod error;
pub mod grant;
pub mod groups;
pub mod powers;
pub mod query;
pub mod rank;

use std::sync::Arc;

use divscope_domain::Dbref;

use crate::infrastructure::ports::{AuditEntry, AuditSink, ClockPort};

pub use authorize::Authorizer;
pub use bootstrap::{Bootstrap, BootstrapReport};
pub use divisions::DivisionAdmin;
pub use error::{AdminError, Denial, TokenOutcome, TokenReport};
pub use grant::Grants;
pub use groups::GroupAdmin;
pub use powers::PowerAdmin;
pub use query::{EntitySummary, GroupSummary, PowerInfo, Queries};
pub use rank::RankAdmin;

/// Timestamped writes to the audit sink.
#[derive(Clone)]
pub struct AuditTrail {
    sink: Arc<dyn AuditSink>,
    clock: Arc<dyn ClockPort>,
}

impl AuditTrail {
    pub fn new(sink: Arc<dyn AuditSink>, clock: Arc<dyn ClockPort>) -> Self {
        Self { sink, clock }
    }

    pub fn record(&self, actor: Dbref, target: Dbref, action: impl Into<String>) {
        self.sink.record(AuditEntry {
            at: self.clock.now(),
            actor,
            target,
            action: action.into(),
        });
    }
}

/// Container for all authorization use cases.
pub struct AuthorityUseCases {
    pub authorizer: Arc<Authorizer>,
    pub powers: Arc<PowerAdmin>,
    pub groups: Arc<GroupAdmin>,
    pub grants: Arc<Grants>,
    pub divisions: Arc<DivisionAdmin>,
    pub ranks: Arc<RankAdmin>,
    pub queries: Arc<Queries>,
    pub bootstrap: Arc<Bootstrap>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockAuditSink, MockClockPort};
    use chrono::{TimeZone, Utc};

    #[test]
    fn audit_entries_are_stamped_by_the_clock() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut clock = MockClockPort::new();
        clock.expect_now().times(1).return_const(at);
        let mut sink = MockAuditSink::new();
        sink.expect_record()
            .withf(move |entry| {
                entry.at == at
                    && entry.actor == Dbref::new(1)
                    && entry.target == Dbref::new(7)
                    && entry.action == "POWERGROUP ADD: Wizard"
            })
            .times(1)
            .return_const(());

        let trail = AuditTrail::new(Arc::new(sink), Arc::new(clock));
        trail.record(Dbref::new(1), Dbref::new(7), "POWERGROUP ADD: Wizard");
    }
}

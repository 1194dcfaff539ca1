//! In-memory collaborators for tests.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_fixtures::FakeWorld;
//!
//! let world = FakeWorld::new();
//! world.player(Dbref::new(2));
//! world.thing(Dbref::new(5), Dbref::new(2));
//! ```

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use divscope_domain::{Dbref, EntityKind};

use crate::infrastructure::ports::{
    AuditEntry, AuditSink, EconomyPort, FatalSink, Notice, NotifySink, ObjectDirectory, RepoError,
};

// =============================================================================
// Object world
// =============================================================================

#[derive(Debug, Clone)]
pub struct FakeObject {
    pub kind: EntityKind,
    pub owner: Dbref,
    pub inherit: bool,
}

/// Object directory and economy backed by maps.
///
/// Quota is unlimited for divisions without an explicit allowance.
#[derive(Default)]
pub struct FakeWorld {
    objects: Mutex<BTreeMap<Dbref, FakeObject>>,
    quota: Mutex<HashMap<Dbref, u32>>,
    broke: Mutex<Vec<Dbref>>,
}

impl FakeWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, dbref: Dbref, kind: EntityKind, owner: Dbref) {
        self.objects.lock().unwrap().insert(
            dbref,
            FakeObject {
                kind,
                owner,
                inherit: false,
            },
        );
    }

    pub fn player(&self, dbref: Dbref) {
        self.add(dbref, EntityKind::Player, dbref);
    }

    pub fn thing(&self, dbref: Dbref, owner: Dbref) {
        self.add(dbref, EntityKind::Thing, owner);
    }

    pub fn division(&self, dbref: Dbref, owner: Dbref) {
        self.add(dbref, EntityKind::Division, owner);
    }

    pub fn set_inherit(&self, dbref: Dbref, inherit: bool) {
        if let Some(object) = self.objects.lock().unwrap().get_mut(&dbref) {
            object.inherit = inherit;
        }
    }

    pub fn set_quota(&self, division: Dbref, allowance: u32) {
        self.quota.lock().unwrap().insert(division, allowance);
    }

    pub fn quota(&self, division: Dbref) -> Option<u32> {
        self.quota.lock().unwrap().get(&division).copied()
    }

    /// Make `payer` unable to pay any fee.
    pub fn make_broke(&self, payer: Dbref) {
        self.broke.lock().unwrap().push(payer);
    }
}

impl ObjectDirectory for FakeWorld {
    fn is_valid(&self, dbref: Dbref) -> bool {
        self.objects.lock().unwrap().contains_key(&dbref)
    }

    fn kind(&self, dbref: Dbref) -> Option<EntityKind> {
        self.objects.lock().unwrap().get(&dbref).map(|o| o.kind)
    }

    fn owner(&self, dbref: Dbref) -> Option<Dbref> {
        self.objects.lock().unwrap().get(&dbref).map(|o| o.owner)
    }

    fn inherits_owner_powers(&self, dbref: Dbref) -> bool {
        self.objects
            .lock()
            .unwrap()
            .get(&dbref)
            .is_some_and(|o| o.inherit)
    }

    fn owned_by(&self, owner: Dbref) -> Vec<Dbref> {
        self.objects
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, o)| o.owner == owner)
            .map(|(d, _)| *d)
            .collect()
    }

    fn create_object(
        &self,
        owner: Dbref,
        _name: &str,
        kind: EntityKind,
    ) -> Result<Dbref, RepoError> {
        let mut objects = self.objects.lock().unwrap();
        if !objects.contains_key(&owner) {
            return Err(RepoError::InvalidObject(owner));
        }
        let next = objects.keys().last().map_or(0, |d| d.raw() + 1);
        let dbref = Dbref::new(next);
        objects.insert(
            dbref,
            FakeObject {
                kind,
                owner,
                inherit: false,
            },
        );
        Ok(dbref)
    }
}

impl EconomyPort for FakeWorld {
    fn can_pay_fees(&self, payer: Dbref, _amount: u32) -> bool {
        !self.broke.lock().unwrap().contains(&payer)
    }

    fn pay_quota(&self, division: Dbref, count: u32) -> bool {
        let mut quota = self.quota.lock().unwrap();
        match quota.get_mut(&division) {
            None => true,
            Some(left) if *left >= count => {
                *left -= count;
                true
            }
            Some(_) => false,
        }
    }

    fn refund_quota(&self, division: Dbref, count: u32) {
        if let Some(left) = self.quota.lock().unwrap().get_mut(&division) {
            *left += count;
        }
    }
}

// =============================================================================
// Sinks
// =============================================================================

#[derive(Default)]
pub struct RecordingAudit {
    entries: Mutex<Vec<AuditEntry>>,
}

impl RecordingAudit {
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn actions(&self) -> Vec<String> {
        self.entries().into_iter().map(|e| e.action).collect()
    }
}

impl AuditSink for RecordingAudit {
    fn record(&self, entry: AuditEntry) {
        self.entries.lock().unwrap().push(entry);
    }
}

#[derive(Default)]
pub struct RecordingNotify {
    notices: Mutex<Vec<(Dbref, Notice)>>,
}

impl RecordingNotify {
    pub fn notices(&self) -> Vec<(Dbref, Notice)> {
        self.notices.lock().unwrap().clone()
    }

    pub fn for_recipient(&self, recipient: Dbref) -> Vec<Notice> {
        self.notices()
            .into_iter()
            .filter(|(r, _)| *r == recipient)
            .map(|(_, n)| n)
            .collect()
    }
}

impl NotifySink for RecordingNotify {
    fn notify(&self, recipient: Dbref, notice: Notice) {
        self.notices.lock().unwrap().push((recipient, notice));
    }
}

/// Fatal sink that fails the test instead of aborting the runner.
pub struct PanicFatalSink;

impl FatalSink for PanicFatalSink {
    fn fatal(&self, message: &str) -> ! {
        panic!("fatal: {}", message)
    }
}

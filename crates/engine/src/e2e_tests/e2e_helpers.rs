//! E2E helpers for constructing the full application stack.
//!
//! Provides a seeded [`App`] over an in-memory object world, with the
//! notify and audit sinks kept so tests can inspect what was emitted.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use divscope_domain::{Dbref, EntityKind, Tier};

use crate::app::{App, Collaborators};
use crate::infrastructure::clock::FixedClock;
use crate::infrastructure::config::EngineConfig;
use crate::infrastructure::persistence::{LoadReport, TextLabeledReader, TextLabeledWriter};
use crate::use_cases::BootstrapReport;
use crate::test_fixtures::{FakeWorld, PanicFatalSink, RecordingAudit, RecordingNotify};

/// The root actor of every E2E world.
pub const ROOT: Dbref = Dbref::new(1);

pub struct E2EContext {
    pub app: App,
    pub world: Arc<FakeWorld>,
    pub notify: Arc<RecordingNotify>,
    pub audit: Arc<RecordingAudit>,
}

impl E2EContext {
    /// App with the built-in defaults and a world holding only root.
    pub fn seeded() -> Self {
        Self::build(|world, notify, audit| {
            App::seeded(EngineConfig::default(), collaborators(world, notify, audit))
        })
    }

    /// App over an empty space; the caller registers what it needs.
    pub fn bare() -> Self {
        Self::build(|world, notify, audit| {
            App::new(EngineConfig::default(), collaborators(world, notify, audit))
        })
    }

    fn build(
        make: impl FnOnce(Arc<FakeWorld>, Arc<RecordingNotify>, Arc<RecordingAudit>) -> App,
    ) -> Self {
        let world = Arc::new(FakeWorld::new());
        world.player(ROOT);
        let notify = Arc::new(RecordingNotify::default());
        let audit = Arc::new(RecordingAudit::default());
        let app = make(world.clone(), notify.clone(), audit.clone());
        Self {
            app,
            world,
            notify,
            audit,
        }
    }

    /// Save the space to text and load it into a new app over the same
    /// world, with fresh sinks.
    pub fn reload(&self) -> (Self, LoadReport, BootstrapReport) {
        let mut writer = TextLabeledWriter::new(Vec::new());
        self.app.save(&mut writer).unwrap();
        let saved = writer.into_inner();

        let notify = Arc::new(RecordingNotify::default());
        let audit = Arc::new(RecordingAudit::default());
        let mut reader = TextLabeledReader::new(saved.as_slice());
        let (app, loaded, added) = App::load(
            EngineConfig::default(),
            collaborators(self.world.clone(), notify.clone(), audit.clone()),
            &mut reader,
        )
        .unwrap();
        let ctx = Self {
            app,
            world: self.world.clone(),
            notify,
            audit,
        };
        (ctx, loaded, added)
    }

    /// Add a player and place it in `division`.
    pub fn player_in(&mut self, dbref: u32, division: Option<Dbref>) -> Dbref {
        let player = Dbref::new(dbref);
        self.world.player(player);
        self.app.space.set_division(player, division);
        player
    }

    /// Add an object of `kind` owned by `owner`, created the way the host
    /// would: the record starts in the creator's division and rank.
    pub fn object(&mut self, dbref: u32, kind: EntityKind, owner: Dbref) -> Dbref {
        let object = Dbref::new(dbref);
        self.world.add(object, kind, owner);
        self.app
            .use_cases
            .divisions
            .on_entity_created(&mut self.app.space, object, owner);
        object
    }

    /// Store a tier directly, bypassing every check.
    pub fn force_tier(&mut self, who: Dbref, power: &str, tier: Tier) {
        let power = self
            .app
            .space
            .power(power)
            .cloned()
            .unwrap_or_else(|| panic!("power {} not registered", power));
        self.app.space.set_entity_tier(who, &power, tier);
    }

    pub fn tier(&self, who: Dbref, power: &str) -> Tier {
        let power = self
            .app
            .space
            .power(power)
            .unwrap_or_else(|| panic!("power {} not registered", power));
        self.app.space.entity_tier(who, power)
    }
}

fn collaborators(
    world: Arc<FakeWorld>,
    notify: Arc<RecordingNotify>,
    audit: Arc<RecordingAudit>,
) -> Collaborators {
    Collaborators {
        directory: world.clone(),
        economy: world,
        notify,
        audit,
        clock: Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())),
        fatal: Arc::new(PanicFatalSink),
    }
}

//! Application state and composition.

use std::path::Path;
use std::sync::Arc;

use crate::entities::PowerSpace;
use crate::infrastructure::{
    audit::{AbortFatalSink, TracingAuditSink, TracingNotifySink},
    clock::SystemClock,
    config::EngineConfig,
    persistence::{self, LoadReport, PersistenceError},
    ports::{
        AuditSink, ClockPort, EconomyPort, FatalSink, LabeledReader, LabeledWriter, NotifySink,
        ObjectDirectory,
    },
};
use crate::use_cases::{self, AuditTrail, AuthorityUseCases, Authorizer, BootstrapReport};

/// Everything the engine needs from the host server.
pub struct Collaborators {
    pub directory: Arc<dyn ObjectDirectory>,
    pub economy: Arc<dyn EconomyPort>,
    pub notify: Arc<dyn NotifySink>,
    pub audit: Arc<dyn AuditSink>,
    pub clock: Arc<dyn ClockPort>,
    pub fatal: Arc<dyn FatalSink>,
}

impl Collaborators {
    /// Host-provided object store and economy; log-backed sinks.
    pub fn with_log_sinks(
        directory: Arc<dyn ObjectDirectory>,
        economy: Arc<dyn EconomyPort>,
    ) -> Self {
        Self {
            directory,
            economy,
            notify: Arc::new(TracingNotifySink),
            audit: Arc::new(TracingAuditSink),
            clock: Arc::new(SystemClock),
            fatal: Arc::new(AbortFatalSink),
        }
    }
}

/// Main application state.
///
/// Owns the power space; every use case borrows it mutably per call.
pub struct App {
    pub space: PowerSpace,
    pub use_cases: AuthorityUseCases,
}

impl App {
    /// Wire up an empty space. Nothing is registered yet.
    pub fn new(config: EngineConfig, collaborators: Collaborators) -> Self {
        let Collaborators {
            directory,
            economy,
            notify,
            audit,
            clock,
            fatal,
        } = collaborators;

        let authorizer = Arc::new(Authorizer::new(directory));
        let trail = AuditTrail::new(audit, clock);

        let cases = AuthorityUseCases {
            authorizer: authorizer.clone(),
            powers: Arc::new(use_cases::PowerAdmin::new(
                authorizer.clone(),
                fatal.clone(),
                trail.clone(),
            )),
            groups: Arc::new(use_cases::GroupAdmin::new(
                authorizer.clone(),
                notify.clone(),
                trail.clone(),
            )),
            grants: Arc::new(use_cases::Grants::new(
                authorizer.clone(),
                notify.clone(),
                trail.clone(),
            )),
            divisions: Arc::new(use_cases::DivisionAdmin::new(
                authorizer.clone(),
                economy,
                notify.clone(),
                trail.clone(),
            )),
            ranks: Arc::new(use_cases::RankAdmin::new(authorizer.clone(), notify, trail)),
            queries: Arc::new(use_cases::Queries::new(authorizer)),
            bootstrap: Arc::new(use_cases::Bootstrap::new(fatal)),
        };

        Self {
            space: PowerSpace::new(config),
            use_cases: cases,
        }
    }

    /// A fresh game: built-in powers, aliases and groups installed.
    pub fn seeded(config: EngineConfig, collaborators: Collaborators) -> Self {
        let mut app = Self::new(config, collaborators);
        app.use_cases.bootstrap.install_defaults(&mut app.space);
        app
    }

    /// Load a saved database, then add any built-in defaults it lacks.
    pub fn load(
        config: EngineConfig,
        collaborators: Collaborators,
        reader: &mut dyn LabeledReader,
    ) -> Result<(Self, LoadReport, BootstrapReport), PersistenceError> {
        let mut app = Self::new(config, collaborators);
        let loaded = persistence::load(&mut app.space, reader)?;
        let added = app.use_cases.bootstrap.install_defaults(&mut app.space);
        Ok((app, loaded, added))
    }

    pub fn load_file(
        config: EngineConfig,
        collaborators: Collaborators,
        path: &Path,
    ) -> Result<(Self, LoadReport, BootstrapReport), PersistenceError> {
        let mut app = Self::new(config, collaborators);
        let loaded = persistence::load_file(&mut app.space, path)?;
        let added = app.use_cases.bootstrap.install_defaults(&mut app.space);
        Ok((app, loaded, added))
    }

    pub fn save(&self, writer: &mut dyn LabeledWriter) -> Result<(), PersistenceError> {
        persistence::save(&self.space, writer)
    }

    pub fn save_file(&self, path: &Path) -> Result<(), PersistenceError> {
        persistence::save_file(&self.space, path)
    }
}

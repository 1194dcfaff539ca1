//! Divscope engine library.
//!
//! Division-scoped power authorization for a MUSH server.
//!
//! ## Structure
//!
//! - `entities/` - The power space: bit allocation, powers, groups, scope records
//! - `use_cases/` - Authorization checks and administrative operations
//! - `infrastructure/` - Ports, adapters, configuration and persistence
//! - `app` - Application composition

pub mod app;
pub mod entities;
pub mod infrastructure;
pub mod use_cases;

/// In-memory collaborators for tests.
#[cfg(test)]
pub mod test_fixtures;

/// End-to-end scenarios through the composed [`App`].
#[cfg(test)]
mod e2e_tests;

pub use app::{App, Collaborators};

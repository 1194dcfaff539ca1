//! Infrastructure implementations.
//!
//! Port traits for the host server's collaborators, their default adapters,
//! configuration, built-in defaults and persistence.

pub mod audit;
pub mod clock;
pub mod config;
pub mod defaults;
pub mod persistence;
pub mod ports;

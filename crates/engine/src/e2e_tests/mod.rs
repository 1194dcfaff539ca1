//! End-to-end authorization scenarios.
//!
//! These tests drive the fully composed [`App`](crate::App) the way a host
//! server would: an in-memory object world, recording sinks, and the
//! built-in defaults installed at startup.
//!
//! # Running
//!
//! ```bash
//! cargo test -p divscope-engine --lib e2e_tests
//! ```

mod e2e_helpers;
mod persistence_flow_tests;

pub use e2e_helpers::*;

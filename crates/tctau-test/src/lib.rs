//! TCTau Test Harness - Synthetic events and processing-loop validation
//!
//! This crate provides:
//! - Seeded tau event generation with consistent tracks and calorimeter hits
//! - A per-event processing loop driving any `TauJetCorrector`
//! - Tracing setup for tests and benchmarks
//! - End-to-end correction scenarios

pub mod event_loop;
pub mod generator;
pub mod integration;
pub mod logging;

pub use event_loop::*;
pub use generator::*;
pub use logging::*;

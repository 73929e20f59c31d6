//! TCTau Corrector - Tau-jet energy corrections for downstream consumers
//!
//! `TauCorrector` owns one correction algorithm, built from a parameter set,
//! and drives it through the configure / per-event / correct cycle:
//!
//! ```text
//! Unconfigured --apply_config--> Configured --apply_event_context--> Ready
//! ```
//!
//! Algorithms that need no event data are ready as soon as they are
//! configured. Consumers may hold the corrector through the `JetCorrector`
//! and `TauJetCorrector` traits.

pub mod corrector;
pub mod jet_corrector;

pub use corrector::*;
pub use jet_corrector::*;

pub use tctau_algo::{AlgoComponent, AlgoStats};

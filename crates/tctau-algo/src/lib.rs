//! TCTau Algorithms - Tau-jet energy correction collaborators
//!
//! This crate implements the algorithms driven by the corrector:
//! - The `TauAlgorithm` capability and its counters
//! - TCTau: track momenta plus matched calorimeter clusters
//! - A kinematic Et/η response parametrization
//! - Selection of the algorithm from a parameter set

pub mod algorithm;
pub mod cluster;
pub mod factory;
pub mod parametrized;
pub mod presets;
pub mod selection;
pub mod tctau;

pub use algorithm::*;
pub use cluster::*;
pub use factory::*;
pub use parametrized::*;
pub use selection::*;
pub use tctau::*;

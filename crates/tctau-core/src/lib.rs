//! TCTau Core - Fundamental types for tau-jet energy correction
//!
//! This crate defines the types shared by the correction crates:
//! - Kinematics (Vector3, LorentzVector, ΔR)
//! - Reconstructed objects (Track, TauJet)
//! - Event data and conditions (Event, EventSetup, CaloHit)
//! - Parameter sets and error types

pub mod error;
pub mod event;
pub mod jet;
pub mod lorentz;
pub mod params;

pub use error::*;
pub use event::*;
pub use jet::*;
pub use lorentz::*;
pub use params::*;

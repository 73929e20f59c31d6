//! Jet correction capabilities held by downstream consumers

use tctau_core::{Event, EventSetup, LorentzVector, TauJet, TauResult};

/// Generic jet energy correction
pub trait JetCorrector {
    /// Multiplicative energy scale for a bare four-momentum
    fn correction_p4(&self, p4: &LorentzVector) -> TauResult<f64>;

    /// Whether `set_event_context` must be called for every event
    fn event_required(&self) -> bool;

    /// Forward per-event data and conditions
    fn set_event_context(&mut self, event: &Event, setup: &EventSetup) -> TauResult<()>;
}

/// Tau-jet corrections using the full detector content of the candidate
///
/// Prefer these over [`JetCorrector::correction_p4`] whenever the tau-jet
/// object is available.
pub trait TauJetCorrector: JetCorrector {
    fn corrected_p4(&mut self, tau: &TauJet) -> TauResult<LorentzVector>;

    /// E_corrected / E_raw
    fn correction(&mut self, tau: &TauJet) -> TauResult<f64>;
}

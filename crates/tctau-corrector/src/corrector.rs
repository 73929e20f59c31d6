//! Tau-jet energy corrector

use tctau_algo::{algorithm_name, build_algorithm, AlgoComponent, AlgoStats, TauAlgorithm};
use tctau_core::{Event, EventSetup, LorentzVector, ParameterSet, TauError, TauJet, TauResult};
use tracing::{debug, warn};

use crate::{JetCorrector, TauJetCorrector};

/// Tau energy corrector from tracks and calorimeter information
///
/// Owns its algorithm exclusively. One instance serves one processing
/// stream; parallel workers each need their own corrector, since
/// correction queries update the algorithm counters.
#[derive(Default)]
pub struct TauCorrector {
    algorithm: Option<Box<dyn TauAlgorithm>>,
    /// Event context applied since the last (re)configuration
    event_ready: bool,
}

impl TauCorrector {
    /// Unconfigured corrector; every correction query fails until configured
    pub fn new() -> Self {
        Self::default()
    }

    /// Corrector configured from a parameter set
    pub fn with_config(params: &ParameterSet) -> TauResult<Self> {
        let mut corrector = Self::new();
        corrector.apply_config(params)?;
        Ok(corrector)
    }

    /// (Re)configure the algorithm; the last successful call wins.
    ///
    /// The current algorithm is reconfigured in place when `Algorithm`
    /// names it, otherwise a new one is built. On failure the previous
    /// algorithm and its state are kept.
    pub fn apply_config(&mut self, params: &ParameterSet) -> TauResult<()> {
        let current = self
            .algorithm
            .as_deref_mut()
            .filter(|a| algorithm_name(params).is_ok_and(|name| name == a.name()));
        let result = match current {
            Some(algorithm) => algorithm.configure(params),
            None => build_algorithm(params).map(|algorithm| self.algorithm = Some(algorithm)),
        };
        match result {
            Ok(()) => {
                debug!(algorithm = ?self.algorithm_name(), "tau corrector configured");
                self.event_ready = false;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "tau corrector configuration rejected");
                Err(e)
            }
        }
    }

    /// Forward per-event data to the algorithm.
    ///
    /// A failure drops the event context, so later queries fail with
    /// `NoEventContext` until an event is applied successfully.
    pub fn apply_event_context(&mut self, event: &Event, setup: &EventSetup) -> TauResult<()> {
        let algorithm = self.algorithm.as_deref_mut().ok_or(TauError::NotConfigured)?;
        match algorithm.on_event(event, setup) {
            Ok(()) => {
                self.event_ready = true;
                Ok(())
            }
            Err(e) => {
                algorithm.clear_event();
                self.event_ready = false;
                warn!(
                    run = event.id().run,
                    event = event.id().event,
                    error = %e,
                    "event context rejected"
                );
                Err(e)
            }
        }
    }

    /// Whether `apply_event_context` is needed every event; false when unconfigured
    pub fn event_required(&self) -> bool {
        self.algorithm
            .as_deref()
            .is_some_and(|a| a.event_required())
    }

    /// Configured and, if needed, holding an event context
    pub fn is_ready(&self) -> bool {
        self.algorithm
            .as_deref()
            .is_some_and(|a| self.event_ready || !a.event_required())
    }

    pub fn algorithm_name(&self) -> Option<&'static str> {
        self.algorithm.as_deref().map(|a| a.name())
    }

    fn ready(&self) -> TauResult<&dyn TauAlgorithm> {
        let algorithm = self.algorithm.as_deref().ok_or(TauError::NotConfigured)?;
        if algorithm.event_required() && !self.event_ready {
            return Err(TauError::NoEventContext);
        }
        Ok(algorithm)
    }

    fn ready_mut(&mut self) -> TauResult<&mut dyn TauAlgorithm> {
        let event_ready = self.event_ready;
        let algorithm: &mut dyn TauAlgorithm = self
            .algorithm
            .as_deref_mut()
            .ok_or(TauError::NotConfigured)?;
        if algorithm.event_required() && !event_ready {
            return Err(TauError::NoEventContext);
        }
        Ok(algorithm)
    }

    /// Corrected four-momentum of one tau-jet
    pub fn corrected_p4(&mut self, tau: &TauJet) -> TauResult<LorentzVector> {
        self.ready_mut()?.corrected_p4(tau)
    }

    /// Energy scale for a bare four-momentum; less accurate than
    /// [`TauCorrector::correction`]
    pub fn correction_p4(&self, p4: &LorentzVector) -> TauResult<f64> {
        self.ready()?.correction_p4(p4)
    }

    /// Energy scale E_corrected / E_raw of one tau-jet
    pub fn correction(&mut self, tau: &TauJet) -> TauResult<f64> {
        self.ready_mut()?.correction(tau)
    }

    /// Correct a collection; each candidate succeeds or fails on its own
    pub fn correct_all(&mut self, taus: &[TauJet]) -> Vec<TauResult<LorentzVector>> {
        taus.iter().map(|tau| self.corrected_p4(tau)).collect()
    }

    /// Counters of the current configuration; zero when unconfigured
    pub fn stats(&self) -> AlgoStats {
        self.algorithm
            .as_deref()
            .map(|a| *a.stats())
            .unwrap_or_default()
    }

    pub fn efficiency(&self) -> f64 {
        self.stats().efficiency()
    }

    pub fn all_tau_candidates(&self) -> u64 {
        self.stats().all
    }

    /// Candidates with a positive corrected Et
    pub fn statistics(&self) -> u64 {
        self.stats().passed
    }

    /// Component used for the most recent candidate
    pub fn algo_component(&self) -> AlgoComponent {
        self.stats().component
    }
}

impl std::fmt::Debug for TauCorrector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TauCorrector")
            .field("algorithm", &self.algorithm_name())
            .field("event_ready", &self.event_ready)
            .field("stats", &self.stats())
            .finish()
    }
}

impl JetCorrector for TauCorrector {
    fn correction_p4(&self, p4: &LorentzVector) -> TauResult<f64> {
        TauCorrector::correction_p4(self, p4)
    }

    fn event_required(&self) -> bool {
        TauCorrector::event_required(self)
    }

    fn set_event_context(&mut self, event: &Event, setup: &EventSetup) -> TauResult<()> {
        self.apply_event_context(event, setup)
    }
}

impl TauJetCorrector for TauCorrector {
    fn corrected_p4(&mut self, tau: &TauJet) -> TauResult<LorentzVector> {
        TauCorrector::corrected_p4(self, tau)
    }

    fn correction(&mut self, tau: &TauJet) -> TauResult<f64> {
        TauCorrector::correction(self, tau)
    }
}

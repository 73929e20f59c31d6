//! Correction algorithm capability and bookkeeping

use tctau_core::{Event, EventSetup, LorentzVector, ParameterSet, TauError, TauJet, TauResult};

/// Algorithm component that produced a corrected four-momentum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum AlgoComponent {
    /// No candidate processed, or no usable leading track
    #[default]
    Undetermined = 0,
    /// Track momenta plus photon clusters
    Momentum = 1,
    /// Calorimeter response far below the track momentum
    TrackProblem = 2,
    /// Track momenta plus matched and photon ECAL clusters
    MomentumEcal = 3,
    /// Calorimeter jet kept as is (optionally rescaled)
    CaloJet = 4,
    /// Hadronic activity dominates, candidate rejected
    HadronicJet = 5,
    /// Kinematic parametrization, no detector content used
    Parametrized = 6,
}

impl AlgoComponent {
    /// Integer code of the component
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Cumulative counters of one configuration epoch
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AlgoStats {
    /// Tau candidates processed
    pub all: u64,
    /// Candidates with corrected Et > 0
    pub passed: u64,
    /// Component used for the latest candidate
    pub component: AlgoComponent,
}

impl AlgoStats {
    /// Fraction of candidates passing; zero before any candidate
    pub fn efficiency(&self) -> f64 {
        if self.all == 0 {
            0.0
        } else {
            self.passed as f64 / self.all as f64
        }
    }

    /// Account for one corrected candidate
    pub fn record(&mut self, p4: &LorentzVector, component: AlgoComponent) {
        self.all += 1;
        if p4.et() > 0.0 {
            self.passed += 1;
        }
        self.component = component;
    }

    pub fn reset(&mut self) {
        *self = AlgoStats::default();
    }
}

/// Raw energy of a tau-jet, which must be positive to form a ratio
pub fn raw_energy(tau: &TauJet) -> TauResult<f64> {
    let e = tau.energy();
    if e > 0.0 && e.is_finite() {
        Ok(e)
    } else {
        Err(TauError::DegenerateInput(format!(
            "raw energy {} is not positive",
            e
        )))
    }
}

/// Tau energy-correction algorithm
///
/// Correction factors are multiplicative energy scales. Counters in
/// [`AlgoStats`] are only touched by successful `corrected_p4` calls.
pub trait TauAlgorithm {
    /// Short algorithm name, as selected by the `Algorithm` parameter
    fn name(&self) -> &'static str;

    /// (Re)read parameters; resets counters and drops event data.
    /// On error the algorithm is left as it was.
    fn configure(&mut self, params: &ParameterSet) -> TauResult<()>;

    /// Whether per-event data must be loaded before correcting
    fn event_required(&self) -> bool;

    /// Load per-event products and conditions; all or nothing
    fn on_event(&mut self, event: &Event, setup: &EventSetup) -> TauResult<()>;

    /// Forget loaded per-event data
    fn clear_event(&mut self);

    fn has_event_data(&self) -> bool;

    /// Corrected four-momentum of a tau-jet
    fn corrected_p4(&mut self, tau: &TauJet) -> TauResult<LorentzVector>;

    /// Scale factor from kinematics alone
    fn correction_p4(&self, p4: &LorentzVector) -> TauResult<f64>;

    /// Scale factor using full detector content: E_corrected / E_raw
    fn correction(&mut self, tau: &TauJet) -> TauResult<f64> {
        // Checked first so a degenerate jet never reaches the counters
        let e_raw = raw_energy(tau)?;
        Ok(self.corrected_p4(tau)?.e / e_raw)
    }

    fn stats(&self) -> &AlgoStats;
}

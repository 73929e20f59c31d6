//! Kinematic tau-jet response parametrization
//!
//! The correction is a polynomial in the jet Et, chosen per |η| bin and
//! clamped to a configured range. No detector content beyond the raw
//! four-momentum is used, so no per-event data is needed.

use tctau_core::{Event, EventSetup, LorentzVector, ParameterSet, TauError, TauJet, TauResult};
use tracing::debug;

use crate::{AlgoComponent, AlgoStats, TauAlgorithm};

/// Polynomial response in one |η| bin
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseBin {
    /// Upper |η| edge of the bin
    pub eta_max: f64,
    /// c0 + c1·Et + c2·Et² + ...
    pub coefficients: Vec<f64>,
}

impl ResponseBin {
    fn evaluate(&self, et: f64) -> f64 {
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, c| acc * et + c)
    }
}

/// Binned response parametrization
#[derive(Debug, Clone, PartialEq)]
pub struct Parametrization {
    bins: Vec<ResponseBin>,
    min_factor: f64,
    max_factor: f64,
}

impl Parametrization {
    pub const DEFAULT_MIN_FACTOR: f64 = 0.5;
    pub const DEFAULT_MAX_FACTOR: f64 = 2.0;

    /// Read `Bins`, `MinFactor` and `MaxFactor`
    pub fn from_pset(params: &ParameterSet) -> TauResult<Self> {
        let min_factor = params.get_double_or("MinFactor", Self::DEFAULT_MIN_FACTOR)?;
        let max_factor = params.get_double_or("MaxFactor", Self::DEFAULT_MAX_FACTOR)?;
        if !(min_factor > 0.0 && min_factor.is_finite()) {
            return Err(TauError::invalid("MinFactor", "must be positive"));
        }
        if !(max_factor >= min_factor && max_factor.is_finite()) {
            return Err(TauError::invalid("MaxFactor", "must not be below MinFactor"));
        }

        let mut bins = Vec::new();
        let mut last_edge = 0.0;
        for bin in params.get_psets("Bins")? {
            let eta_max = bin.get_double("EtaMax")?;
            if !(eta_max > last_edge && eta_max.is_finite()) {
                return Err(TauError::invalid("EtaMax", "bins must ascend in |eta|"));
            }
            let coefficients = bin.get_doubles("Coefficients")?.to_vec();
            if coefficients.is_empty() || coefficients.iter().any(|c| !c.is_finite()) {
                return Err(TauError::invalid(
                    "Coefficients",
                    "need at least one finite coefficient",
                ));
            }
            last_edge = eta_max;
            bins.push(ResponseBin {
                eta_max,
                coefficients,
            });
        }
        if bins.is_empty() {
            return Err(TauError::invalid("Bins", "at least one bin required"));
        }

        Ok(Parametrization {
            bins,
            min_factor,
            max_factor,
        })
    }

    pub fn bins(&self) -> &[ResponseBin] {
        &self.bins
    }

    /// Bin covering |η|; beyond the last edge the last bin applies
    fn bin_for(&self, eta: f64) -> &ResponseBin {
        let abs_eta = eta.abs();
        self.bins
            .iter()
            .find(|b| abs_eta <= b.eta_max)
            .unwrap_or_else(|| &self.bins[self.bins.len() - 1])
    }

    /// Clamped scale factor for a four-momentum
    pub fn factor(&self, p4: &LorentzVector) -> TauResult<f64> {
        if !p4.is_finite() {
            return Err(TauError::DegenerateInput(format!(
                "non-finite four-momentum {:?}",
                p4
            )));
        }
        let raw = self.bin_for(p4.eta()).evaluate(p4.et());
        if raw.is_nan() {
            return Err(TauError::DegenerateInput(format!(
                "response undefined at Et {}",
                p4.et()
            )));
        }
        Ok(raw.clamp(self.min_factor, self.max_factor))
    }
}

/// Collaborator applying a [`Parametrization`] to the raw jet
#[derive(Debug, Clone)]
pub struct ParametrizedAlgorithm {
    parametrization: Parametrization,
    stats: AlgoStats,
}

impl ParametrizedAlgorithm {
    pub fn new(params: &ParameterSet) -> TauResult<Self> {
        Ok(ParametrizedAlgorithm {
            parametrization: Parametrization::from_pset(params)?,
            stats: AlgoStats::default(),
        })
    }

    pub fn parametrization(&self) -> &Parametrization {
        &self.parametrization
    }
}

impl TauAlgorithm for ParametrizedAlgorithm {
    fn name(&self) -> &'static str {
        "Parametrized"
    }

    fn configure(&mut self, params: &ParameterSet) -> TauResult<()> {
        self.parametrization = Parametrization::from_pset(params)?;
        self.stats.reset();
        debug!(
            bins = self.parametrization.bins.len(),
            "parametrized tau correction configured"
        );
        Ok(())
    }

    fn event_required(&self) -> bool {
        false
    }

    fn on_event(&mut self, _event: &Event, _setup: &EventSetup) -> TauResult<()> {
        Ok(())
    }

    fn clear_event(&mut self) {}

    fn has_event_data(&self) -> bool {
        false
    }

    fn corrected_p4(&mut self, tau: &TauJet) -> TauResult<LorentzVector> {
        let raw = tau.raw_p4();
        let p4 = raw.scaled(self.parametrization.factor(&raw)?);
        self.stats.record(&p4, AlgoComponent::Parametrized);
        Ok(p4)
    }

    fn correction_p4(&self, p4: &LorentzVector) -> TauResult<f64> {
        self.parametrization.factor(p4)
    }

    fn stats(&self) -> &AlgoStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn params() -> ParameterSet {
        ParameterSet::new()
            .with(
                "Bins",
                vec![
                    ParameterSet::new()
                        .with("EtaMax", 1.5)
                        .with("Coefficients", vec![1.2, -0.002]),
                    ParameterSet::new()
                        .with("EtaMax", 2.5)
                        .with("Coefficients", vec![1.4]),
                ],
            )
            .with("MinFactor", 0.8)
            .with("MaxFactor", 1.5)
    }

    #[test]
    fn test_factor_per_bin() {
        let p = Parametrization::from_pset(&params()).unwrap();

        let central = LorentzVector::from_pt_eta_phi_m(50.0, 0.3, 0.0, 0.0);
        let f = p.factor(&central).unwrap();
        assert!((f - (1.2 - 0.002 * 50.0)).abs() < 1e-9);

        let forward = LorentzVector::from_pt_eta_phi_m(50.0, 2.0, 0.0, 0.0);
        assert!((p.factor(&forward).unwrap() - 1.4).abs() < 1e-12);

        // Beyond last edge falls back to last bin
        let very_forward = LorentzVector::from_pt_eta_phi_m(50.0, 4.0, 0.0, 0.0);
        assert!((p.factor(&very_forward).unwrap() - 1.4).abs() < 1e-12);
    }

    #[test]
    fn test_factor_clamped() {
        let p = Parametrization::from_pset(&params()).unwrap();
        let hard = LorentzVector::from_pt_eta_phi_m(1000.0, 0.0, 0.0, 0.0);
        assert_eq!(p.factor(&hard), Ok(0.8));
    }

    #[test]
    fn test_invalid_configs() {
        let no_bins = ParameterSet::new().with("Bins", Vec::<ParameterSet>::new());
        assert!(matches!(
            Parametrization::from_pset(&no_bins),
            Err(TauError::InvalidParameter { .. })
        ));

        let missing = ParameterSet::new();
        assert!(matches!(
            Parametrization::from_pset(&missing),
            Err(TauError::Parameter(_))
        ));

        let descending = params().with(
            "Bins",
            vec![
                ParameterSet::new().with("EtaMax", 2.5).with("Coefficients", vec![1.0]),
                ParameterSet::new().with("EtaMax", 1.5).with("Coefficients", vec![1.0]),
            ],
        );
        assert!(Parametrization::from_pset(&descending).is_err());

        let inverted = params().with("MaxFactor", 0.1);
        assert!(Parametrization::from_pset(&inverted).is_err());
    }

    #[test]
    fn test_corrected_p4_scales_uniformly() {
        let mut algo = ParametrizedAlgorithm::new(&params()).unwrap();
        let tau = TauJet::calo_only(LorentzVector::from_pt_eta_phi_m(40.0, 0.5, 1.0, 0.0));

        let p4 = algo.corrected_p4(&tau).unwrap();
        let f = algo.correction_p4(&tau.raw_p4()).unwrap();
        let expected = tau.raw_p4().scaled(f);
        assert!((p4.px - expected.px).abs() < 1e-12);
        assert!((p4.e - expected.e).abs() < 1e-12);
        assert_eq!(algo.stats().component, AlgoComponent::Parametrized);
        assert_eq!(algo.stats().all, 1);
        assert!(!algo.event_required());
    }

    #[test]
    fn test_non_finite_input_leaves_counters() {
        let mut algo = ParametrizedAlgorithm::new(&params()).unwrap();
        let tau = TauJet::calo_only(LorentzVector::from_xyzt(f64::NAN, 0.0, 0.0, 10.0));
        assert!(algo.corrected_p4(&tau).is_err());
        assert_eq!(algo.stats().all, 0);
    }

    proptest! {
        #[test]
        fn prop_factor_within_bounds(
            pt in 0.0f64..2000.0,
            eta in -5.0f64..5.0,
        ) {
            let p = Parametrization::from_pset(&params()).unwrap();
            let p4 = LorentzVector::from_pt_eta_phi_m(pt, eta, 0.3, 0.0);
            let f = p.factor(&p4).unwrap();
            prop_assert!((0.8..=1.5).contains(&f));
        }
    }
}

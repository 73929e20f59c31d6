//! Track-corrected tau energy (TCTau)
//!
//! The tau energy is rebuilt from the momenta of the signal tracks and the
//! calorimeter clusters around them. The ratio of calorimeter energy to
//! track momentum decides which component is used:
//!
//! - r_calo = (E_ecal + E_hcal - P) / P, with E_* the energy matched to tracks
//! - r_hcal = (E_hcal - P) / P
//!
//! | r_calo          | r_hcal        | component      |
//! |-----------------|---------------|----------------|
//! | below window    | any           | TrackProblem   |
//! | inside window   | inside window | MomentumEcal   |
//! | inside window   | outside       | Momentum       |
//! | above window    | below window  | CaloJet        |
//! | above window    | above window  | HadronicJet    |
//! | above window    | inside window | MomentumEcal   |

use tctau_core::{
    CaloHit, Event, EventSetup, LorentzVector, ParameterSet, TauError, TauJet, TauResult, Track,
};
use tracing::{debug, trace};

use crate::{
    AlgoComponent, AlgoStats, CaloHits, ClusterCones, Parametrization, TauAlgorithm,
    TrackSelector,
};

/// Open interval used for calorimeter/track response windows
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    pub min: f64,
    pub max: f64,
}

impl Window {
    fn from_pset(
        params: &ParameterSet,
        min_name: &str,
        max_name: &str,
        default: Window,
    ) -> TauResult<Self> {
        let window = Window {
            min: params.get_double_or(min_name, default.min)?,
            max: params.get_double_or(max_name, default.max)?,
        };
        if window.min.is_nan() || window.max.is_nan() || window.min >= window.max {
            return Err(TauError::invalid(max_name, format!("must exceed {}", min_name)));
        }
        Ok(window)
    }

    fn contains(&self, r: f64) -> bool {
        r > self.min && r < self.max
    }
}

/// Parsed TCTau parameters
#[derive(Debug, Clone, PartialEq)]
pub struct TcTauConfig {
    /// Event product labels
    pub ecal_barrel_label: String,
    pub ecal_endcap_label: String,
    pub hcal_label: String,
    /// Signal tracks lie within this ΔR of the leading track
    pub signal_cone: f64,
    pub cones: ClusterCones,
    pub selector: TrackSelector,
    pub calo_over_track: Window,
    pub hcal_over_track: Window,
    pub drop_calo_jets: bool,
    pub drop_rejected: bool,
    /// Parametrization for calo-jet candidates and bare four-momenta
    pub fallback: Option<Parametrization>,
}

impl TcTauConfig {
    pub const DEFAULT_SIGNAL_CONE: f64 = 0.2;
    pub const DEFAULT_ECAL_CONE: f64 = 0.5;
    pub const DEFAULT_MATCHING_CONE: f64 = 0.1;

    pub fn from_pset(params: &ParameterSet) -> TauResult<Self> {
        let cone = |name: &str, default: f64| -> TauResult<f64> {
            let size = params.get_double_or(name, default)?;
            if size > 0.0 && size.is_finite() {
                Ok(size)
            } else {
                Err(TauError::invalid(name, "cone size must be positive"))
            }
        };

        let fallback = if params.contains("JetFallback") {
            Some(Parametrization::from_pset(params.get_pset("JetFallback")?)?)
        } else {
            None
        };

        Ok(TcTauConfig {
            ecal_barrel_label: params.get_string("EcalRecHitsEB")?.to_string(),
            ecal_endcap_label: params.get_string("EcalRecHitsEE")?.to_string(),
            hcal_label: params.get_string("HBHERecHits")?.to_string(),
            signal_cone: cone("SignalConeSize", Self::DEFAULT_SIGNAL_CONE)?,
            cones: ClusterCones {
                matching: cone("MatchingConeSize", Self::DEFAULT_MATCHING_CONE)?,
                ecal: cone("EcalConeSize", Self::DEFAULT_ECAL_CONE)?,
            },
            selector: TrackSelector::from_pset(params)?,
            calo_over_track: Window::from_pset(
                params,
                "EtCaloOverTrackMin",
                "EtCaloOverTrackMax",
                Window { min: -0.9, max: 0.0 },
            )?,
            hcal_over_track: Window::from_pset(
                params,
                "EtHcalOverTrackMin",
                "EtHcalOverTrackMax",
                Window { min: -0.3, max: 1.0 },
            )?,
            drop_calo_jets: params.get_bool_or("DropCaloJets", false)?,
            drop_rejected: params.get_bool_or("DropRejectedJets", true)?,
            fallback,
        })
    }

    fn fallback_factor(&self, p4: &LorentzVector) -> TauResult<f64> {
        match &self.fallback {
            Some(parametrization) => parametrization.factor(p4),
            None if p4.is_finite() => Ok(1.0),
            None => Err(TauError::DegenerateInput(format!(
                "non-finite four-momentum {:?}",
                p4
            ))),
        }
    }

    fn rejected(&self, raw: LorentzVector) -> LorentzVector {
        if self.drop_rejected {
            LorentzVector::ZERO
        } else {
            raw
        }
    }

    /// Corrected four-momentum and the component that produced it
    pub fn recalculate(
        &self,
        tau: &TauJet,
        hits: &CaloHits,
    ) -> TauResult<(LorentzVector, AlgoComponent)> {
        let raw = tau.raw_p4();

        let Some(lead) = tau.lead_track().filter(|t| self.selector.accept(t)) else {
            return Ok((self.rejected(raw), AlgoComponent::Undetermined));
        };
        if !lead.momentum.is_finite() {
            return Err(TauError::DegenerateInput(format!(
                "leading track momentum {:?}",
                lead.momentum
            )));
        }

        let signal: Vec<&Track> = tau
            .tracks()
            .iter()
            .filter(|t| self.selector.quality(t) && t.delta_r(lead) < self.signal_cone)
            .collect();

        let tracks_p4 = signal
            .iter()
            .fold(LorentzVector::ZERO, |acc, t| acc + LorentzVector::massless(t.momentum));
        let p = tracks_p4.e;
        if !(p > 0.0 && p.is_finite()) {
            return Err(TauError::DegenerateInput(format!(
                "signal track momentum {} is not positive",
                p
            )));
        }

        let clusters = hits.clusters(lead, &signal, self.cones);
        let r_calo = (clusters.ecal.e + clusters.hcal.e - p) / p;
        let r_hcal = (clusters.hcal.e - p) / p;

        let momentum = tracks_p4 + clusters.photons;
        let momentum_ecal = momentum + clusters.ecal;
        let hcal_in_window = self.hcal_over_track.contains(r_hcal);

        let result = if r_calo < self.calo_over_track.min {
            (self.rejected(raw), AlgoComponent::TrackProblem)
        } else if r_calo <= self.calo_over_track.max {
            if hcal_in_window {
                (momentum_ecal, AlgoComponent::MomentumEcal)
            } else {
                (momentum, AlgoComponent::Momentum)
            }
        } else if r_hcal < self.hcal_over_track.min {
            let p4 = if self.drop_calo_jets {
                LorentzVector::ZERO
            } else {
                raw.scaled(self.fallback_factor(&raw)?)
            };
            (p4, AlgoComponent::CaloJet)
        } else if r_hcal > self.hcal_over_track.max {
            (self.rejected(raw), AlgoComponent::HadronicJet)
        } else {
            (momentum_ecal, AlgoComponent::MomentumEcal)
        };

        trace!(
            prongs = signal.len(),
            r_calo,
            r_hcal,
            component = ?result.1,
            "tau candidate recalculated"
        );
        Ok(result)
    }
}

/// Track and calorimeter based tau energy correction
#[derive(Debug, Clone)]
pub struct TcTauAlgorithm {
    config: TcTauConfig,
    hits: Option<CaloHits>,
    stats: AlgoStats,
}

impl TcTauAlgorithm {
    pub fn new(params: &ParameterSet) -> TauResult<Self> {
        Ok(TcTauAlgorithm {
            config: TcTauConfig::from_pset(params)?,
            hits: None,
            stats: AlgoStats::default(),
        })
    }

    pub fn config(&self) -> &TcTauConfig {
        &self.config
    }
}

fn fetch_hits<'a>(event: &'a Event, label: &str) -> TauResult<&'a [CaloHit]> {
    event
        .calo_hits(label)
        .ok_or_else(|| TauError::MissingProduct {
            label: label.to_string(),
        })
}

impl TauAlgorithm for TcTauAlgorithm {
    fn name(&self) -> &'static str {
        "TCTau"
    }

    fn configure(&mut self, params: &ParameterSet) -> TauResult<()> {
        self.config = TcTauConfig::from_pset(params)?;
        self.hits = None;
        self.stats.reset();
        debug!(
            hcal = %self.config.hcal_label,
            signal_cone = self.config.signal_cone,
            fallback = self.config.fallback.is_some(),
            "TCTau configured"
        );
        Ok(())
    }

    fn event_required(&self) -> bool {
        true
    }

    fn on_event(&mut self, event: &Event, setup: &EventSetup) -> TauResult<()> {
        let calibration = *setup
            .calibration()
            .ok_or(TauError::MissingConditions("CaloCalibration"))?;
        let barrel = fetch_hits(event, &self.config.ecal_barrel_label)?;
        let endcap = fetch_hits(event, &self.config.ecal_endcap_label)?;
        let hcal = fetch_hits(event, &self.config.hcal_label)?;

        let mut ecal = Vec::with_capacity(barrel.len() + endcap.len());
        ecal.extend_from_slice(barrel);
        ecal.extend_from_slice(endcap);

        let id = event.id();
        debug!(
            run = id.run,
            event = id.event,
            ecal_hits = ecal.len(),
            hcal_hits = hcal.len(),
            "TCTau event data loaded"
        );

        self.hits = Some(CaloHits {
            ecal,
            hcal: hcal.to_vec(),
            calibration,
        });
        Ok(())
    }

    fn clear_event(&mut self) {
        self.hits = None;
    }

    fn has_event_data(&self) -> bool {
        self.hits.is_some()
    }

    fn corrected_p4(&mut self, tau: &TauJet) -> TauResult<LorentzVector> {
        let hits = self.hits.as_ref().ok_or(TauError::NoEventContext)?;
        let (p4, component) = self.config.recalculate(tau, hits)?;
        self.stats.record(&p4, component);
        Ok(p4)
    }

    fn correction_p4(&self, p4: &LorentzVector) -> TauResult<f64> {
        self.config.fallback_factor(p4)
    }

    fn stats(&self) -> &AlgoStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets;
    use tctau_core::{CaloCalibration, EventId, Product, Vector3};

    fn algo() -> TcTauAlgorithm {
        TcTauAlgorithm::new(&presets::tctau_defaults()).unwrap()
    }

    /// Event with matched ECAL/HCAL deposits and a 5 GeV photon near (0, 0)
    fn event(ecal: f64, hcal: f64) -> Event {
        let mut event = Event::new(EventId::new(1, 1));
        event.put(
            presets::ECAL_BARREL_LABEL,
            Product::CaloHits(vec![
                CaloHit::new(0.02, 0.02, ecal),
                CaloHit::new(0.3, 0.0, 5.0),
            ]),
        );
        event.put(presets::ECAL_ENDCAP_LABEL, Product::CaloHits(vec![]));
        event.put(
            presets::HCAL_LABEL,
            Product::CaloHits(vec![CaloHit::new(-0.02, 0.01, hcal)]),
        );
        event
    }

    fn setup() -> EventSetup {
        EventSetup::with_calibration(CaloCalibration::default())
    }

    fn tau() -> TauJet {
        TauJet::new(
            LorentzVector::from_pt_eta_phi_m(30.0, 0.0, 0.0, 0.0),
            vec![Track::new(20.0, 0.0, 0.0)],
        )
    }

    fn correct(ecal: f64, hcal: f64) -> (LorentzVector, AlgoComponent) {
        let mut algo = algo();
        algo.on_event(&event(ecal, hcal), &setup()).unwrap();
        let p4 = algo.corrected_p4(&tau()).unwrap();
        (p4, algo.stats().component)
    }

    #[test]
    fn test_momentum_component() {
        // r_calo = -0.3, r_hcal = -0.4
        let (p4, component) = correct(2.0, 12.0);
        assert_eq!(component, AlgoComponent::Momentum);
        assert!((p4.e - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_momentum_ecal_component() {
        // r_calo = -0.05, r_hcal = -0.25
        let (p4, component) = correct(4.0, 15.0);
        assert_eq!(component, AlgoComponent::MomentumEcal);
        assert!((p4.e - 29.0).abs() < 1e-9);

        // r_calo = 0.25 with r_hcal inside its window
        let (_, component) = correct(10.0, 15.0);
        assert_eq!(component, AlgoComponent::MomentumEcal);
    }

    #[test]
    fn test_hcal_window_edges_keep_momentum_ecal() {
        // Hits on the track axis so the ratios are exact
        let central = |ecal: f64, hcal: f64| {
            let mut event = Event::new(EventId::new(1, 2));
            event.put(
                presets::ECAL_BARREL_LABEL,
                Product::CaloHits(vec![CaloHit::new(0.0, 0.0, ecal)]),
            );
            event.put(presets::ECAL_ENDCAP_LABEL, Product::CaloHits(vec![]));
            event.put(
                presets::HCAL_LABEL,
                Product::CaloHits(vec![CaloHit::new(0.0, 0.0, hcal)]),
            );
            let mut algo = algo();
            algo.on_event(&event, &setup()).unwrap();
            let p4 = algo.corrected_p4(&tau()).unwrap();
            (p4, algo.stats().component)
        };

        // r_calo = 0.2, r_hcal exactly at EtHcalOverTrackMin
        let (p4, component) = central(10.0, 14.0);
        assert_eq!(component, AlgoComponent::MomentumEcal);
        assert!((p4.e - 30.0).abs() < 1e-9);

        // r_calo = 1.0, r_hcal exactly at EtHcalOverTrackMax
        let (p4, component) = central(0.0, 40.0);
        assert_eq!(component, AlgoComponent::MomentumEcal);
        assert!((p4.e - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite_lead_track_rejected() {
        let mut algo = algo();
        algo.on_event(&event(4.0, 15.0), &setup()).unwrap();
        let broken = Track {
            momentum: Vector3::new(20.0, 0.0, f64::NAN),
            ..Track::new(20.0, 0.0, 0.0)
        };
        let tau = TauJet::new(
            LorentzVector::from_pt_eta_phi_m(30.0, 0.0, 0.0, 0.0),
            vec![broken],
        );

        assert!(matches!(
            algo.corrected_p4(&tau),
            Err(TauError::DegenerateInput(_))
        ));
        assert!(matches!(
            algo.correction(&tau),
            Err(TauError::DegenerateInput(_))
        ));
        assert_eq!(algo.stats().all, 0);
        assert_eq!(algo.stats().component, AlgoComponent::Undetermined);
    }

    #[test]
    fn test_track_problem_dropped() {
        // r_calo = -0.95
        let (p4, component) = correct(0.0, 1.0);
        assert_eq!(component, AlgoComponent::TrackProblem);
        assert_eq!(p4, LorentzVector::ZERO);
    }

    #[test]
    fn test_calo_jet_keeps_raw() {
        // r_calo = 0.1, r_hcal = -0.9
        let (p4, component) = correct(20.0, 2.0);
        assert_eq!(component, AlgoComponent::CaloJet);
        assert_eq!(p4, tau().raw_p4());
    }

    #[test]
    fn test_hadronic_jet_rejected() {
        // r_calo = r_hcal = 1.25
        let (p4, component) = correct(0.0, 45.0);
        assert_eq!(component, AlgoComponent::HadronicJet);
        assert_eq!(p4, LorentzVector::ZERO);
    }

    #[test]
    fn test_no_lead_track_undetermined() {
        let mut algo = TcTauAlgorithm::new(
            &presets::tctau_defaults().with("DropRejectedJets", false),
        )
        .unwrap();
        algo.on_event(&event(4.0, 15.0), &setup()).unwrap();
        let calo = TauJet::calo_only(LorentzVector::from_pt_eta_phi_m(30.0, 0.0, 0.0, 0.0));
        let p4 = algo.corrected_p4(&calo).unwrap();
        assert_eq!(p4, calo.raw_p4());
        assert_eq!(algo.stats().component, AlgoComponent::Undetermined);
        assert_eq!(algo.stats().passed, 1);
    }

    #[test]
    fn test_calibration_scales_hits() {
        let mut algo = algo();
        let scaled = EventSetup::with_calibration(CaloCalibration {
            ecal_scale: 2.0,
            hcal_scale: 1.0,
        });
        // Matched ECAL 2 -> 4 and photon 5 -> 10
        algo.on_event(&event(2.0, 15.0), &scaled).unwrap();
        let p4 = algo.corrected_p4(&tau()).unwrap();
        assert_eq!(algo.stats().component, AlgoComponent::MomentumEcal);
        assert!((p4.e - 34.0).abs() < 1e-9);
    }

    #[test]
    fn test_requires_event_data() {
        let mut algo = algo();
        assert!(algo.event_required());
        assert_eq!(algo.corrected_p4(&tau()), Err(TauError::NoEventContext));
        assert_eq!(algo.stats().all, 0);
    }

    #[test]
    fn test_missing_products_leave_state() {
        let mut algo = algo();
        algo.on_event(&event(4.0, 15.0), &setup()).unwrap();

        let mut partial = event(4.0, 15.0);
        partial.put(presets::HCAL_LABEL, Product::Tracks(vec![]));
        let err = algo.on_event(&partial, &setup()).unwrap_err();
        assert_eq!(
            err,
            TauError::MissingProduct {
                label: presets::HCAL_LABEL.to_string()
            }
        );
        // Previous event data untouched
        assert!(algo.has_event_data());

        let err = algo.on_event(&event(4.0, 15.0), &EventSetup::new()).unwrap_err();
        assert_eq!(err, TauError::MissingConditions("CaloCalibration"));
    }

    #[test]
    fn test_configure_resets() {
        let mut algo = algo();
        algo.on_event(&event(4.0, 15.0), &setup()).unwrap();
        algo.corrected_p4(&tau()).unwrap();
        assert_eq!(algo.stats().all, 1);

        algo.configure(&presets::tctau_defaults()).unwrap();
        assert_eq!(algo.stats().all, 0);
        assert!(!algo.has_event_data());
    }

    #[test]
    fn test_missing_labels_rejected() {
        let mut params = presets::tctau_defaults();
        params.remove("HBHERecHits");
        assert!(matches!(
            TcTauAlgorithm::new(&params),
            Err(TauError::Parameter(_))
        ));

        let inverted = presets::tctau_defaults().with("EtCaloOverTrackMax", -2.0);
        assert!(matches!(
            TcTauAlgorithm::new(&inverted),
            Err(TauError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_correction_matches_energy() {
        let mut algo = algo();
        algo.on_event(&event(4.0, 15.0), &setup()).unwrap();
        let factor = algo.correction(&tau()).unwrap();
        let p4 = algo.corrected_p4(&tau()).unwrap();
        assert!((factor * tau().energy() - p4.e).abs() < 1e-9);
    }

    #[test]
    fn test_four_vector_correction_without_fallback() {
        let algo = algo();
        let p4 = LorentzVector::from_xyzt(3.0, 4.0, 0.0, 10.0);
        assert_eq!(algo.correction_p4(&p4), Ok(1.0));
    }
}

//! Standard parameter sets

use tctau_core::ParameterSet;

pub const ECAL_BARREL_LABEL: &str = "ecalRecHit:EcalRecHitsEB";
pub const ECAL_ENDCAP_LABEL: &str = "ecalRecHit:EcalRecHitsEE";
pub const HCAL_LABEL: &str = "hbhereco";

/// TCTau with the standard cones, track cuts and response windows
pub fn tctau_defaults() -> ParameterSet {
    ParameterSet::new()
        .with("Algorithm", "TCTau")
        .with("EcalRecHitsEB", ECAL_BARREL_LABEL)
        .with("EcalRecHitsEE", ECAL_ENDCAP_LABEL)
        .with("HBHERecHits", HCAL_LABEL)
        .with("SignalConeSize", 0.2)
        .with("EcalConeSize", 0.5)
        .with("MatchingConeSize", 0.1)
        .with("Track_minPt", 1.0)
        .with("tkmaxipt", 0.03)
        .with("tkmaxChi2", 100.0)
        .with("tkminPixelHitsn", 0)
        .with("tkminTrackerHitsn", 5)
        .with("EtCaloOverTrackMin", -0.9)
        .with("EtCaloOverTrackMax", 0.0)
        .with("EtHcalOverTrackMin", -0.3)
        .with("EtHcalOverTrackMax", 1.0)
        .with("DropCaloJets", false)
        .with("DropRejectedJets", true)
}

/// Barrel/endcap response curves for calorimeter tau-jets
pub fn parametrized_defaults() -> ParameterSet {
    ParameterSet::new()
        .with("Algorithm", "Parametrized")
        .with(
            "Bins",
            vec![
                ParameterSet::new()
                    .with("EtaMax", 1.4)
                    .with("Coefficients", vec![1.35, -0.0042, 1.1e-5]),
                ParameterSet::new()
                    .with("EtaMax", 3.0)
                    .with("Coefficients", vec![1.45, -0.0051, 1.4e-5]),
            ],
        )
        .with("MinFactor", 0.9)
        .with("MaxFactor", 1.6)
}

/// TCTau with the calorimeter response curves as fallback
pub fn tctau_with_fallback() -> ParameterSet {
    tctau_defaults().with("JetFallback", parametrized_defaults())
}

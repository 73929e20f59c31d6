//! Calorimeter clustering around signal tracks

use tctau_core::{CaloCalibration, CaloHit, LorentzVector, Track};

/// Cone sizes used to collect calorimeter energy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterCones {
    /// Hits this close to a signal track are attributed to it
    pub matching: f64,
    /// Outer cone around the leading track for photon hits
    pub ecal: f64,
}

/// Calibrated calorimeter hits of one event
#[derive(Debug, Clone, Default)]
pub struct CaloHits {
    pub ecal: Vec<CaloHit>,
    pub hcal: Vec<CaloHit>,
    pub calibration: CaloCalibration,
}

/// Energy collected around a tau candidate, as sums of massless hits
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CaloClusters {
    /// ECAL energy matched to signal tracks
    pub ecal: LorentzVector,
    /// HCAL energy matched to signal tracks
    pub hcal: LorentzVector,
    /// ECAL energy in the outer cone not matched to any track
    pub photons: LorentzVector,
}

fn near_any(hit: &CaloHit, tracks: &[&Track], cone: f64) -> bool {
    tracks
        .iter()
        .any(|t| hit.delta_r(t.eta(), t.phi()) < cone)
}

impl CaloHits {
    /// Collect clusters for the given leading and signal tracks
    pub fn clusters(&self, lead: &Track, signal: &[&Track], cones: ClusterCones) -> CaloClusters {
        let mut clusters = CaloClusters::default();
        let ecal_scale = self.calibration.ecal_scale;
        let hcal_scale = self.calibration.hcal_scale;

        for hit in &self.ecal {
            if near_any(hit, signal, cones.matching) {
                clusters.ecal += LorentzVector::massless(hit.vector(ecal_scale));
            } else if hit.delta_r(lead.eta(), lead.phi()) < cones.ecal {
                clusters.photons += LorentzVector::massless(hit.vector(ecal_scale));
            }
        }
        for hit in &self.hcal {
            if near_any(hit, signal, cones.matching) {
                clusters.hcal += LorentzVector::massless(hit.vector(hcal_scale));
            }
        }

        clusters
    }
}

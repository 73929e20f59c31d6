//! Reconstructed tau-jet objects
//!
//! A `TauJet` is the calorimeter jet seeding the tau candidate together with
//! the tracks associated to it. It is read-only input to the correction.

use serde::{Deserialize, Serialize};

use crate::{delta_r, LorentzVector, Vector3};

/// Charged-particle track
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Momentum at the point of closest approach (GeV)
    pub momentum: Vector3,
    /// Normalized χ² of the track fit
    pub chi2: f64,
    pub pixel_hits: u32,
    pub tracker_hits: u32,
    /// Transverse impact parameter (cm)
    pub transverse_ip: f64,
}

impl Track {
    /// Well-measured track with the given kinematics
    pub fn new(pt: f64, eta: f64, phi: f64) -> Self {
        let p = pt * eta.cosh();
        Track {
            momentum: Vector3::from_eta_phi(p, eta, phi),
            chi2: 1.0,
            pixel_hits: 3,
            tracker_hits: 12,
            transverse_ip: 0.001,
        }
    }

    pub fn pt(&self) -> f64 {
        self.momentum.perp()
    }

    pub fn p(&self) -> f64 {
        self.momentum.mag()
    }

    pub fn eta(&self) -> f64 {
        self.momentum.eta()
    }

    pub fn phi(&self) -> f64 {
        self.momentum.phi()
    }

    /// ΔR between two tracks
    pub fn delta_r(&self, other: &Track) -> f64 {
        delta_r(self.eta(), self.phi(), other.eta(), other.phi())
    }
}

/// Calorimeter tau-jet candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TauJet {
    /// Raw calorimeter jet four-momentum
    p4: LorentzVector,
    /// Tracks associated to the jet
    tracks: Vec<Track>,
    /// Index of the leading track in `tracks`
    lead: Option<usize>,
}

impl TauJet {
    /// Create a tau-jet; the highest finite-pt associated track leads
    pub fn new(p4: LorentzVector, tracks: Vec<Track>) -> Self {
        let lead = tracks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.pt().is_finite())
            .max_by(|(_, a), (_, b)| a.pt().total_cmp(&b.pt()))
            .map(|(i, _)| i);
        TauJet { p4, tracks, lead }
    }

    /// Calorimeter-only jet with no associated tracks
    pub fn calo_only(p4: LorentzVector) -> Self {
        TauJet {
            p4,
            tracks: Vec::new(),
            lead: None,
        }
    }

    /// Raw (uncorrected) four-momentum
    pub fn raw_p4(&self) -> LorentzVector {
        self.p4
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn lead_track(&self) -> Option<&Track> {
        self.lead.and_then(|i| self.tracks.get(i))
    }

    pub fn energy(&self) -> f64 {
        self.p4.e
    }

    pub fn eta(&self) -> f64 {
        self.p4.eta()
    }

    pub fn phi(&self) -> f64 {
        self.p4.phi()
    }
}

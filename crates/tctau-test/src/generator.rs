//! Synthetic tau events
//!
//! Produces events whose calorimeter hits, tracks and raw jets are mutually
//! consistent, so that corrections can be compared with the generated
//! visible tau momentum:
//! - 1 or 3 prongs, charged pions sharing part of the visible energy
//! - photons from π⁰ decays in the outer ECAL cone
//! - an under-responding calorimeter for charged hadrons
//! - uniform calorimeter noise

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tctau_algo::presets::{ECAL_BARREL_LABEL, ECAL_ENDCAP_LABEL, HCAL_LABEL};
use tctau_core::{
    CaloCalibration, CaloHit, Event, EventId, EventSetup, LorentzVector, Product, TauJet, Track,
};

/// Pseudorapidity boundary between ECAL barrel and endcap
const ECAL_BARREL_ETA: f64 = 1.479;

/// Generator configuration
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    /// Visible tau pt range (GeV)
    pub pt_range: (f64, f64),
    /// Maximum |η| of generated taus
    pub eta_max: f64,
    /// Probability of a three-prong decay
    pub three_prong_prob: f64,
    /// Range of the charged share of the visible energy
    pub charged_fraction: (f64, f64),
    /// Share of a charged pion's energy deposited in ECAL
    pub ecal_fraction: (f64, f64),
    /// HCAL response to charged pions (deposit / momentum)
    pub hcal_response: (f64, f64),
    /// Noise hits per event, spread over the calorimeter
    pub noise_hits: usize,
    /// Maximum energy of a noise hit
    pub noise_energy: f64,
    /// Probability that the HCAL product is missing from an event
    pub missing_product_prob: f64,
    /// Calibration of the generated calorimeter
    pub calibration: CaloCalibration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            pt_range: (15.0, 120.0),
            eta_max: 2.3,
            three_prong_prob: 0.25,
            charged_fraction: (0.5, 1.0),
            ecal_fraction: (0.0, 0.2),
            hcal_response: (0.3, 0.6),
            noise_hits: 20,
            noise_energy: 0.3,
            missing_product_prob: 0.0,
            calibration: CaloCalibration::default(),
        }
    }
}

impl GeneratorConfig {
    /// Noise-free events
    pub fn clean() -> Self {
        GeneratorConfig {
            noise_hits: 0,
            ..Default::default()
        }
    }

    /// Miscalibrated calorimeter with frequently missing HCAL data
    pub fn degraded() -> Self {
        GeneratorConfig {
            noise_hits: 60,
            noise_energy: 0.8,
            missing_product_prob: 0.3,
            calibration: CaloCalibration {
                ecal_scale: 1.05,
                hcal_scale: 1.2,
            },
            ..Default::default()
        }
    }
}

/// One generated event
#[derive(Debug, Clone)]
pub struct GeneratedEvent {
    pub event: Event,
    pub setup: EventSetup,
    pub taus: Vec<TauJet>,
    /// Generated visible momentum of each tau
    pub truth: Vec<LorentzVector>,
}

/// Seeded tau event generator
pub struct TauEventGenerator {
    config: GeneratorConfig,
    rng: StdRng,
    next_event: u64,
    run: u32,
}

impl TauEventGenerator {
    pub fn with_seed(config: GeneratorConfig, seed: u64) -> Self {
        TauEventGenerator {
            config,
            rng: StdRng::seed_from_u64(seed),
            next_event: 1,
            run: 1,
        }
    }

    fn uniform(&mut self, range: (f64, f64)) -> f64 {
        if range.1 > range.0 {
            self.rng.gen_range(range.0..range.1)
        } else {
            range.0
        }
    }

    /// Generate an event with `n_taus` taus spread evenly in φ
    pub fn generate(&mut self, n_taus: usize) -> GeneratedEvent {
        let id = EventId::new(self.run, self.next_event);
        self.next_event += 1;

        let mut barrel = Vec::new();
        let mut endcap = Vec::new();
        let mut hcal = Vec::new();
        let mut taus = Vec::with_capacity(n_taus);
        let mut truth = Vec::with_capacity(n_taus);

        let phi0 = self.rng.gen_range(-PI..PI);
        for i in 0..n_taus {
            let phi = phi0 + 2.0 * PI * i as f64 / n_taus as f64;
            let (tau, visible, ecal_hits, hcal_hits) = self.generate_tau(phi);
            for hit in ecal_hits {
                if hit.eta.abs() < ECAL_BARREL_ETA {
                    barrel.push(hit);
                } else {
                    endcap.push(hit);
                }
            }
            hcal.extend(hcal_hits);
            taus.push(tau);
            truth.push(visible);
        }

        for _ in 0..self.config.noise_hits {
            let eta = self.rng.gen_range(-3.0..3.0);
            let phi = self.rng.gen_range(-PI..PI);
            let energy = self.rng.gen_range(0.0..self.config.noise_energy.max(f64::EPSILON));
            let hit = CaloHit::new(eta, phi, energy);
            if self.rng.gen_bool(0.5) {
                hcal.push(hit);
            } else if eta.abs() < ECAL_BARREL_ETA {
                barrel.push(hit);
            } else {
                endcap.push(hit);
            }
        }

        let mut event = Event::new(id);
        event.put(ECAL_BARREL_LABEL, Product::CaloHits(barrel));
        event.put(ECAL_ENDCAP_LABEL, Product::CaloHits(endcap));
        if !self.rng.gen_bool(self.config.missing_product_prob.clamp(0.0, 1.0)) {
            event.put(HCAL_LABEL, Product::CaloHits(hcal));
        }

        GeneratedEvent {
            event,
            setup: EventSetup::with_calibration(self.config.calibration),
            taus,
            truth,
        }
    }

    /// One tau: reconstructed jet, visible momentum, ECAL and HCAL hits
    fn generate_tau(&mut self, phi: f64) -> (TauJet, LorentzVector, Vec<CaloHit>, Vec<CaloHit>) {
        let pt = self.uniform(self.config.pt_range);
        let eta = self.rng.gen_range(-self.config.eta_max..self.config.eta_max);
        let prongs = if self.rng.gen_bool(self.config.three_prong_prob) {
            3
        } else {
            1
        };
        let charged = self.uniform(self.config.charged_fraction);
        let calibration = self.config.calibration;

        let mut tracks = Vec::with_capacity(prongs);
        let mut ecal = Vec::new();
        let mut hcal = Vec::new();
        let mut visible = LorentzVector::ZERO;
        let mut raw = LorentzVector::ZERO;

        // Charged pions share the charged pt unevenly, leading first
        let shares: &[f64] = if prongs == 3 { &[0.5, 0.3, 0.2] } else { &[1.0] };
        for (k, share) in shares.iter().enumerate() {
            let (t_eta, t_phi) = if k == 0 {
                (eta, phi)
            } else {
                (
                    eta + self.rng.gen_range(-0.05..0.05),
                    phi + self.rng.gen_range(-0.05..0.05),
                )
            };
            let track = Track::new(pt * charged * share, t_eta, t_phi);
            let p = track.p();
            visible += LorentzVector::massless(track.momentum);

            let e_ecal = p * self.uniform(self.config.ecal_fraction);
            let e_hcal = p * self.uniform(self.config.hcal_response);
            let ecal_hit = CaloHit::new(t_eta, t_phi, e_ecal);
            let hcal_hit = CaloHit::new(t_eta, t_phi, e_hcal);
            raw += LorentzVector::massless(ecal_hit.vector(1.0));
            raw += LorentzVector::massless(hcal_hit.vector(1.0));
            ecal.push(CaloHit::new(t_eta, t_phi, e_ecal / calibration.ecal_scale));
            hcal.push(CaloHit::new(t_eta, t_phi, e_hcal / calibration.hcal_scale));
            tracks.push(track);
        }

        let neutral_pt = pt * (1.0 - charged);
        if neutral_pt > 0.0 {
            // Outside the matching cone, inside the ECAL cone
            let offset = self.rng.gen_range(0.2..0.4);
            let angle = self.rng.gen_range(-PI..PI);
            let g_eta = eta + offset * angle.cos();
            let g_phi = phi + offset * angle.sin();
            let photon = LorentzVector::from_pt_eta_phi_m(neutral_pt, g_eta, g_phi, 0.0);
            visible += photon;
            raw += photon;
            ecal.push(CaloHit::new(g_eta, g_phi, photon.e / calibration.ecal_scale));
        }

        let raw_jet = LorentzVector::from_pt_eta_phi_m(raw.pt(), raw.eta(), raw.phi(), 0.0);
        (TauJet::new(raw_jet, tracks), visible, ecal, hcal)
    }
}

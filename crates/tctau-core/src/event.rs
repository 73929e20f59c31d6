//! Event and event-setup stand-ins
//!
//! `Event` carries labelled data products for one collision event.
//! `EventSetup` carries conditions (calibration) valid for the event's run.
//! Both are owned by the caller and only borrowed by the corrector.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{delta_r, Track, Vector3};

/// Event identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct EventId {
    pub run: u32,
    pub event: u64,
}

impl EventId {
    pub fn new(run: u32, event: u64) -> Self {
        EventId { run, event }
    }
}

/// Calorimeter energy deposit (uncalibrated)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaloHit {
    pub eta: f64,
    pub phi: f64,
    pub energy: f64,
}

impl CaloHit {
    pub fn new(eta: f64, phi: f64, energy: f64) -> Self {
        CaloHit { eta, phi, energy }
    }

    /// Energy-weighted direction vector
    pub fn vector(&self, scale: f64) -> Vector3 {
        Vector3::from_eta_phi(self.energy * scale, self.eta, self.phi)
    }

    /// ΔR to a direction
    pub fn delta_r(&self, eta: f64, phi: f64) -> f64 {
        delta_r(self.eta, self.phi, eta, phi)
    }
}

/// Labelled event data product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Product {
    CaloHits(Vec<CaloHit>),
    Tracks(Vec<Track>),
}

/// Collision event
#[derive(Debug, Clone, Default)]
pub struct Event {
    id: EventId,
    products: HashMap<String, Product>,
}

impl Event {
    pub fn new(id: EventId) -> Self {
        Event {
            id,
            products: HashMap::new(),
        }
    }

    pub fn id(&self) -> EventId {
        self.id
    }

    /// Store a product under `label`, replacing any previous one
    pub fn put(&mut self, label: impl Into<String>, product: Product) {
        self.products.insert(label.into(), product);
    }

    pub fn get(&self, label: &str) -> Option<&Product> {
        self.products.get(label)
    }

    /// Calorimeter hits stored under `label`
    pub fn calo_hits(&self, label: &str) -> Option<&[CaloHit]> {
        match self.get(label)? {
            Product::CaloHits(hits) => Some(hits),
            _ => None,
        }
    }

    pub fn tracks(&self, label: &str) -> Option<&[Track]> {
        match self.get(label)? {
            Product::Tracks(tracks) => Some(tracks),
            _ => None,
        }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.products.contains_key(label)
    }
}

/// Calorimeter energy-scale conditions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaloCalibration {
    /// Multiplier applied to ECAL hit energies
    pub ecal_scale: f64,
    /// Multiplier applied to HCAL hit energies
    pub hcal_scale: f64,
}

impl Default for CaloCalibration {
    fn default() -> Self {
        CaloCalibration {
            ecal_scale: 1.0,
            hcal_scale: 1.0,
        }
    }
}

/// Conditions valid for the current run
#[derive(Debug, Clone, Default)]
pub struct EventSetup {
    calibration: Option<CaloCalibration>,
}

impl EventSetup {
    /// Setup with no conditions records
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_calibration(calibration: CaloCalibration) -> Self {
        EventSetup {
            calibration: Some(calibration),
        }
    }

    pub fn calibration(&self) -> Option<&CaloCalibration> {
        self.calibration.as_ref()
    }
}

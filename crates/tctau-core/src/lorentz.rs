//! Kinematics primitives
//!
//! Cartesian three-vectors and (px, py, pz, E) Lorentz vectors in GeV,
//! plus the (η, φ) geometry used for cone matching.

use std::f64::consts::PI;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Pseudorapidity reported for vectors along the beam axis
const BEAM_AXIS_ETA: f64 = 1e10;

/// Cartesian three-vector
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Build from magnitude and direction (η, φ)
    pub fn from_eta_phi(mag: f64, eta: f64, phi: f64) -> Self {
        let theta = 2.0 * (-eta).exp().atan();
        Self {
            x: mag * theta.sin() * phi.cos(),
            y: mag * theta.sin() * phi.sin(),
            z: mag * theta.cos(),
        }
    }

    /// Magnitude
    pub fn mag(&self) -> f64 {
        self.mag2().sqrt()
    }

    pub fn mag2(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Transverse component
    pub fn perp(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn phi(&self) -> f64 {
        if self.x == 0.0 && self.y == 0.0 {
            0.0
        } else {
            self.y.atan2(self.x)
        }
    }

    pub fn eta(&self) -> f64 {
        let pt = self.perp();
        if pt > 0.0 {
            (self.z / pt).asinh()
        } else if self.z > 0.0 {
            BEAM_AXIS_ETA
        } else if self.z < 0.0 {
            -BEAM_AXIS_ETA
        } else {
            0.0
        }
    }
}

impl Add for Vector3 {
    type Output = Vector3;

    fn add(self, rhs: Vector3) -> Self::Output {
        Vector3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vector3 {
    fn add_assign(&mut self, rhs: Vector3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

/// Lorentz four-vector (px, py, pz, E)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LorentzVector {
    pub px: f64,
    pub py: f64,
    pub pz: f64,
    pub e: f64,
}

impl LorentzVector {
    pub const ZERO: LorentzVector = LorentzVector {
        px: 0.0,
        py: 0.0,
        pz: 0.0,
        e: 0.0,
    };

    /// Build from cartesian momentum and energy
    pub fn from_xyzt(px: f64, py: f64, pz: f64, e: f64) -> Self {
        Self { px, py, pz, e }
    }

    /// Build from a momentum and an energy
    pub fn from_momentum(p: Vector3, e: f64) -> Self {
        Self::from_xyzt(p.x, p.y, p.z, e)
    }

    /// Massless vector along a momentum (E = |p|)
    pub fn massless(p: Vector3) -> Self {
        Self::from_momentum(p, p.mag())
    }

    /// Build from (pt, η, φ, m)
    pub fn from_pt_eta_phi_m(pt: f64, eta: f64, phi: f64, m: f64) -> Self {
        let px = pt * phi.cos();
        let py = pt * phi.sin();
        let pz = pt * eta.sinh();
        let e = (px * px + py * py + pz * pz + m * m).sqrt();
        Self { px, py, pz, e }
    }

    pub fn momentum(&self) -> Vector3 {
        Vector3::new(self.px, self.py, self.pz)
    }

    /// |p|
    pub fn p(&self) -> f64 {
        self.momentum().mag()
    }

    pub fn pt(&self) -> f64 {
        self.px.hypot(self.py)
    }

    /// Transverse energy E·sinθ
    pub fn et(&self) -> f64 {
        let p = self.p();
        if p > 0.0 {
            self.e * self.pt() / p
        } else {
            0.0
        }
    }

    pub fn eta(&self) -> f64 {
        self.momentum().eta()
    }

    pub fn phi(&self) -> f64 {
        self.momentum().phi()
    }

    /// All four components scaled by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        Self::from_xyzt(
            self.px * factor,
            self.py * factor,
            self.pz * factor,
            self.e * factor,
        )
    }

    pub fn is_finite(&self) -> bool {
        self.px.is_finite() && self.py.is_finite() && self.pz.is_finite() && self.e.is_finite()
    }
}

impl Add for LorentzVector {
    type Output = LorentzVector;

    fn add(self, rhs: LorentzVector) -> Self::Output {
        LorentzVector::from_xyzt(
            self.px + rhs.px,
            self.py + rhs.py,
            self.pz + rhs.pz,
            self.e + rhs.e,
        )
    }
}

impl AddAssign for LorentzVector {
    fn add_assign(&mut self, rhs: LorentzVector) {
        *self = *self + rhs;
    }
}

/// φ difference folded into [-π, π]
pub fn delta_phi(phi1: f64, phi2: f64) -> f64 {
    let mut dphi = phi1 - phi2;
    while dphi > PI {
        dphi -= 2.0 * PI;
    }
    while dphi <= -PI {
        dphi += 2.0 * PI;
    }
    dphi
}

/// ΔR = sqrt(Δη² + Δφ²)
pub fn delta_r(eta1: f64, phi1: f64, eta2: f64, phi2: f64) -> f64 {
    let deta = eta1 - eta2;
    let dphi = delta_phi(phi1, phi2);
    (deta * deta + dphi * dphi).sqrt()
}

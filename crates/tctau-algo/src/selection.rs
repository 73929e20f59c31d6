//! Track quality selection

use tctau_core::{ParameterSet, TauError, TauResult, Track};

/// Quality cuts applied to leading and signal tracks
#[derive(Debug, Clone, PartialEq)]
pub struct TrackSelector {
    /// Minimum track pt (GeV)
    pub min_pt: f64,
    /// Maximum |transverse impact parameter| (cm)
    pub max_ip: f64,
    /// Maximum normalized χ²
    pub max_chi2: f64,
    pub min_pixel_hits: u32,
    pub min_tracker_hits: u32,
}

impl Default for TrackSelector {
    fn default() -> Self {
        TrackSelector {
            min_pt: 1.0,
            max_ip: 0.03,
            max_chi2: 100.0,
            min_pixel_hits: 0,
            min_tracker_hits: 5,
        }
    }
}

fn positive(v: f64) -> bool {
    v > 0.0
}

fn hit_count(params: &ParameterSet, name: &str, default: u32) -> TauResult<u32> {
    let n = params.get_int_or(name, default as i64)?;
    u32::try_from(n).map_err(|_| TauError::invalid(name, "must be a non-negative count"))
}

impl TrackSelector {
    /// Read `Track_minPt`, `tkmaxipt`, `tkmaxChi2`, `tkminPixelHitsn`, `tkminTrackerHitsn`
    pub fn from_pset(params: &ParameterSet) -> TauResult<Self> {
        let d = TrackSelector::default();
        let selector = TrackSelector {
            min_pt: params.get_double_or("Track_minPt", d.min_pt)?,
            max_ip: params.get_double_or("tkmaxipt", d.max_ip)?,
            max_chi2: params.get_double_or("tkmaxChi2", d.max_chi2)?,
            min_pixel_hits: hit_count(params, "tkminPixelHitsn", d.min_pixel_hits)?,
            min_tracker_hits: hit_count(params, "tkminTrackerHitsn", d.min_tracker_hits)?,
        };
        if selector.min_pt.is_nan() || selector.min_pt < 0.0 {
            return Err(TauError::invalid("Track_minPt", "must not be negative"));
        }
        if !positive(selector.max_ip) {
            return Err(TauError::invalid("tkmaxipt", "must be positive"));
        }
        if !positive(selector.max_chi2) {
            return Err(TauError::invalid("tkmaxChi2", "must be positive"));
        }
        Ok(selector)
    }

    /// Hit and fit quality cuts, without the pt threshold
    pub fn quality(&self, track: &Track) -> bool {
        track.transverse_ip.abs() < self.max_ip
            && track.chi2 < self.max_chi2
            && track.pixel_hits >= self.min_pixel_hits
            && track.tracker_hits >= self.min_tracker_hits
    }

    /// Quality cuts plus the pt threshold
    pub fn accept(&self, track: &Track) -> bool {
        self.quality(track) && track.pt() > self.min_pt
    }
}

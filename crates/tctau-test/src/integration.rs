//! End-to-end correction scenarios
//!
//! Runs generated events through a configured corrector and compares raw
//! and corrected tau energies with the generated visible energy.

use tctau_core::{ParameterSet, TauResult};
use tctau_corrector::TauCorrector;

use crate::{EventLoop, GeneratorConfig, LoopStats, TauEventGenerator};

/// Relative energy response (E_reco / E_true - 1) summary
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Response {
    pub count: usize,
    pub mean: f64,
    pub rms: f64,
}

impl Response {
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        let deviations: Vec<f64> = pairs
            .iter()
            .filter(|(_, truth)| *truth > 0.0)
            .map(|(reco, truth)| reco / truth - 1.0)
            .collect();
        if deviations.is_empty() {
            return Response::default();
        }
        let n = deviations.len() as f64;
        let mean = deviations.iter().sum::<f64>() / n;
        let rms = (deviations.iter().map(|d| d * d).sum::<f64>() / n).sqrt();
        Response {
            count: deviations.len(),
            mean,
            rms,
        }
    }
}

/// Outcome of one scenario
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub loop_stats: LoopStats,
    pub raw: Response,
    pub corrected: Response,
    pub efficiency: f64,
}

/// Generate `events` events and correct them with `params`
pub fn run_scenario(
    params: &ParameterSet,
    config: GeneratorConfig,
    events: usize,
    taus_per_event: usize,
    seed: u64,
) -> TauResult<ScenarioReport> {
    let corrector = TauCorrector::with_config(params)?;
    let mut event_loop = EventLoop::new(corrector);
    let mut generator = TauEventGenerator::with_seed(config, seed);

    let mut raw = Vec::new();
    let mut corrected = Vec::new();

    for _ in 0..events {
        let generated = generator.generate(taus_per_event);
        let results = event_loop.process(&generated.event, &generated.setup, &generated.taus);
        for ((tau, truth), result) in generated.taus.iter().zip(&generated.truth).zip(results) {
            let Ok(p4) = result else {
                continue;
            };
            // Dropped candidates carry no energy to compare
            if p4.e > 0.0 {
                raw.push((tau.energy(), truth.e));
                corrected.push((p4.e, truth.e));
            }
        }
    }

    Ok(ScenarioReport {
        loop_stats: event_loop.stats().clone(),
        raw: Response::from_pairs(&raw),
        corrected: Response::from_pairs(&corrected),
        efficiency: event_loop.corrector().efficiency(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init_tracing;
    use tctau_algo::presets;

    #[test]
    fn test_tctau_restores_visible_energy() {
        init_tracing();
        let report = run_scenario(
            &presets::tctau_defaults(),
            GeneratorConfig::clean(),
            50,
            2,
            2024,
        )
        .unwrap();

        assert_eq!(report.loop_stats.taus, 100);
        assert_eq!(report.loop_stats.failed, 0);
        assert_eq!(report.corrected.count, 100);
        // Raw calorimeter jets under-measure, track-based energy does not
        assert!(report.raw.mean < -0.1);
        assert!(report.corrected.mean.abs() < 0.01);
        assert!(report.corrected.rms < report.raw.rms);
        assert!((report.efficiency - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_tctau_with_noise_and_miscalibration() {
        let config = GeneratorConfig {
            missing_product_prob: 0.0,
            ..GeneratorConfig::degraded()
        };
        let report = run_scenario(&presets::tctau_defaults(), config, 40, 2, 99).unwrap();

        assert_eq!(report.loop_stats.failed, 0);
        assert!(report.corrected.rms < report.raw.rms);
    }

    #[test]
    fn test_missing_data_is_contained() {
        let report = run_scenario(
            &presets::tctau_defaults(),
            GeneratorConfig::degraded(),
            60,
            2,
            7,
        )
        .unwrap();

        let stats = &report.loop_stats;
        assert_eq!(stats.events, 60);
        assert!(stats.events_without_context > 0);
        assert!(stats.events_without_context < 60);
        assert_eq!(stats.failed, 2 * stats.events_without_context);
        assert_eq!(stats.failed, stats.failed_missing_data);
        assert_eq!(stats.corrected + stats.failed, stats.taus);
    }

    #[test]
    fn test_parametrized_needs_no_event_data() {
        let report = run_scenario(
            &presets::parametrized_defaults(),
            GeneratorConfig::degraded(),
            30,
            1,
            5,
        )
        .unwrap();

        assert_eq!(report.loop_stats.failed, 0);
        assert_eq!(report.loop_stats.events_without_context, 0);
        // Scaling up under-measured jets moves the mean response towards zero
        assert!(report.corrected.mean > report.raw.mean);
    }

    #[test]
    fn test_response_summary() {
        let r = Response::from_pairs(&[(9.0, 10.0), (11.0, 10.0), (5.0, 0.0)]);
        assert_eq!(r.count, 2);
        assert!(r.mean.abs() < 1e-12);
        assert!((r.rms - 0.1).abs() < 1e-12);
        assert_eq!(Response::from_pairs(&[]), Response::default());
    }
}

//! Per-event processing loop
//!
//! Mirrors how a host framework drives a corrector: forward the event
//! context when the corrector asks for it, then correct every tau-jet and
//! keep going whatever happens to a single candidate.

use tctau_core::{ErrorKind, Event, EventSetup, LorentzVector, TauJet, TauResult};
use tctau_corrector::TauJetCorrector;
use tracing::{trace, warn};

/// Loop counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub events: u64,
    /// Events whose context the corrector rejected
    pub events_without_context: u64,
    pub taus: u64,
    pub corrected: u64,
    pub failed: u64,
    /// Failures caused by missing event data or context
    pub failed_missing_data: u64,
}

/// Drives any tau-jet corrector event by event
pub struct EventLoop<C: TauJetCorrector> {
    corrector: C,
    stats: LoopStats,
}

impl<C: TauJetCorrector> EventLoop<C> {
    pub fn new(corrector: C) -> Self {
        EventLoop {
            corrector,
            stats: LoopStats::default(),
        }
    }

    /// Process one event; one result per tau-jet, in order
    pub fn process(
        &mut self,
        event: &Event,
        setup: &EventSetup,
        taus: &[TauJet],
    ) -> Vec<TauResult<LorentzVector>> {
        self.stats.events += 1;

        if self.corrector.event_required() {
            if let Err(e) = self.corrector.set_event_context(event, setup) {
                self.stats.events_without_context += 1;
                warn!(event = event.id().event, error = %e, "continuing without event context");
            }
        }

        let results: Vec<_> = taus
            .iter()
            .map(|tau| self.corrector.corrected_p4(tau))
            .collect();

        for result in &results {
            self.stats.taus += 1;
            match result {
                Ok(_) => self.stats.corrected += 1,
                Err(e) => {
                    self.stats.failed += 1;
                    if matches!(
                        e.kind(),
                        ErrorKind::MissingEventData | ErrorKind::NotInitialized
                    ) {
                        self.stats.failed_missing_data += 1;
                    }
                    trace!(error = %e, "tau candidate not corrected");
                }
            }
        }

        results
    }

    pub fn stats(&self) -> &LoopStats {
        &self.stats
    }

    pub fn corrector(&self) -> &C {
        &self.corrector
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GeneratorConfig, TauEventGenerator};
    use tctau_algo::presets;
    use tctau_corrector::TauCorrector;

    #[test]
    fn test_loop_counts() {
        let corrector = TauCorrector::with_config(&presets::tctau_defaults()).unwrap();
        let mut event_loop = EventLoop::new(corrector);
        let mut generator = TauEventGenerator::with_seed(GeneratorConfig::default(), 3);

        for _ in 0..10 {
            let generated = generator.generate(2);
            let results = event_loop.process(&generated.event, &generated.setup, &generated.taus);
            assert_eq!(results.len(), 2);
        }

        let stats = event_loop.stats();
        assert_eq!(stats.events, 10);
        assert_eq!(stats.taus, 20);
        assert_eq!(stats.corrected, 20);
        assert_eq!(stats.failed, 0);
        assert_eq!(event_loop.corrector().all_tau_candidates(), 20);
    }

    #[test]
    fn test_missing_hcal_fails_per_object() {
        let corrector = TauCorrector::with_config(&presets::tctau_defaults()).unwrap();
        let mut event_loop = EventLoop::new(corrector);
        let config = GeneratorConfig {
            missing_product_prob: 1.0,
            ..GeneratorConfig::clean()
        };
        let mut generator = TauEventGenerator::with_seed(config, 11);

        let generated = generator.generate(3);
        let results = event_loop.process(&generated.event, &generated.setup, &generated.taus);
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.is_err()));

        let stats = event_loop.stats();
        assert_eq!(stats.events_without_context, 1);
        assert_eq!(stats.failed_missing_data, 3);
        assert_eq!(event_loop.corrector().all_tau_candidates(), 0);
    }

    #[test]
    fn test_kinematic_corrector_skips_context() {
        let corrector = TauCorrector::with_config(&presets::parametrized_defaults()).unwrap();
        let mut event_loop = EventLoop::new(corrector);
        let config = GeneratorConfig {
            missing_product_prob: 1.0,
            ..GeneratorConfig::clean()
        };
        let mut generator = TauEventGenerator::with_seed(config, 5);

        let generated = generator.generate(2);
        let results = event_loop.process(&generated.event, &generated.setup, &generated.taus);
        assert!(results.iter().all(|r| r.is_ok()));
        assert_eq!(event_loop.stats().events_without_context, 0);
    }
}

//! Rule layer first, learned layer second.

use std::sync::Arc;

use log::{trace, warn};

use crate::core::LatLon;

use super::learned::LearnedLayer;
use super::rules::RuleLayer;
use super::ObstacleOracle;

/// Default probability above which a learned assessment blocks
pub const DEFAULT_PROBABILITY_THRESHOLD: f64 = 0.5;

/// Combined obstacle oracle.
///
/// A rule "blocked" verdict is final and the learned layer is not consulted.
/// Otherwise the learned layer decides; its absence or failure means "not
/// blocked".
#[derive(Clone)]
pub struct ObstacleEngine {
    rules: RuleLayer,
    learned: Option<Arc<dyn LearnedLayer>>,
    probability_threshold: f64,
}

impl ObstacleEngine {
    pub fn new(rules: RuleLayer) -> Self {
        Self {
            rules,
            learned: None,
            probability_threshold: DEFAULT_PROBABILITY_THRESHOLD,
        }
    }

    pub fn with_learned(mut self, layer: Arc<dyn LearnedLayer>) -> Self {
        self.learned = Some(layer);
        self
    }

    pub fn with_probability_threshold(mut self, threshold: f64) -> Self {
        self.probability_threshold = threshold;
        self
    }

    pub fn rules(&self) -> &RuleLayer {
        &self.rules
    }

    pub fn has_learned_layer(&self) -> bool {
        self.learned.is_some()
    }

    fn learned_verdict(&self, at: LatLon) -> bool {
        let Some(layer) = &self.learned else {
            return false;
        };
        match layer.assess(at) {
            Ok(assessment) => {
                trace!("[ObstacleEngine] learned {:?} at {:?}", assessment, at);
                assessment.is_blocked(self.probability_threshold)
            }
            Err(e) => {
                warn!("[ObstacleEngine] {} - treating as not blocked", e);
                false
            }
        }
    }
}

impl ObstacleOracle for ObstacleEngine {
    fn is_blocked(&self, at: LatLon) -> bool {
        if self.rules.is_blocked(at) {
            trace!("[ObstacleEngine] rule layer blocks {:?}", at);
            return true;
        }
        self.learned_verdict(at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OracleError;
    use crate::oracle::Assessment;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        verdict: bool,
        calls: AtomicUsize,
    }

    impl Counting {
        fn new(verdict: bool) -> Arc<Self> {
            Arc::new(Self {
                verdict,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl LearnedLayer for Counting {
        fn assess(&self, _at: LatLon) -> Result<Assessment, OracleError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Assessment::Verdict(self.verdict))
        }
    }

    struct Broken;

    impl LearnedLayer for Broken {
        fn assess(&self, _at: LatLon) -> Result<Assessment, OracleError> {
            Err(OracleError::Unavailable("model not loaded".into()))
        }
    }

    fn rules_with_zone() -> RuleLayer {
        RuleLayer::new().with_restricted_zone(
            "firing-range",
            &[[70.0, 10.0], [70.1, 10.0], [70.1, 10.1], [70.0, 10.1]],
        )
    }

    #[test]
    fn test_rule_block_is_final() {
        let learned = Counting::new(false);
        let engine = ObstacleEngine::new(rules_with_zone()).with_learned(learned.clone());

        assert!(engine.is_blocked(LatLon::new(10.05, 70.05)));
        assert_eq!(learned.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_rule_and_learned_both_block() {
        let engine = ObstacleEngine::new(rules_with_zone()).with_learned(Counting::new(true));
        assert!(engine.is_blocked(LatLon::new(10.05, 70.05)));
    }

    #[test]
    fn test_learned_decides_outside_rules() {
        let blocking = ObstacleEngine::new(rules_with_zone()).with_learned(Counting::new(true));
        let clear = ObstacleEngine::new(rules_with_zone()).with_learned(Counting::new(false));
        let outside = LatLon::new(11.0, 71.0);

        assert!(blocking.is_blocked(outside));
        assert!(!clear.is_blocked(outside));
    }

    #[test]
    fn test_fail_open() {
        let outside = LatLon::new(11.0, 71.0);
        assert!(!ObstacleEngine::new(rules_with_zone()).is_blocked(outside));
        assert!(
            !ObstacleEngine::new(rules_with_zone())
                .with_learned(Arc::new(Broken))
                .is_blocked(outside)
        );
    }

    #[test]
    fn test_probability_threshold() {
        struct Fixed;
        impl LearnedLayer for Fixed {
            fn assess(&self, _at: LatLon) -> Result<Assessment, OracleError> {
                Ok(Assessment::Probability(0.6))
            }
        }
        let at = LatLon::new(0.0, 0.0);
        let engine = ObstacleEngine::new(RuleLayer::new()).with_learned(Arc::new(Fixed));
        assert!(engine.is_blocked(at));
        assert!(!engine.with_probability_threshold(0.8).is_blocked(at));
    }
}

//! Obstacle oracle: is a coordinate currently impassable?
//!
//! The oracle is composed from independent layers:
//!
//! - [`RuleLayer`]: static land mask and restricted zones (authoritative)
//! - [`LearnedLayer`]: any probabilistic or boolean classifier, optionally
//!   isolated behind a timeout by [`TimedLearnedLayer`]
//! - [`ObstacleChecker`]: external checker returning either a verdict or a
//!   list of nearby obstacles, wrapped by [`ProximityOracle`]
//!
//! [`ObstacleEngine`] combines the rule layer with a learned layer. Every
//! failure below the oracle boundary degrades to "not blocked".

mod engine;
mod learned;
mod proximity;
mod rules;
mod timed;

pub use engine::{DEFAULT_PROBABILITY_THRESHOLD, ObstacleEngine};
pub use learned::{Assessment, LearnedLayer, Sighting, SightingsLayer};
pub use proximity::{CheckerReport, ObstacleChecker, ProximityOracle};
pub use rules::{RestrictedZone, RuleLayer, RuleSpec};
pub use timed::TimedLearnedLayer;

use crate::core::LatLon;

/// Capability answering whether a position is currently impassable.
///
/// Verdicts are computed fresh per query and never cached.
pub trait ObstacleOracle: Send + Sync {
    fn is_blocked(&self, at: LatLon) -> bool;

    /// Verdict for oracles that reason about proximity.
    ///
    /// Oracles without a notion of distance ignore `threshold_km`.
    fn is_blocked_within(&self, at: LatLon, threshold_km: f64) -> bool {
        let _ = threshold_km;
        self.is_blocked(at)
    }
}

/// Oracle that never reports an obstacle
#[derive(Clone, Copy, Debug, Default)]
pub struct OpenWater;

impl ObstacleOracle for OpenWater {
    fn is_blocked(&self, _at: LatLon) -> bool {
        false
    }
}

/// Oracle backed by a plain predicate.
///
/// ```rust,ignore
/// let band = FnOracle(|at: LatLon| at.lat > 10.027 && at.lat < 10.033);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct FnOracle<F>(pub F);

impl<F> ObstacleOracle for FnOracle<F>
where
    F: Fn(LatLon) -> bool + Send + Sync,
{
    fn is_blocked(&self, at: LatLon) -> bool {
        (self.0)(at)
    }
}

//! External checkers that report nearby obstacles instead of a verdict.

use log::warn;
use serde_json::Value;

use crate::core::LatLon;
use crate::error::OracleError;

use super::ObstacleOracle;

/// Tagged checker output.
#[derive(Clone, Debug, PartialEq)]
pub enum CheckerReport {
    /// Direct verdict for the queried point
    Blocked(bool),
    /// Obstacles near the queried point
    NearbyObstacles(Vec<LatLon>),
}

impl CheckerReport {
    /// Convert an untyped checker response.
    ///
    /// Accepts a JSON bool, or an array of `[lat, lon]` pairs.
    pub fn from_json(value: &Value) -> Result<Self, OracleError> {
        match value {
            Value::Bool(blocked) => Ok(CheckerReport::Blocked(*blocked)),
            Value::Array(items) => items
                .iter()
                .map(coordinate_pair)
                .collect::<Result<Vec<_>, _>>()
                .map(CheckerReport::NearbyObstacles),
            other => Err(OracleError::MalformedResponse(format!(
                "expected bool or coordinate list, got {}",
                other
            ))),
        }
    }

    /// Whether this report blocks `at` given a proximity threshold
    pub fn blocks(&self, at: LatLon, threshold_km: f64) -> bool {
        match self {
            CheckerReport::Blocked(blocked) => *blocked,
            CheckerReport::NearbyObstacles(obstacles) => obstacles
                .iter()
                .any(|obstacle| at.distance_km(obstacle) <= threshold_km),
        }
    }
}

fn coordinate_pair(value: &Value) -> Result<LatLon, OracleError> {
    let malformed = || OracleError::MalformedResponse(format!("not a [lat, lon] pair: {}", value));
    match value.as_array().map(Vec::as_slice) {
        Some([lat, lon]) => match (lat.as_f64(), lon.as_f64()) {
            (Some(lat), Some(lon)) => Ok(LatLon::new(lat, lon)),
            _ => Err(malformed()),
        },
        _ => Err(malformed()),
    }
}

/// External obstacle source queried per position
pub trait ObstacleChecker: Send + Sync {
    fn check(&self, at: LatLon) -> Result<CheckerReport, OracleError>;
}

/// Adapts an [`ObstacleChecker`] to the oracle contract.
///
/// Nearby-obstacle reports block when any obstacle lies within the threshold
/// (haversine). Checker errors are logged and treated as "not blocked".
pub struct ProximityOracle<C> {
    checker: C,
    threshold_km: f64,
}

impl<C: ObstacleChecker> ProximityOracle<C> {
    pub fn new(checker: C, threshold_km: f64) -> Self {
        Self {
            checker,
            threshold_km,
        }
    }
}

impl<C: ObstacleChecker> ObstacleOracle for ProximityOracle<C> {
    fn is_blocked(&self, at: LatLon) -> bool {
        self.is_blocked_within(at, self.threshold_km)
    }

    fn is_blocked_within(&self, at: LatLon, threshold_km: f64) -> bool {
        match self.checker.check(at) {
            Ok(report) => report.blocks(at, threshold_km),
            Err(e) => {
                warn!("[ProximityOracle] {} - treating as not blocked", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct JsonChecker(Value);

    impl ObstacleChecker for JsonChecker {
        fn check(&self, _at: LatLon) -> Result<CheckerReport, OracleError> {
            CheckerReport::from_json(&self.0)
        }
    }

    #[test]
    fn test_from_json_shapes() {
        assert_eq!(
            CheckerReport::from_json(&json!(true)),
            Ok(CheckerReport::Blocked(true))
        );
        assert_eq!(
            CheckerReport::from_json(&json!([[10.0, 70.0], [10.5, 70.5]])),
            Ok(CheckerReport::NearbyObstacles(vec![
                LatLon::new(10.0, 70.0),
                LatLon::new(10.5, 70.5)
            ]))
        );
        assert_eq!(
            CheckerReport::from_json(&json!([])),
            Ok(CheckerReport::NearbyObstacles(vec![]))
        );
    }

    #[test]
    fn test_from_json_malformed() {
        for value in [json!("yes"), json!(1), json!(null), json!([[1.0]]), json!([["a", "b"]])] {
            assert!(matches!(
                CheckerReport::from_json(&value),
                Err(OracleError::MalformedResponse(_))
            ));
        }
    }

    #[test]
    fn test_nearby_obstacles_within_threshold() {
        let oracle = ProximityOracle::new(JsonChecker(json!([[10.0, 70.0]])), 1.5);
        // ~1.1 km away
        assert!(oracle.is_blocked(LatLon::new(10.01, 70.0)));
        // ~2.2 km away
        assert!(!oracle.is_blocked(LatLon::new(10.02, 70.0)));
        assert!(oracle.is_blocked_within(LatLon::new(10.02, 70.0), 3.0));
    }

    #[test]
    fn test_malformed_checker_fails_open() {
        let oracle = ProximityOracle::new(JsonChecker(json!({"blocked": true})), 1.5);
        assert!(!oracle.is_blocked(LatLon::new(10.0, 70.0)));
    }
}

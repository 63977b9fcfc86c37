//! Learned obstacle layer contract and the sightings-based implementation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::LatLon;
use crate::error::OracleError;

/// Output of a learned layer for one position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Assessment {
    /// Obstacle probability in `[0, 1]`
    Probability(f64),
    /// Direct verdict
    Verdict(bool),
}

impl Assessment {
    /// Probabilities block strictly above `threshold`
    pub fn is_blocked(&self, threshold: f64) -> bool {
        match *self {
            Assessment::Probability(p) => p > threshold,
            Assessment::Verdict(blocked) => blocked,
        }
    }
}

/// A classifier that may be slow or fail.
///
/// Model state behind an implementation is loaded once and read-only.
pub trait LearnedLayer: Send + Sync {
    fn assess(&self, at: LatLon) -> Result<Assessment, OracleError>;
}

impl<T: LearnedLayer + ?Sized> LearnedLayer for Arc<T> {
    fn assess(&self, at: LatLon) -> Result<Assessment, OracleError> {
        (**self).assess(at)
    }
}

impl<T: LearnedLayer + ?Sized> LearnedLayer for Box<T> {
    fn assess(&self, at: LatLon) -> Result<Assessment, OracleError> {
        (**self).assess(at)
    }
}

/// Reported obstacle sighting
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sighting {
    pub lat: f64,
    pub lon: f64,
    /// Radius covered by the sighting (km)
    pub radius_km: f64,
    /// Confidence in `[0, 1]`
    pub confidence: f64,
}

/// Obstacle probability from reported sightings: the highest confidence
/// among sightings whose radius covers the query point, else 0.
#[derive(Clone, Debug, Default)]
pub struct SightingsLayer {
    sightings: Vec<Sighting>,
}

impl SightingsLayer {
    pub fn new(sightings: Vec<Sighting>) -> Self {
        Self { sightings }
    }

    pub fn len(&self) -> usize {
        self.sightings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sightings.is_empty()
    }
}

impl LearnedLayer for SightingsLayer {
    fn assess(&self, at: LatLon) -> Result<Assessment, OracleError> {
        let probability = self
            .sightings
            .iter()
            .filter(|s| at.distance_km(&LatLon::new(s.lat, s.lon)) <= s.radius_km)
            .map(|s| s.confidence.clamp(0.0, 1.0))
            .fold(0.0, f64::max);
        Ok(Assessment::Probability(probability))
    }
}

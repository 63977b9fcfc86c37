//! Pluggable edge-cost model.
//!
//! A [`CostMode`] selects the objective per search request; the
//! [`CostModel`] holds the read-only auxiliary data (current field, tuning
//! constants) shared by every request. Rules common to all modes:
//!
//! - an edge into a land node costs `+inf`
//! - an edge into a hazard node adds a fixed penalty on top of the mode cost
//!
//! | Mode             | Cost                                                   |
//! |------------------|--------------------------------------------------------|
//! | `plain_distance` | base distance                                          |
//! | `fastest`        | base / max(min_speed, 1 + assist_gain * assist)        |
//! | `fuel_efficient` | base * (1 + resistance_gain * max(0, resistance))      |
//! | `coastal`        | base + open-water or shoreline penalty                 |
//!
//! `assist` is the current at the origin node projected on the unit move
//! vector, `resistance` its negation.

mod current;

pub use current::{CurrentField, CurrentVector};

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::Node;

/// Optimization objective of a search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostMode {
    /// Current-assisted speed.
    ///
    /// Assisted edges can cost less than their distance, so the A* heuristic
    /// is not admissible here; use Dijkstra when optimality matters.
    Fastest,
    /// Penalize heading into opposing currents
    FuelEfficient,
    /// Keep a comfortable distance from the coast
    Coastal,
    /// Base distance only
    #[default]
    PlainDistance,
}

impl CostMode {
    pub const ALL: [CostMode; 4] = [
        CostMode::Fastest,
        CostMode::FuelEfficient,
        CostMode::Coastal,
        CostMode::PlainDistance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CostMode::Fastest => "fastest",
            CostMode::FuelEfficient => "fuel_efficient",
            CostMode::Coastal => "coastal",
            CostMode::PlainDistance => "plain_distance",
        }
    }
}

impl fmt::Display for CostMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CostMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "fastest" => Ok(CostMode::Fastest),
            "fuel_efficient" => Ok(CostMode::FuelEfficient),
            "coastal" => Ok(CostMode::Coastal),
            "plain_distance" | "distance" => Ok(CostMode::PlainDistance),
            other => Err(format!("unknown cost mode '{}'", other)),
        }
    }
}

/// Tuning constants of the cost modes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostParams {
    /// Added to any edge entering a hazard node (distance units)
    #[serde(default = "defaults::hazard_penalty")]
    pub hazard_penalty: f64,

    /// Speed gained per unit of following current (`fastest`)
    #[serde(default = "defaults::assist_gain")]
    pub assist_gain: f64,

    /// Floor on effective speed (`fastest`)
    #[serde(default = "defaults::min_speed")]
    pub min_speed: f64,

    /// Cost multiplier per unit of opposing current (`fuel_efficient`)
    #[serde(default = "defaults::resistance_gain")]
    pub resistance_gain: f64,

    /// Distance to land beyond which open water is penalized (`coastal`)
    #[serde(default = "defaults::coastal_far_threshold")]
    pub coastal_far_threshold: f64,

    /// Penalty per unit of distance to land beyond the far threshold
    #[serde(default = "defaults::coastal_far_weight")]
    pub coastal_far_weight: f64,

    /// Distance to land below which the shoreline is penalized (`coastal`)
    #[serde(default = "defaults::coastal_near_threshold")]
    pub coastal_near_threshold: f64,

    /// Flat shoreline penalty
    #[serde(default = "defaults::coastal_near_penalty")]
    pub coastal_near_penalty: f64,
}

mod defaults {
    pub fn hazard_penalty() -> f64 {
        50.0
    }
    pub fn assist_gain() -> f64 {
        0.5
    }
    pub fn min_speed() -> f64 {
        0.1
    }
    pub fn resistance_gain() -> f64 {
        3.0
    }
    pub fn coastal_far_threshold() -> f64 {
        8.0
    }
    pub fn coastal_far_weight() -> f64 {
        2.0
    }
    pub fn coastal_near_threshold() -> f64 {
        2.0
    }
    pub fn coastal_near_penalty() -> f64 {
        20.0
    }
}

impl Default for CostParams {
    fn default() -> Self {
        Self {
            hazard_penalty: defaults::hazard_penalty(),
            assist_gain: defaults::assist_gain(),
            min_speed: defaults::min_speed(),
            resistance_gain: defaults::resistance_gain(),
            coastal_far_threshold: defaults::coastal_far_threshold(),
            coastal_far_weight: defaults::coastal_far_weight(),
            coastal_near_threshold: defaults::coastal_near_threshold(),
            coastal_near_penalty: defaults::coastal_near_penalty(),
        }
    }
}

/// Edge-cost function plus its auxiliary inputs. Never mutated by a search.
#[derive(Clone, Debug, Default)]
pub struct CostModel {
    params: CostParams,
    currents: Option<Arc<CurrentField>>,
}

impl CostModel {
    pub fn new(params: CostParams) -> Self {
        Self {
            params,
            currents: None,
        }
    }

    /// Attach a current field (used by `fastest` and `fuel_efficient`)
    pub fn with_currents(mut self, currents: Arc<CurrentField>) -> Self {
        self.currents = Some(currents);
        self
    }

    pub fn params(&self) -> &CostParams {
        &self.params
    }

    /// Cost of moving `from -> to` over an edge of `base_distance`.
    ///
    /// Non-negative, or `+inf` when `to` is land.
    pub fn edge_cost(&self, mode: CostMode, from: &Node, to: &Node, base_distance: f64) -> f64 {
        if to.is_land {
            return f64::INFINITY;
        }

        let cost = match mode {
            CostMode::PlainDistance => base_distance,
            CostMode::Fastest => {
                let assist = self.current_at(from).dot(&move_vector(from, to));
                let speed = (1.0 + self.params.assist_gain * assist).max(self.params.min_speed);
                base_distance / speed
            }
            CostMode::FuelEfficient => {
                let resistance = -self.current_at(from).dot(&move_vector(from, to));
                base_distance * (1.0 + self.params.resistance_gain * resistance.max(0.0))
            }
            CostMode::Coastal => base_distance + self.coastal_penalty(to),
        };

        if to.is_hazard {
            cost + self.params.hazard_penalty
        } else {
            cost
        }
    }

    fn coastal_penalty(&self, to: &Node) -> f64 {
        let Some(d) = to.distance_to_land else {
            return 0.0;
        };
        if d > self.params.coastal_far_threshold {
            self.params.coastal_far_weight * d
        } else if d < self.params.coastal_near_threshold {
            self.params.coastal_near_penalty
        } else {
            0.0
        }
    }

    fn current_at(&self, node: &Node) -> CurrentVector {
        match (&self.currents, node.cell) {
            (Some(field), Some(cell)) => field.at(cell).unwrap_or_default(),
            _ => CurrentVector::default(),
        }
    }
}

/// Unit move vector along (row, col); falls back to (lat, lon) deltas for
/// nodes without raster cells.
fn move_vector(from: &Node, to: &Node) -> CurrentVector {
    let raw = match (from.cell, to.cell) {
        (Some(a), Some(b)) => CurrentVector::new((b.i - a.i) as f64, (b.j - a.j) as f64),
        _ => CurrentVector::new(
            to.position.lat - from.position.lat,
            to.position.lon - from.position.lon,
        ),
    };
    raw.normalized()
}

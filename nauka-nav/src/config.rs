//! Configuration loading for NaukaNav

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use samudra_map::cost::CostParams;
use samudra_map::oracle::{
    DEFAULT_PROBABILITY_THRESHOLD, ObstacleEngine, RestrictedZone, RuleLayer, RuleSpec, Sighting,
    SightingsLayer, TimedLearnedLayer,
};
use samudra_map::session::SessionConfig;
use samudra_map::{Algorithm, CostMode};
use serde::Deserialize;
use tracing::info;

use crate::error::{NaukaError, Result};

/// File looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "nauka.toml";

/// Main configuration structure
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NaukaConfig {
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub cost: CostParams,
    #[serde(default)]
    pub obstacles: ObstacleConfig,
}

/// Graph data locations
#[derive(Clone, Debug, Deserialize)]
pub struct GraphConfig {
    /// Nodes file (JSON array of `{id, lat, lon, i, j}`)
    #[serde(default = "default_nodes_path")]
    pub nodes_path: String,

    /// Adjacency file (JSON object `{id: [[neighbor, km], ...]}`)
    #[serde(default = "default_adjacency_path")]
    pub adjacency_path: String,
}

/// Session and planner settings
#[derive(Clone, Debug, Deserialize)]
pub struct NavigationConfig {
    /// Obstacle proximity threshold in km (default: 1.5)
    #[serde(default = "default_threshold_km")]
    pub threshold_km: f64,

    /// Wait between traversal steps in milliseconds (default: 500)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Reroutes allowed per transit (default: 16)
    #[serde(default = "default_max_reroutes")]
    pub max_reroutes: usize,

    /// Search algorithm (default: astar)
    #[serde(default)]
    pub algorithm: Algorithm,

    /// Cost mode when a command does not name one (default: plain_distance)
    #[serde(default)]
    pub default_mode: CostMode,
}

/// Obstacle oracle layers
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ObstacleConfig {
    /// Land polygons as `[lon, lat]` rings
    #[serde(default)]
    pub land: Vec<Vec<[f64; 2]>>,

    /// Named no-go zones
    #[serde(default)]
    pub restricted_zones: Vec<RestrictedZone>,

    #[serde(default)]
    pub learned: LearnedConfig,
}

/// Learned obstacle layer
#[derive(Clone, Debug, Deserialize)]
pub struct LearnedConfig {
    /// Consult the learned layer at all (default: false)
    #[serde(default)]
    pub enabled: bool,

    /// Per-query timeout in milliseconds (default: 2000)
    #[serde(default = "default_learned_timeout_ms")]
    pub timeout_ms: u64,

    /// Probability above which a point is blocked (default: 0.5)
    #[serde(default = "default_probability_threshold")]
    pub probability_threshold: f64,

    /// Reported obstacle sightings
    #[serde(default)]
    pub sightings: Vec<Sighting>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            nodes_path: default_nodes_path(),
            adjacency_path: default_adjacency_path(),
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            threshold_km: default_threshold_km(),
            poll_interval_ms: default_poll_interval_ms(),
            max_reroutes: default_max_reroutes(),
            algorithm: Algorithm::default(),
            default_mode: CostMode::default(),
        }
    }
}

impl Default for LearnedConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            timeout_ms: default_learned_timeout_ms(),
            probability_threshold: default_probability_threshold(),
            sightings: Vec::new(),
        }
    }
}

// Default value functions
fn default_nodes_path() -> String {
    "data/nodes.json".to_string()
}
fn default_adjacency_path() -> String {
    "data/adjacency.json".to_string()
}
fn default_threshold_km() -> f64 {
    1.5
}
fn default_poll_interval_ms() -> u64 {
    500
}
fn default_max_reroutes() -> usize {
    16
}
fn default_learned_timeout_ms() -> u64 {
    2000
}
fn default_probability_threshold() -> f64 {
    DEFAULT_PROBABILITY_THRESHOLD
}

impl NaukaConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| NaukaError::Config(format!("Failed to read config file: {}", e)))?;
        let config: NaukaConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, else `nauka.toml` if present, else defaults
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            info!("Loading configuration from {:?}", path);
            return Self::load(path);
        }
        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fallback.exists() {
            info!("Loading configuration from {}", DEFAULT_CONFIG_FILE);
            Self::load(fallback)
        } else {
            info!("Using default configuration");
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<()> {
        if self.navigation.threshold_km.is_nan() || self.navigation.threshold_km < 0.0 {
            return Err(NaukaError::Config(format!(
                "navigation.threshold_km must be non-negative, got {}",
                self.navigation.threshold_km
            )));
        }
        if self.cost.min_speed <= 0.0 {
            return Err(NaukaError::Config(format!(
                "cost.min_speed must be positive, got {}",
                self.cost.min_speed
            )));
        }
        let p = self.obstacles.learned.probability_threshold;
        if !(0.0..=1.0).contains(&p) {
            return Err(NaukaError::Config(format!(
                "obstacles.learned.probability_threshold must be in [0, 1], got {}",
                p
            )));
        }
        Ok(())
    }

    /// Session settings for the planner and driver
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            threshold_km: self.navigation.threshold_km,
            poll_interval: Duration::from_millis(self.navigation.poll_interval_ms),
            max_reroutes: self.navigation.max_reroutes,
            algorithm: self.navigation.algorithm,
        }
    }

    /// Static rule layer from the configured polygons
    pub fn rule_layer(&self) -> RuleLayer {
        RuleLayer::from_spec(&RuleSpec {
            land: self.obstacles.land.clone(),
            restricted_zones: self.obstacles.restricted_zones.clone(),
        })
    }

    /// Obstacle engine: rule layer plus the optional learned layer
    pub fn obstacle_engine(&self) -> Result<ObstacleEngine> {
        let learned = &self.obstacles.learned;
        let mut engine = ObstacleEngine::new(self.rule_layer())
            .with_probability_threshold(learned.probability_threshold);

        if learned.enabled {
            let layer = TimedLearnedLayer::spawn(
                SightingsLayer::new(learned.sightings.clone()),
                Duration::from_millis(learned.timeout_ms),
            )?;
            info!(
                "Learned layer enabled: {} sightings, {} ms timeout",
                learned.sightings.len(),
                learned.timeout_ms
            );
            engine = engine.with_learned(Arc::new(layer));
        }
        Ok(engine)
    }
}

//! One-shot services over a shared navigation context.
//!
//! [`Navigator`] answers route queries, reroute-aware simulations and direct
//! obstacle checks, and starts live sessions. [`compare_modes`] runs every
//! cost mode over a raster for side-by-side comparison.

mod compare;
mod demo;

pub use compare::{ModeRoute, compare_modes};
pub use demo::DemoLayout;

use log::debug;
use serde::Serialize;

use crate::core::{LatLon, NodeId};
use crate::cost::CostMode;
use crate::error::{MapError, Result};
use crate::graph::{path_coordinates, path_length_km};
use crate::reroute::{ReroutePlanner, RouteStatus};
use crate::search::SearchPlanner;
use crate::session::{NavContext, NavigationSession, SessionConfig, TransitRequest};

/// Answer to a route query.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RouteResponse {
    /// `OK` or `NO_PATH`
    pub status: RouteStatus,
    /// Great-circle length of the path, None without a path
    pub distance_km: Option<f64>,
    pub path_coordinates: Vec<LatLon>,
    pub path_node_ids: Vec<NodeId>,
}

/// Answer to a reroute-aware simulation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulationReport {
    pub status: RouteStatus,
    pub distance_km: Option<f64>,
    pub path_coordinates: Vec<LatLon>,
    pub path_node_ids: Vec<NodeId>,
    pub start_node: NodeId,
    /// Distance from the requested start to its node (km)
    pub start_snap_km: f64,
    pub goal_node: NodeId,
    /// Distance from the requested goal to its node (km)
    pub goal_snap_km: f64,
    /// Nodes the oracle reported blocked while planning
    pub blocked_nodes: Vec<NodeId>,
}

/// Entry point for route queries and transits over one context.
#[derive(Clone)]
pub struct Navigator {
    ctx: NavContext,
    config: SessionConfig,
}

impl Navigator {
    pub fn new(ctx: NavContext, config: SessionConfig) -> Self {
        Self { ctx, config }
    }

    pub fn context(&self) -> &NavContext {
        &self.ctx
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Shortest path between two positions, ignoring obstacles.
    ///
    /// Fails only when the graph has no nodes.
    pub fn route(&self, start: LatLon, goal: LatLon, mode: CostMode) -> Result<RouteResponse> {
        let ((start_id, _), (goal_id, _)) = self.resolve(start, goal)?;
        let space = self.ctx.space.as_ref();

        let result = SearchPlanner::new(space, &self.ctx.costs, self.config.algorithm)
            .find_path(start_id, goal_id, mode);

        if !result.success {
            debug!("[Navigator] no route: {:?}", result.failure_reason);
            return Ok(RouteResponse {
                status: RouteStatus::NoPath,
                distance_km: None,
                path_coordinates: Vec::new(),
                path_node_ids: Vec::new(),
            });
        }

        Ok(RouteResponse {
            status: RouteStatus::Ok,
            distance_km: Some(path_length_km(space, &result.path)),
            path_coordinates: path_coordinates(space, &result.path),
            path_node_ids: result.path,
        })
    }

    /// Plan once with obstacle rerouting.
    pub fn simulate(&self, start: LatLon, goal: LatLon, mode: CostMode) -> Result<SimulationReport> {
        let ((start_node, start_snap_km), (goal_node, goal_snap_km)) = self.resolve(start, goal)?;
        let space = self.ctx.space.as_ref();

        let outcome = ReroutePlanner::new(self.config.algorithm, self.config.threshold_km).plan(
            space,
            &self.ctx.costs,
            mode,
            self.ctx.oracle.as_ref(),
            start_node,
            goal_node,
        );

        let distance_km = outcome
            .status
            .has_path()
            .then(|| path_length_km(space, &outcome.path));

        Ok(SimulationReport {
            status: outcome.status,
            distance_km,
            path_coordinates: path_coordinates(space, &outcome.path),
            path_node_ids: outcome.path,
            start_node,
            start_snap_km,
            goal_node,
            goal_snap_km,
            blocked_nodes: outcome.blocked,
        })
    }

    /// Obstacle verdict at a position
    pub fn check_obstacle(&self, at: LatLon) -> bool {
        self.ctx.oracle.is_blocked(at)
    }

    /// Obstacle verdicts for a batch of positions, by input index
    pub fn batch_check(&self, points: &[LatLon]) -> Vec<bool> {
        points.iter().map(|p| self.check_obstacle(*p)).collect()
    }

    /// Start a live transit session
    pub fn begin_transit(&self, request: TransitRequest) -> NavigationSession {
        NavigationSession::new(self.ctx.clone(), request, self.config.clone())
    }

    fn resolve(&self, start: LatLon, goal: LatLon) -> Result<((NodeId, f64), (NodeId, f64))> {
        let space = self.ctx.space.as_ref();
        if space.node_count() == 0 {
            return Err(MapError::GraphDataMissing("graph has no nodes".into()));
        }
        Ok((space.nearest_node(start)?, space.nearest_node(goal)?))
    }
}

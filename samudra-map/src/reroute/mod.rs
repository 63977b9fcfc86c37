//! Obstacle-aware replanning.
//!
//! The planner searches once, scans the path against the obstacle oracle and,
//! if anything on it is blocked, searches again over a [`FilteredView`] that
//! hides the blocked nodes. Detours are scanned the same way, so a returned
//! path never contains a node the oracle reports blocked. The base space is
//! never modified.

use std::fmt;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::core::NodeId;
use crate::cost::{CostMode, CostModel};
use crate::graph::{FilteredView, NavigableSpace};
use crate::oracle::ObstacleOracle;
use crate::search::{Algorithm, PathResult, SearchPlanner};

/// Default distance within which a reported obstacle blocks a node (km)
pub const DEFAULT_THRESHOLD_KM: f64 = 1.5;

/// Outcome status of a reroute
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteStatus {
    /// Initial path is clear
    Ok,
    /// Initial path was blocked and a detour was found
    Rerouted,
    /// No path exists even without obstacles
    NoPath,
    /// Obstacles make the goal unreachable
    RerouteFailed,
}

impl RouteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteStatus::Ok => "OK",
            RouteStatus::Rerouted => "REROUTED",
            RouteStatus::NoPath => "NO_PATH",
            RouteStatus::RerouteFailed => "REROUTE_FAILED",
        }
    }

    /// Whether a usable path came with this status
    pub fn has_path(&self) -> bool {
        matches!(self, RouteStatus::Ok | RouteStatus::Rerouted)
    }
}

impl fmt::Display for RouteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Path, cost and status of one reroute
#[derive(Clone, Debug, PartialEq)]
pub struct RerouteOutcome {
    /// Empty unless the status carries a path
    pub path: Vec<NodeId>,
    /// `+inf` unless the status carries a path
    pub cost: f64,
    pub status: RouteStatus,
    /// Nodes found blocked on the scanned paths, in discovery order
    pub blocked: Vec<NodeId>,
}

impl RerouteOutcome {
    fn without_path(status: RouteStatus, blocked: Vec<NodeId>) -> Self {
        Self {
            path: Vec::new(),
            cost: f64::INFINITY,
            status,
            blocked,
        }
    }
}

/// Search-then-scan-then-search planner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReroutePlanner {
    pub algorithm: Algorithm,
    /// Proximity threshold handed to the oracle (km)
    pub threshold_km: f64,
}

impl Default for ReroutePlanner {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            threshold_km: DEFAULT_THRESHOLD_KM,
        }
    }
}

impl ReroutePlanner {
    pub fn new(algorithm: Algorithm, threshold_km: f64) -> Self {
        Self {
            algorithm,
            threshold_km,
        }
    }

    /// Plan from `start` to `goal`, avoiding nodes the oracle reports blocked.
    ///
    /// Every detour is scanned again and any newly blocked nodes are hidden
    /// before the next search, until a detour comes back clear. A returned
    /// path therefore never crosses a blocked node, at the price of reporting
    /// [`RouteStatus::RerouteFailed`] where a single extra search would have
    /// returned a detour that still touches an obstacle.
    ///
    /// A blocked start or goal is removed like any other node, which yields
    /// [`RouteStatus::RerouteFailed`].
    pub fn plan<S, O>(
        &self,
        space: &S,
        costs: &CostModel,
        mode: CostMode,
        oracle: &O,
        start: NodeId,
        goal: NodeId,
    ) -> RerouteOutcome
    where
        S: NavigableSpace + ?Sized,
        O: ObstacleOracle + ?Sized,
    {
        let initial = SearchPlanner::new(space, costs, self.algorithm).find_path(start, goal, mode);
        if !initial.success {
            debug!(
                "[Reroute] no initial path {} -> {}: {:?}",
                start, goal, initial.failure_reason
            );
            return RerouteOutcome::without_path(RouteStatus::NoPath, Vec::new());
        }

        let mut blocked = self.blocked_nodes(space, oracle, &initial.path);
        if blocked.is_empty() {
            return outcome(initial, RouteStatus::Ok, blocked);
        }

        info!(
            "[Reroute] {} of {} path nodes blocked, replanning",
            blocked.len(),
            initial.len()
        );

        // Each round hides every blocked node found so far. A detour never
        // revisits a hidden node, so the blocked set grows until the detour
        // is clear or the goal becomes unreachable.
        let mut rounds = 0usize;
        loop {
            rounds += 1;
            let view = FilteredView::new(space, blocked.iter().copied());
            let detour =
                SearchPlanner::new(&view, costs, self.algorithm).find_path(start, goal, mode);
            if !detour.success {
                debug!(
                    "[Reroute] FAILED: {:?} after removing {} nodes in {} rounds",
                    detour.failure_reason,
                    blocked.len(),
                    rounds
                );
                return RerouteOutcome::without_path(RouteStatus::RerouteFailed, blocked);
            }

            let newly_blocked = self.blocked_nodes(space, oracle, &detour.path);
            if newly_blocked.is_empty() {
                debug!(
                    "[Reroute] detour of {} nodes after {} rounds",
                    detour.len(),
                    rounds
                );
                return outcome(detour, RouteStatus::Rerouted, blocked);
            }
            blocked.extend(newly_blocked);
        }
    }

    /// Nodes of `path` the oracle reports blocked, in path order
    pub fn blocked_nodes<S, O>(&self, space: &S, oracle: &O, path: &[NodeId]) -> Vec<NodeId>
    where
        S: NavigableSpace + ?Sized,
        O: ObstacleOracle + ?Sized,
    {
        path.iter()
            .copied()
            .filter(|id| {
                space
                    .node(*id)
                    .is_some_and(|n| oracle.is_blocked_within(n.position, self.threshold_km))
            })
            .collect()
    }
}

fn outcome(result: PathResult, status: RouteStatus, blocked: Vec<NodeId>) -> RerouteOutcome {
    RerouteOutcome {
        path: result.path,
        cost: result.cost,
        status,
        blocked,
    }
}

//! Navigation session: walks a path, polls the obstacle oracle and reroutes.
//!
//! [`NavigationSession::step`] is the whole state machine. It never sleeps;
//! each step reports whether the caller should wait one poll interval before
//! the next. [`run`] drives a session on tokio with cancellation, and tests
//! can call `step` directly without any clock.
//!
//! ```text
//! Planning -> Traversing -> (replan -> Traversing)* -> Arrived | Failed
//! ```

mod driver;
mod events;

pub use driver::{run, spawn};
pub use events::{FailureReason, NavEvent, SessionState};

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};

use crate::core::{LatLon, NodeId};
use crate::cost::{CostMode, CostModel};
use crate::graph::{NavigableSpace, path_length_km};
use crate::oracle::ObstacleOracle;
use crate::reroute::{DEFAULT_THRESHOLD_KM, ReroutePlanner, RouteStatus};
use crate::search::Algorithm;

/// Read-only collaborators shared by every session.
#[derive(Clone)]
pub struct NavContext {
    pub space: Arc<dyn NavigableSpace>,
    pub costs: Arc<CostModel>,
    pub oracle: Arc<dyn ObstacleOracle>,
}

impl NavContext {
    pub fn new(
        space: Arc<dyn NavigableSpace>,
        costs: Arc<CostModel>,
        oracle: Arc<dyn ObstacleOracle>,
    ) -> Self {
        Self {
            space,
            costs,
            oracle,
        }
    }
}

/// Configuration for a session.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    /// Obstacle proximity threshold (km)
    pub threshold_km: f64,
    /// Wait between traversal steps
    pub poll_interval: Duration,
    /// Reroutes allowed before giving up
    pub max_reroutes: usize,
    pub algorithm: Algorithm,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            threshold_km: DEFAULT_THRESHOLD_KM,
            poll_interval: Duration::from_millis(500),
            max_reroutes: 16,
            algorithm: Algorithm::AStar,
        }
    }
}

/// Endpoints and objective of one transit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitRequest {
    pub start: LatLon,
    pub goal: LatLon,
    pub mode: CostMode,
}

/// Result of one session step.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionStep {
    /// State after the step
    pub state: SessionState,
    /// Events produced by the step, in order
    pub events: Vec<NavEvent>,
    /// Whether to wait one poll interval before the next step
    pub suspend: bool,
}

/// One in-progress transit.
pub struct NavigationSession {
    ctx: NavContext,
    request: TransitRequest,
    config: SessionConfig,
    planner: ReroutePlanner,
    state: SessionState,
    /// Current path
    path: Vec<NodeId>,
    /// Index of the next node to enter
    index: usize,
    /// Resolved goal node
    goal: Option<NodeId>,
    /// Reroutes performed so far
    reroutes: usize,
}

impl NavigationSession {
    pub fn new(ctx: NavContext, request: TransitRequest, config: SessionConfig) -> Self {
        let planner = ReroutePlanner::new(config.algorithm, config.threshold_km);
        Self {
            ctx,
            request,
            config,
            planner,
            state: SessionState::Planning,
            path: Vec::new(),
            index: 0,
            goal: None,
            reroutes: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn request(&self) -> &TransitRequest {
        &self.request
    }

    /// Path currently being followed
    pub fn path(&self) -> &[NodeId] {
        &self.path
    }

    /// Index of the next node to enter
    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn goal(&self) -> Option<NodeId> {
        self.goal
    }

    pub fn reroute_count(&self) -> usize {
        self.reroutes
    }

    /// Advance the state machine by one step.
    ///
    /// A finished session returns no events.
    pub fn step(&mut self) -> SessionStep {
        let mut events = Vec::new();
        let suspend = match self.state {
            SessionState::Planning => {
                self.plan(&mut events);
                false
            }
            SessionState::Traversing => self.traverse(&mut events),
            SessionState::Arrived | SessionState::Failed(_) => false,
        };
        SessionStep {
            state: self.state,
            events,
            suspend,
        }
    }

    /// Cancel the session.
    ///
    /// Returns the final `failed` event, or None if already finished.
    pub fn cancel(&mut self) -> Option<NavEvent> {
        if self.is_finished() {
            return None;
        }
        info!("[Session] cancelled at index {}", self.index);
        Some(self.fail(FailureReason::Cancelled))
    }

    fn plan(&mut self, events: &mut Vec<NavEvent>) {
        let space = self.ctx.space.as_ref();

        let endpoints = space
            .nearest_node(self.request.start)
            .and_then(|start| space.nearest_node(self.request.goal).map(|goal| (start, goal)));
        let ((start, start_snap), (goal, goal_snap)) = match endpoints {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!("[Session] cannot resolve endpoints: {}", e);
                events.push(self.fail(FailureReason::NoPath));
                return;
            }
        };
        debug!(
            "[Session] start node {} ({:.3} km), goal node {} ({:.3} km)",
            start, start_snap, goal, goal_snap
        );
        self.goal = Some(goal);

        let outcome = self.planner.plan(
            space,
            &self.ctx.costs,
            self.request.mode,
            self.ctx.oracle.as_ref(),
            start,
            goal,
        );

        match outcome.status {
            RouteStatus::NoPath => events.push(self.fail(FailureReason::NoPath)),
            RouteStatus::RerouteFailed => events.push(self.fail(FailureReason::RerouteFailed)),
            RouteStatus::Ok | RouteStatus::Rerouted => {
                let distance_km = path_length_km(space, &outcome.path);
                info!(
                    "[Session] initial route {}: {} nodes, {:.2} km",
                    outcome.status,
                    outcome.path.len(),
                    distance_km
                );
                events.push(NavEvent::Init {
                    status: outcome.status,
                    distance_km,
                    node_count: outcome.path.len(),
                });
                self.path = outcome.path;
                self.index = 0;
                self.state = SessionState::Traversing;
            }
        }
    }

    /// One traversal step. Returns whether to suspend afterwards.
    fn traverse(&mut self, events: &mut Vec<NavEvent>) -> bool {
        let Some(&node_id) = self.path.get(self.index) else {
            info!("[Session] arrived after {} reroutes", self.reroutes);
            self.state = SessionState::Arrived;
            events.push(NavEvent::Done {});
            return false;
        };
        let Some(position) = self.ctx.space.node(node_id).map(|n| n.position) else {
            // Path nodes come from the same space
            warn!("[Session] node {} vanished from the space", node_id);
            events.push(self.fail(FailureReason::RerouteFailed));
            return false;
        };

        if !self
            .ctx
            .oracle
            .is_blocked_within(position, self.config.threshold_km)
        {
            events.push(NavEvent::Progress {
                node_id,
                lat: position.lat,
                lon: position.lon,
                step: self.index + 1,
            });
            self.index += 1;
            return true;
        }

        info!(
            "[Session] obstacle at node {} (index {})",
            node_id, self.index
        );
        events.push(NavEvent::ObstacleDetected {});

        if self.reroutes >= self.config.max_reroutes {
            warn!(
                "[Session] reroute limit {} reached",
                self.config.max_reroutes
            );
            events.push(self.fail(FailureReason::RerouteLimit));
            return false;
        }
        self.reroutes += 1;

        // Replan from the last node entered; a blocked first node replans
        // from itself and fails.
        let origin = if self.index > 0 {
            self.path[self.index - 1]
        } else {
            node_id
        };
        let Some(goal) = self.goal else {
            events.push(self.fail(FailureReason::NoPath));
            return false;
        };

        let outcome = self.planner.plan(
            self.ctx.space.as_ref(),
            &self.ctx.costs,
            self.request.mode,
            self.ctx.oracle.as_ref(),
            origin,
            goal,
        );

        if !outcome.status.has_path() {
            events.push(self.fail(FailureReason::RerouteFailed));
            return false;
        }

        debug!(
            "[Session] rerouted from node {}: {} nodes ({})",
            origin,
            outcome.path.len(),
            outcome.status
        );
        events.push(NavEvent::Rerouted {
            new_node_count: outcome.path.len(),
            status: outcome.status,
        });
        self.path = outcome.path;
        self.index = 0;
        false
    }

    fn fail(&mut self, reason: FailureReason) -> NavEvent {
        self.state = SessionState::Failed(reason);
        NavEvent::Failed { reason }
    }
}

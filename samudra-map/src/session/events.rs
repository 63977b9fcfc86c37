//! Session states and the event stream contract.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::NodeId;
use crate::reroute::RouteStatus;

/// Why a session ended without arriving.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// No initial path (including an empty graph)
    NoPath,
    /// Obstacles made the goal unreachable
    RerouteFailed,
    /// More reroutes than the session allows
    RerouteLimit,
    /// Cancelled by the caller
    Cancelled,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureReason::NoPath => "no_path",
            FailureReason::RerouteFailed => "reroute_failed",
            FailureReason::RerouteLimit => "reroute_limit",
            FailureReason::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// State of a navigation session.
///
/// Replanning happens inside a single traversal step, so a session is never
/// observed between detecting an obstacle and resuming on the new path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Resolving endpoints and computing the initial path
    Planning,
    /// Walking the current path
    Traversing,
    /// Goal reached
    Arrived,
    /// Terminated without arriving
    Failed(FailureReason),
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Arrived | SessionState::Failed(_))
    }
}

/// Event emitted by a session, in strict per-session order.
///
/// Serialized with an `event` tag, e.g.
/// `{"event":"progress","node_id":4,"lat":10.0,"lon":70.1,"step":1}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum NavEvent {
    /// Initial path computed
    Init {
        status: RouteStatus,
        distance_km: f64,
        node_count: usize,
    },
    /// Vessel advanced onto a node (`step` is 1-based)
    Progress {
        node_id: NodeId,
        lat: f64,
        lon: f64,
        step: usize,
    },
    /// The next node is blocked; a reroute follows
    ObstacleDetected {},
    /// New path in effect
    Rerouted {
        new_node_count: usize,
        status: RouteStatus,
    },
    /// Goal reached
    Done {},
    /// Session terminated
    Failed { reason: FailureReason },
}

impl NavEvent {
    /// Event name as it appears in the `event` tag
    pub fn kind(&self) -> &'static str {
        match self {
            NavEvent::Init { .. } => "init",
            NavEvent::Progress { .. } => "progress",
            NavEvent::ObstacleDetected {} => "obstacle_detected",
            NavEvent::Rerouted { .. } => "rerouted",
            NavEvent::Done {} => "done",
            NavEvent::Failed { .. } => "failed",
        }
    }
}

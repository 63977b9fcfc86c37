//! Search result and frontier types.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::NodeId;

/// Search algorithm selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Best-first with a straight-line heuristic
    #[default]
    #[serde(rename = "astar", alias = "a_star")]
    AStar,
    /// Cumulative cost only
    Dijkstra,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::AStar => write!(f, "astar"),
            Algorithm::Dijkstra => write!(f, "dijkstra"),
        }
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "astar" | "a*" | "a_star" => Ok(Algorithm::AStar),
            "dijkstra" => Ok(Algorithm::Dijkstra),
            other => Err(format!("unknown algorithm '{}'", other)),
        }
    }
}

/// Reason a search produced no path
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathFailure {
    /// Start node is land
    StartBlocked,
    /// Goal node is land
    GoalBlocked,
    /// Start or goal is not in the searched space
    UnknownNode,
    /// Frontier exhausted before reaching the goal
    NoPath,
}

/// Result of a search
#[derive(Clone, Debug, PartialEq)]
pub struct PathResult {
    /// Node ids from start to goal inclusive (empty if no path found)
    pub path: Vec<NodeId>,
    /// Cumulative edge cost (`+inf` if no path found)
    pub cost: f64,
    /// Number of nodes finalized during search
    pub nodes_expanded: usize,
    /// Whether a path was found
    pub success: bool,
    /// Reason for failure (if any)
    pub failure_reason: Option<PathFailure>,
}

impl PathResult {
    pub(crate) fn found(path: Vec<NodeId>, cost: f64, nodes_expanded: usize) -> Self {
        Self {
            path,
            cost,
            nodes_expanded,
            success: true,
            failure_reason: None,
        }
    }

    pub(crate) fn failed(reason: PathFailure, nodes_expanded: usize) -> Self {
        Self {
            path: Vec::new(),
            cost: f64::INFINITY,
            nodes_expanded,
            success: false,
            failure_reason: Some(reason),
        }
    }

    /// Number of nodes on the path
    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

/// Frontier entry. Lower priority pops first; equal priorities pop in
/// insertion order.
#[derive(Clone, Copy, Debug)]
pub(super) struct FrontierEntry {
    pub priority: f64,
    pub seq: u64,
    pub node: NodeId,
}

impl Eq for FrontierEntry {}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior
        other
            .priority
            .partial_cmp(&self.priority)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

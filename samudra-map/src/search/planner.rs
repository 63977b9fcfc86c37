//! Best-first search over a navigable space.

use std::collections::{HashMap, HashSet};

use log::{debug, trace};

use crate::core::NodeId;
use crate::cost::{CostMode, CostModel};
use crate::graph::NavigableSpace;

use super::frontier::Frontier;
use super::types::{Algorithm, PathFailure, PathResult};

/// Path planner bound to a space and a cost model.
pub struct SearchPlanner<'a, S: NavigableSpace + ?Sized> {
    space: &'a S,
    costs: &'a CostModel,
    algorithm: Algorithm,
}

impl<'a, S: NavigableSpace + ?Sized> SearchPlanner<'a, S> {
    pub fn new(space: &'a S, costs: &'a CostModel, algorithm: Algorithm) -> Self {
        Self {
            space,
            costs,
            algorithm,
        }
    }

    /// Find the cheapest path from `start` to `goal` under `mode`.
    ///
    /// With [`Algorithm::AStar`] the frontier is ordered by
    /// `g + straight_line(node, goal)`. Under [`CostMode::Fastest`] a
    /// following current can make an edge cheaper than its base distance,
    /// so the heuristic may overestimate and the path may be suboptimal.
    pub fn find_path(&self, start: NodeId, goal: NodeId, mode: CostMode) -> PathResult {
        trace!(
            "[{}] find_path: start={} goal={} mode={}",
            self.algorithm, start, goal, mode
        );

        let (Some(start_node), Some(goal_node)) = (self.space.node(start), self.space.node(goal))
        else {
            debug!("[{}] FAILED: UnknownNode", self.algorithm);
            return PathResult::failed(PathFailure::UnknownNode, 0);
        };

        if start_node.is_land {
            debug!("[{}] FAILED: StartBlocked at node {}", self.algorithm, start);
            return PathResult::failed(PathFailure::StartBlocked, 0);
        }
        if goal_node.is_land {
            debug!("[{}] FAILED: GoalBlocked at node {}", self.algorithm, goal);
            return PathResult::failed(PathFailure::GoalBlocked, 0);
        }

        if start == goal {
            return PathResult::found(vec![start], 0.0, 0);
        }

        let heuristic = |id: NodeId| -> f64 {
            match self.algorithm {
                Algorithm::Dijkstra => 0.0,
                Algorithm::AStar => self
                    .space
                    .node(id)
                    .map(|n| self.space.heuristic(n, goal_node))
                    .unwrap_or(0.0),
            }
        };

        let mut frontier = Frontier::default();
        let mut closed: HashSet<NodeId> = HashSet::new();
        let mut came_from: HashMap<NodeId, NodeId> = HashMap::new();
        let mut g_scores: HashMap<NodeId, f64> = HashMap::new();

        g_scores.insert(start, 0.0);
        frontier.push(start, heuristic(start));

        let mut nodes_expanded = 0;

        while let Some(entry) = frontier.pop() {
            let current = entry.node;

            // Goal reached
            if current == goal {
                let cost = g_scores[&goal];
                let path = reconstruct_path(&came_from, goal);
                trace!(
                    "[{}] SUCCESS: path length={} nodes, cost={:.3}, nodes_expanded={}",
                    self.algorithm,
                    path.len(),
                    cost,
                    nodes_expanded
                );
                return PathResult::found(path, cost, nodes_expanded);
            }

            if !closed.insert(current) {
                continue;
            }
            nodes_expanded += 1;

            let Some(current_node) = self.space.node(current) else {
                continue;
            };
            let current_g = g_scores[&current];

            for edge in self.space.neighbors(current) {
                if closed.contains(&edge.to) {
                    continue;
                }
                let Some(next) = self.space.node(edge.to) else {
                    continue;
                };

                let step = self.costs.edge_cost(mode, current_node, next, edge.distance);
                if !step.is_finite() {
                    continue;
                }

                let tentative_g = current_g + step;
                let known_g = g_scores.get(&edge.to).copied().unwrap_or(f64::INFINITY);
                if tentative_g < known_g {
                    came_from.insert(edge.to, current);
                    g_scores.insert(edge.to, tentative_g);
                    frontier.push(edge.to, tentative_g + heuristic(edge.to));
                }
            }
        }

        debug!(
            "[{}] FAILED: NoPath after expanding {} nodes",
            self.algorithm, nodes_expanded
        );
        PathResult::failed(PathFailure::NoPath, nodes_expanded)
    }
}

/// Follow predecessor links back from the goal, then reverse.
fn reconstruct_path(came_from: &HashMap<NodeId, NodeId>, goal: NodeId) -> Vec<NodeId> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

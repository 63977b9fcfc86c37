//! Search core: A* and Dijkstra over any [`NavigableSpace`].
//!
//! Both share one frontier ([`Frontier`](frontier)), one closed set and one
//! cost contract. A node is finalized the first time it pops and is never
//! re-expanded; stale frontier entries are skipped. Edges with infinite cost
//! are never relaxed. The search terminates once the frontier is exhausted,
//! so its running time is bounded by the size of the space.
//!
//! ```rust,ignore
//! use samudra_map::search::{astar, Algorithm, SearchPlanner};
//!
//! let result = astar(&graph, &costs, start, goal, CostMode::PlainDistance);
//! if result.success {
//!     println!("{} nodes, cost {:.2}", result.len(), result.cost);
//! }
//! ```

mod frontier;
mod planner;
mod types;

pub use planner::SearchPlanner;
pub use types::{Algorithm, PathFailure, PathResult};

use crate::core::NodeId;
use crate::cost::{CostMode, CostModel};
use crate::graph::NavigableSpace;

/// A* with the space's straight-line heuristic
pub fn astar<S: NavigableSpace + ?Sized>(
    space: &S,
    costs: &CostModel,
    start: NodeId,
    goal: NodeId,
    mode: CostMode,
) -> PathResult {
    SearchPlanner::new(space, costs, Algorithm::AStar).find_path(start, goal, mode)
}

/// Dijkstra: cumulative edge cost only, no heuristic
pub fn dijkstra<S: NavigableSpace + ?Sized>(
    space: &S,
    costs: &CostModel,
    start: NodeId,
    goal: NodeId,
    mode: CostMode,
) -> PathResult {
    SearchPlanner::new(space, costs, Algorithm::Dijkstra).find_path(start, goal, mode)
}

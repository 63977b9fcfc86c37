//! Navigable space: the nodes a vessel may occupy and how they connect.
//!
//! Two realizations share the [`NavigableSpace`] contract:
//!
//! - [`GeoGraph`]: sparse geodetic graph built once from survey data, with
//!   haversine edge weights
//! - [`RasterGrid`]: dense raster with 8-connected neighbors derived from the
//!   array bounds, carrying land/hazard/current layers
//!
//! Rerouting never edits either of them. It wraps the base space in a
//! [`FilteredView`] that hides a set of blocked node ids.

mod distance_field;
mod filtered;
mod geodetic;
mod raster;

pub use distance_field::distance_to_land;
pub use filtered::FilteredView;
pub use geodetic::{GeoGraph, LatticeSpec};
pub use raster::{RasterGrid, RasterLayers};

use crate::core::{Edge, LatLon, Node, NodeId};
use crate::error::{MapError, Result};

/// Read-only adjacency contract consumed by the search core.
///
/// Implementations must be safe for unlimited concurrent readers.
pub trait NavigableSpace: Send + Sync {
    /// Number of nodes visible in this space
    fn node_count(&self) -> usize;

    /// Look up a node by id (None if absent or hidden)
    fn node(&self, id: NodeId) -> Option<&Node>;

    /// All visible nodes in a stable order
    fn nodes(&self) -> Box<dyn Iterator<Item = &Node> + '_>;

    /// Outgoing edges of a node (empty if the node is absent or hidden)
    fn neighbors(&self, id: NodeId) -> Vec<Edge>;

    /// Straight-line distance estimate between two nodes, in the same units
    /// as edge base distances
    fn heuristic(&self, from: &Node, to: &Node) -> f64;

    /// Whether a node id is visible in this space
    fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Nearest node to a position by great-circle distance.
    ///
    /// Linear scan; ties resolve to the first node in iteration order.
    fn nearest_node(&self, at: LatLon) -> Result<(NodeId, f64)> {
        let mut best: Option<(NodeId, f64)> = None;
        for node in self.nodes() {
            let d = at.distance_km(&node.position);
            match best {
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((node.id, d)),
            }
        }
        best.ok_or(MapError::EmptyGraph)
    }
}

impl<T: NavigableSpace + ?Sized> NavigableSpace for &T {
    fn node_count(&self) -> usize {
        (**self).node_count()
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        (**self).node(id)
    }

    fn nodes(&self) -> Box<dyn Iterator<Item = &Node> + '_> {
        (**self).nodes()
    }

    fn neighbors(&self, id: NodeId) -> Vec<Edge> {
        (**self).neighbors(id)
    }

    fn heuristic(&self, from: &Node, to: &Node) -> f64 {
        (**self).heuristic(from, to)
    }

    fn nearest_node(&self, at: LatLon) -> Result<(NodeId, f64)> {
        (**self).nearest_node(at)
    }
}

/// Coordinates of a path, in order.
pub fn path_coordinates<S: NavigableSpace + ?Sized>(space: &S, path: &[NodeId]) -> Vec<LatLon> {
    path.iter()
        .filter_map(|id| space.node(*id).map(|n| n.position))
        .collect()
}

/// Great-circle length of a path (km).
pub fn path_length_km<S: NavigableSpace + ?Sized>(space: &S, path: &[NodeId]) -> f64 {
    path_coordinates(space, path)
        .windows(2)
        .map(|pair| pair[0].distance_km(&pair[1]))
        .sum()
}

//! Shared fixtures.

use std::sync::Arc;

use samudra_map::core::{LatLon, NodeId};
use samudra_map::cost::CostModel;
use samudra_map::graph::{GeoGraph, LatticeSpec, NavigableSpace};
use samudra_map::oracle::ObstacleOracle;
use samudra_map::session::NavContext;

/// 2 x 2 degree lattice at 0.25 degree spacing (9 x 9 nodes), open water
pub fn tiny_lattice() -> GeoGraph {
    GeoGraph::lattice(
        &LatticeSpec {
            lat_min: 10.0,
            lat_max: 12.0,
            lon_min: 70.0,
            lon_max: 72.0,
            resolution_deg: 0.25,
        },
        None,
    )
    .expect("lattice")
}

/// Start and goal at opposite corners
pub fn corners(graph: &GeoGraph) -> (NodeId, NodeId) {
    (graph.min_id().unwrap(), graph.max_id().unwrap())
}

pub fn context(graph: GeoGraph, oracle: Arc<dyn ObstacleOracle>) -> NavContext {
    NavContext::new(Arc::new(graph), Arc::new(CostModel::default()), oracle)
}

/// Every consecutive pair of `path` is an edge of `space`
pub fn assert_valid_path<S: NavigableSpace + ?Sized>(space: &S, path: &[NodeId]) {
    assert!(!path.is_empty(), "empty path");
    for pair in path.windows(2) {
        assert!(
            space.neighbors(pair[0]).iter().any(|e| e.to == pair[1]),
            "{} -> {} is not an edge",
            pair[0],
            pair[1]
        );
    }
}

pub fn position<S: NavigableSpace + ?Sized>(space: &S, id: NodeId) -> LatLon {
    space.node(id).expect("node on path").position
}

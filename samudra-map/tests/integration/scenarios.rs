//! Reference scenarios.

use std::sync::Arc;

use samudra_map::core::{Cell, LatLon, Node};
use samudra_map::cost::{CostMode, CostModel};
use samudra_map::graph::{RasterGrid, RasterLayers};
use samudra_map::navigator::Navigator;
use samudra_map::oracle::{
    Assessment, FnOracle, LearnedLayer, ObstacleEngine, ObstacleOracle, OpenWater, RuleLayer,
};
use samudra_map::reroute::{ReroutePlanner, RouteStatus};
use samudra_map::search::{PathFailure, astar};
use samudra_map::session::{
    FailureReason, NavContext, NavEvent, NavigationSession, SessionConfig, SessionState,
    TransitRequest,
};
use samudra_map::OracleError;

use super::common::{assert_valid_path, context, corners, position, tiny_lattice};

/// Band of latitude around 11.0 with an open passage along the eastern edge
fn band_blocked(at: LatLon) -> bool {
    at.lat > 10.9 && at.lat < 11.1 && at.lon < 71.9
}

#[test]
fn test_open_grid_plain_distance() {
    let graph = tiny_lattice();
    let (start, goal) = corners(&graph);

    let outcome = ReroutePlanner::default().plan(
        &graph,
        &CostModel::default(),
        CostMode::PlainDistance,
        &OpenWater,
        start,
        goal,
    );

    assert_eq!(outcome.status, RouteStatus::Ok);
    assert!(outcome.path.len() > 1);
    assert!(outcome.cost > 0.0);
    assert_valid_path(&graph, &outcome.path);
}

#[test]
fn test_band_obstacle_reroutes() {
    let graph = tiny_lattice();
    let (start, goal) = corners(&graph);
    let oracle = FnOracle(band_blocked);

    let outcome = ReroutePlanner::default().plan(
        &graph,
        &CostModel::default(),
        CostMode::PlainDistance,
        &oracle,
        start,
        goal,
    );

    assert_eq!(outcome.status, RouteStatus::Rerouted);
    assert_valid_path(&graph, &outcome.path);
    for id in &outcome.path {
        assert!(!band_blocked(position(&graph, *id)), "node {} in band", id);
    }
    // Crosses latitude 11.0 through the eastern passage
    assert!(
        outcome
            .path
            .iter()
            .map(|id| position(&graph, *id))
            .any(|p| (p.lat - 11.0).abs() < 1e-9 && p.lon > 71.9)
    );
}

#[test]
fn test_land_start_fails_immediately() {
    let mut layers = RasterLayers::open_water(8, 8);
    layers.set_land(0, 0, true);
    layers.set_land(0, 1, true);
    layers.set_land(1, 0, true);
    let grid = RasterGrid::new(layers).unwrap();

    let result = astar(&grid, &CostModel::default(), 0, 63, CostMode::PlainDistance);
    assert_eq!(result.failure_reason, Some(PathFailure::StartBlocked));
    assert_eq!(result.nodes_expanded, 0);

    let ctx = NavContext::new(
        Arc::new(grid),
        Arc::new(CostModel::default()),
        Arc::new(OpenWater),
    );
    let navigator = Navigator::new(ctx, SessionConfig::default());
    let response = navigator
        .route(LatLon::new(0.0, 0.0), LatLon::new(7.0, 7.0), CostMode::PlainDistance)
        .unwrap();
    assert_eq!(response.status, RouteStatus::NoPath);

    let report = navigator
        .simulate(LatLon::new(0.1, 0.1), LatLon::new(7.0, 7.0), CostMode::Fastest)
        .unwrap();
    assert_eq!(report.status, RouteStatus::NoPath);
}

struct Always(bool);

impl LearnedLayer for Always {
    fn assess(&self, _at: LatLon) -> Result<Assessment, OracleError> {
        Ok(Assessment::Verdict(self.0))
    }
}

#[test]
fn test_rule_layer_blocks_regardless_of_learned_layer() {
    let rules = RuleLayer::new().with_land(&[[70.0, 10.0], [70.5, 10.0], [70.5, 10.5], [70.0, 10.5]]);
    let on_land = LatLon::new(10.25, 70.25);

    let both = ObstacleEngine::new(rules.clone()).with_learned(Arc::new(Always(true)));
    let rules_only = ObstacleEngine::new(rules).with_learned(Arc::new(Always(false)));

    assert!(both.is_blocked(on_land));
    assert!(rules_only.is_blocked(on_land));
    assert!(!rules_only.is_blocked(LatLon::new(11.0, 71.0)));
}

#[test]
fn test_coastal_prefers_moderate_offshore_distance() {
    let model = CostModel::default();
    let from = Node::new(0, LatLon::new(0.0, 0.0)).with_cell(Cell::new(0, 0));
    let far = Node::new(1, LatLon::new(0.0, 1.0))
        .with_cell(Cell::new(0, 1))
        .with_distance_to_land(10.0);
    let moderate = far.clone().with_distance_to_land(5.0);

    assert!(
        model.edge_cost(CostMode::Coastal, &from, &far, 1.0)
            > model.edge_cost(CostMode::Coastal, &from, &moderate, 1.0)
    );
}

#[test]
fn test_session_on_band_obstacle_never_enters_band() {
    let graph = tiny_lattice();
    let ctx = context(graph, Arc::new(FnOracle(band_blocked)));
    let space = ctx.space.clone();
    let mut session = NavigationSession::new(
        ctx,
        TransitRequest {
            start: LatLon::new(10.0, 70.0),
            goal: LatLon::new(12.0, 72.0),
            mode: CostMode::PlainDistance,
        },
        SessionConfig::default(),
    );

    let mut events = Vec::new();
    while !session.is_finished() {
        events.extend(session.step().events);
    }

    assert_eq!(session.state(), SessionState::Arrived);
    assert!(matches!(
        events[0],
        NavEvent::Init {
            status: RouteStatus::Rerouted,
            ..
        }
    ));
    for event in &events {
        if let NavEvent::Progress { node_id, .. } = event {
            assert!(!band_blocked(position(space.as_ref(), *node_id)));
        }
        assert_ne!(
            *event,
            NavEvent::Failed {
                reason: FailureReason::RerouteFailed
            }
        );
    }
}

//! Properties that hold across graphs, modes and algorithms.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use samudra_map::core::{Cell, LatLon, Node, NodeId};
use samudra_map::cost::{CostMode, CostModel, CurrentField, CurrentVector};
use samudra_map::graph::{FilteredView, NavigableSpace, RasterGrid};
use samudra_map::navigator::DemoLayout;
use samudra_map::oracle::{
    Assessment, CheckerReport, LearnedLayer, ObstacleChecker, ObstacleEngine, ObstacleOracle,
    OpenWater, ProximityOracle, RuleLayer, TimedLearnedLayer,
};
use samudra_map::reroute::{ReroutePlanner, RouteStatus};
use samudra_map::search::{astar, dijkstra};
use samudra_map::OracleError;

use super::common::{assert_valid_path, corners, tiny_lattice};

fn archipelago() -> (RasterGrid, CostModel) {
    let grid = RasterGrid::new(DemoLayout::Archipelago.layers()).unwrap();
    let costs = CostModel::default()
        .with_currents(Arc::new(CurrentField::gyre(grid.width(), grid.height())));
    (grid, costs)
}

fn water_cells(grid: &RasterGrid) -> Vec<NodeId> {
    grid.nodes().filter(|n| !n.is_land).map(|n| n.id).collect()
}

#[test]
fn test_astar_and_dijkstra_agree_on_cost() {
    let graph = tiny_lattice();
    let ids: Vec<NodeId> = graph.nodes().map(|n| n.id).collect();
    let costs = CostModel::default();

    for (k, &start) in ids.iter().enumerate().step_by(7) {
        let goal = ids[(k * 13 + 40) % ids.len()];
        let a = astar(&graph, &costs, start, goal, CostMode::PlainDistance);
        let d = dijkstra(&graph, &costs, start, goal, CostMode::PlainDistance);
        assert!(a.success && d.success);
        assert!((a.cost - d.cost).abs() < 1e-9, "{} -> {}", start, goal);
    }
}

#[test]
fn test_agreement_on_raster_for_admissible_modes() {
    let (grid, costs) = archipelago();
    let water = water_cells(&grid);
    let pairs = [(0usize, 1usize), (17, 2900), (450, 3100), (1200, 77), (2000, 2500)];

    for mode in [CostMode::PlainDistance, CostMode::FuelEfficient, CostMode::Coastal] {
        for &(s, g) in &pairs {
            let (start, goal) = (water[s % water.len()], water[g % water.len()]);
            let a = astar(&grid, &costs, start, goal, mode);
            let d = dijkstra(&grid, &costs, start, goal, mode);
            assert_eq!(a.success, d.success);
            if a.success {
                assert!(
                    (a.cost - d.cost).abs() < 1e-6,
                    "{}: {} vs {}",
                    mode,
                    a.cost,
                    d.cost
                );
            }
        }
    }
}

#[test]
fn test_paths_are_valid_in_every_mode() {
    let (grid, costs) = archipelago();
    let demo = DemoLayout::Archipelago;
    let start = grid.id_of(demo.start()).unwrap();
    let goal = grid.id_of(demo.goal()).unwrap();

    for mode in CostMode::ALL {
        let result = astar(&grid, &costs, start, goal, mode);
        assert!(result.success, "{}", mode);
        assert_valid_path(&grid, &result.path);
        assert!(result.path.iter().all(|id| !grid.node(*id).unwrap().is_land));
    }
}

#[test]
fn test_reroute_paths_valid_in_filtered_view() {
    let graph = tiny_lattice();
    let (start, goal) = corners(&graph);
    let blocked_at = LatLon::new(11.0, 71.0);
    let oracle = samudra_map::oracle::FnOracle(move |at: LatLon| at.distance_km(&blocked_at) < 1.0);

    let outcome = ReroutePlanner::default().plan(
        &graph,
        &CostModel::default(),
        CostMode::PlainDistance,
        &oracle,
        start,
        goal,
    );

    assert_eq!(outcome.status, RouteStatus::Rerouted);
    let view = FilteredView::new(&graph, outcome.blocked.iter().copied());
    assert_valid_path(&view, &outcome.path);
}

#[test]
fn test_reroute_without_obstacles_is_idempotent() {
    let graph = tiny_lattice();
    let costs = CostModel::default();
    let planner = ReroutePlanner::default();
    let (start, goal) = corners(&graph);

    let first = planner.plan(&graph, &costs, CostMode::Coastal, &OpenWater, start, goal);
    let second = planner.plan(&graph, &costs, CostMode::Coastal, &OpenWater, start, goal);
    let search = astar(&graph, &costs, start, goal, CostMode::Coastal);

    assert_eq!(first.status, RouteStatus::Ok);
    assert_eq!(first, second);
    assert_eq!(first.path, search.path);
}

#[test]
fn test_fuel_cost_never_below_plain_distance() {
    let field = CurrentField::gyre(20, 20);
    let costs = CostModel::default().with_currents(Arc::new(field));

    for i in 1..19 {
        for j in 1..19 {
            let from = Node::new(0, LatLon::new(i as f64, j as f64)).with_cell(Cell::new(i, j));
            for neighbor in Cell::new(i, j).neighbors_8() {
                let to = Node::new(1, LatLon::new(neighbor.i as f64, neighbor.j as f64))
                    .with_cell(neighbor);
                let base = Cell::new(i, j).euclidean(&neighbor);
                let fuel = costs.edge_cost(CostMode::FuelEfficient, &from, &to, base);
                let plain = costs.edge_cost(CostMode::PlainDistance, &from, &to, base);
                assert!(fuel >= plain);
            }
        }
    }
}

#[test]
fn test_fastest_rewards_following_current() {
    let costs = CostModel::default().with_currents(Arc::new(CurrentField::uniform(
        3,
        3,
        CurrentVector::new(0.0, 1.0),
    )));
    let from = Node::new(4, LatLon::new(1.0, 1.0)).with_cell(Cell::new(1, 1));
    let east = Node::new(5, LatLon::new(1.0, 2.0)).with_cell(Cell::new(1, 2));
    let west = Node::new(3, LatLon::new(1.0, 0.0)).with_cell(Cell::new(1, 0));

    let with = costs.edge_cost(CostMode::Fastest, &from, &east, 1.0);
    let against = costs.edge_cost(CostMode::Fastest, &from, &west, 1.0);
    assert!(with < 1.0);
    assert!(against > 1.0);
}

struct Garbage;

impl ObstacleChecker for Garbage {
    fn check(&self, _at: LatLon) -> Result<CheckerReport, OracleError> {
        CheckerReport::from_json(&serde_json::json!({"obstacles": "many"}))
    }
}

struct Stalled;

impl LearnedLayer for Stalled {
    fn assess(&self, _at: LatLon) -> Result<Assessment, OracleError> {
        thread::sleep(Duration::from_millis(300));
        Ok(Assessment::Verdict(true))
    }
}

struct Failing;

impl LearnedLayer for Failing {
    fn assess(&self, _at: LatLon) -> Result<Assessment, OracleError> {
        Err(OracleError::Unavailable("no imagery".into()))
    }
}

#[test]
fn test_oracle_failures_fail_open() {
    let at = LatLon::new(10.0, 70.0);

    assert!(!ProximityOracle::new(Garbage, 1.5).is_blocked(at));
    assert!(
        !ObstacleEngine::new(RuleLayer::new())
            .with_learned(Arc::new(Failing))
            .is_blocked(at)
    );

    let timed = TimedLearnedLayer::spawn(Stalled, Duration::from_millis(10)).unwrap();
    let engine = ObstacleEngine::new(RuleLayer::new()).with_learned(Arc::new(timed));
    assert!(!engine.is_blocked(at));
}

#[test]
fn test_reroute_with_failing_oracle_is_ok() {
    let graph = tiny_lattice();
    let (start, goal) = corners(&graph);
    let oracle = ProximityOracle::new(Garbage, 1.5);

    let outcome = ReroutePlanner::default().plan(
        &graph,
        &CostModel::default(),
        CostMode::PlainDistance,
        &oracle,
        start,
        goal,
    );
    assert_eq!(outcome.status, RouteStatus::Ok);
}

//! NaukaNav - Vessel Navigation Controller
//!
//! Command line front end over `samudra-map`: route queries, one-shot
//! rerouting simulations, live transits streamed as JSON events, obstacle
//! checks and graph building.
//!
//! Output goes to stdout as JSON. Logs go to stderr and follow `RUST_LOG`.

mod cli;
mod config;
mod error;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use samudra_map::core::LatLon;
use samudra_map::cost::CurrentField;
use samudra_map::graph::LatticeSpec;
use samudra_map::navigator::{DemoLayout, compare_modes};
use samudra_map::session::{self, NavContext, SessionState, TransitRequest};
use samudra_map::{CostMode, CostModel, GeoGraph, NavigableSpace, Navigator, RasterGrid, io};
use serde::Serialize;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use cli::{Cli, Command, Endpoints};
use config::NaukaConfig;
use error::{NaukaError, Result};

/// Events buffered between the session task and stdout
const EVENT_BUFFER: usize = 64;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("nauka_nav=info".parse().unwrap())
                .add_directive("samudra_map=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let config = NaukaConfig::resolve(cli.config.as_deref())?;

    info!("NaukaNav v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Route(endpoints) => {
            let navigator = build_navigator(&config)?;
            let response = navigator.route(
                endpoints.start,
                endpoints.goal,
                mode_or_default(&config, &endpoints),
            )?;
            print_json(&response)
        }
        Command::Simulate(endpoints) => {
            let navigator = build_navigator(&config)?;
            let report = navigator.simulate(
                endpoints.start,
                endpoints.goal,
                mode_or_default(&config, &endpoints),
            )?;
            print_json(&report)
        }
        Command::Navigate { endpoints, poll_ms } => {
            navigate(&config, &endpoints, poll_ms).await
        }
        Command::Obstacle { points } => check_obstacles(&config, &points),
        Command::BuildGraph {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
            resolution,
        } => build_graph(
            &config,
            &LatticeSpec {
                lat_min,
                lat_max,
                lon_min,
                lon_max,
                resolution_deg: resolution,
            },
        ),
        Command::Compare { layout } => compare(&config, layout),
    }
}

fn mode_or_default(config: &NaukaConfig, endpoints: &Endpoints) -> CostMode {
    endpoints.mode.unwrap_or(config.navigation.default_mode)
}

/// Load the graph and assemble the shared navigation context.
fn build_navigator(config: &NaukaConfig) -> Result<Navigator> {
    let graph = io::load_graph(&config.graph.nodes_path, &config.graph.adjacency_path)?;
    info!(
        "Graph loaded: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    let engine = config.obstacle_engine()?;
    let ctx = NavContext::new(
        Arc::new(graph),
        Arc::new(CostModel::new(config.cost.clone())),
        Arc::new(engine),
    );
    Ok(Navigator::new(ctx, config.session_config()))
}

/// Run one live transit until it finishes or Ctrl-C cancels it.
async fn navigate(config: &NaukaConfig, endpoints: &Endpoints, poll_ms: Option<u64>) -> Result<()> {
    let mut navigator = build_navigator(config)?;
    if let Some(ms) = poll_ms {
        let mut session_config = navigator.config().clone();
        session_config.poll_interval = Duration::from_millis(ms);
        navigator = Navigator::new(navigator.context().clone(), session_config);
    }

    let session = navigator.begin_transit(TransitRequest {
        start: endpoints.start,
        goal: endpoints.goal,
        mode: mode_or_default(config, endpoints),
    });

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, cancelling transit");
            ctrl_c.cancel();
        }
    });

    let (handle, mut events) = session::spawn(session, cancel, EVENT_BUFFER);
    while let Some(event) = events.recv().await {
        println!("{}", serde_json::to_string(&event)?);
    }

    let state = handle
        .await
        .map_err(|e| NaukaError::Runtime(format!("session task failed: {}", e)))?;
    match state {
        SessionState::Arrived => info!("Transit complete"),
        SessionState::Failed(reason) => warn!("Transit ended: {}", reason),
        other => warn!("Transit stopped in state {:?}", other),
    }
    Ok(())
}

fn check_obstacles(config: &NaukaConfig, points: &[LatLon]) -> Result<()> {
    let engine = config.obstacle_engine()?;
    let ctx = NavContext::new(
        Arc::new(GeoGraph::default()),
        Arc::new(CostModel::new(config.cost.clone())),
        Arc::new(engine),
    );
    let navigator = Navigator::new(ctx, config.session_config());

    let results: Vec<_> = points
        .iter()
        .zip(navigator.batch_check(points))
        .map(|(point, blocked)| json!({ "lat": point.lat, "lon": point.lon, "is_blocked": blocked }))
        .collect();
    print_json(&json!({ "results": results }))
}

fn build_graph(config: &NaukaConfig, spec: &LatticeSpec) -> Result<()> {
    if spec.resolution_deg <= 0.0 || spec.lat_max < spec.lat_min || spec.lon_max < spec.lon_min {
        return Err(NaukaError::Config(format!("invalid lattice bounds: {:?}", spec)));
    }

    let rules = config.rule_layer();
    let land = (!rules.is_empty()).then_some(&rules);
    let graph = GeoGraph::lattice(spec, land)?;

    io::save_graph(
        &graph,
        Path::new(&config.graph.nodes_path),
        Path::new(&config.graph.adjacency_path),
    )?;
    info!(
        "Wrote {} nodes and {} edges to {} / {}",
        graph.node_count(),
        graph.edge_count(),
        config.graph.nodes_path,
        config.graph.adjacency_path
    );
    Ok(())
}

fn compare(config: &NaukaConfig, layout: DemoLayout) -> Result<()> {
    let grid = RasterGrid::new(layout.layers())?;
    let currents = CurrentField::gyre(grid.width(), grid.height());
    let costs = CostModel::new(config.cost.clone()).with_currents(Arc::new(currents));

    info!("Comparing cost modes on '{}': {}", layout, layout.description());
    let routes = compare_modes(&grid, &costs, layout.start(), layout.goal(), &CostMode::ALL)?;

    print_json(&json!({
        "layout": layout.name(),
        "start": layout.start(),
        "goal": layout.goal(),
        "routes": routes,
    }))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

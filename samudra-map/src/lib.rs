//! # Samudra-Map: Vessel Routing and Rerouting Library
//!
//! Plans and maintains a route for a vessel across a discretized navigable
//! space, under obstacles that can appear mid-transit and under one of
//! several optimization objectives.
//!
//! ## Features
//!
//! - **Two navigable spaces**: sparse geodetic graphs (haversine edges) and
//!   dense rasters with land, hazard and distance-to-land layers
//! - **Cost modes**: plain distance, current-assisted `fastest`,
//!   `fuel_efficient` and `coastal`
//! - **Search**: A* and Dijkstra over one shared contract, deterministic ties
//! - **Obstacle oracle**: rule layer (land mask, restricted zones) in front of
//!   a pluggable learned layer that fails open
//! - **Rerouting**: blocked nodes are hidden by a per-call filtered view; the
//!   base graph is never mutated
//! - **Sessions**: a step-driven state machine plus a tokio driver streaming
//!   typed events
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use samudra_map::core::LatLon;
//! use samudra_map::cost::{CostMode, CostModel};
//! use samudra_map::graph::{GeoGraph, LatticeSpec};
//! use samudra_map::navigator::Navigator;
//! use samudra_map::oracle::{ObstacleEngine, RuleLayer};
//! use samudra_map::session::{NavContext, SessionConfig};
//!
//! let graph = GeoGraph::lattice(
//!     &LatticeSpec { lat_min: 10.0, lat_max: 12.0, lon_min: 70.0, lon_max: 75.0, resolution_deg: 0.1 },
//!     None,
//! )?;
//! let ctx = NavContext::new(
//!     Arc::new(graph),
//!     Arc::new(CostModel::default()),
//!     Arc::new(ObstacleEngine::new(RuleLayer::new())),
//! );
//! let navigator = Navigator::new(ctx, SessionConfig::default());
//! let report = navigator.simulate(
//!     LatLon::new(10.0, 70.0),
//!     LatLon::new(12.0, 75.0),
//!     CostMode::PlainDistance,
//! )?;
//! println!("{}: {:?} km", report.status, report.distance_km);
//! # Ok::<(), samudra_map::MapError>(())
//! ```
//!
//! ## Data Flow
//!
//! ```text
//!   endpoints ──► nearest_node ──► search (A* / Dijkstra, CostModel)
//!                                        │
//!                                        ▼
//!                        ReroutePlanner (scan path with oracle,
//!                                        │  hide blocked, search again)
//!                                        ▼
//!                        NavigationSession ──► NavEvent stream
//!                          (poll oracle per node, replan on obstacle)
//! ```
//!
//! ## Modules
//!
//! - [`core`]: positions, haversine, nodes and edges
//! - [`graph`]: the [`graph::NavigableSpace`] contract and its realizations
//! - [`cost`]: cost modes and the current field
//! - [`search`]: A* and Dijkstra
//! - [`oracle`]: obstacle oracle layers
//! - [`reroute`]: obstacle-aware replanning
//! - [`session`]: navigation session and async driver
//! - [`navigator`]: one-shot services and mode comparison
//! - [`io`]: graph persistence

pub mod core;
pub mod cost;
pub mod error;
pub mod graph;
pub mod io;
pub mod navigator;
pub mod oracle;
pub mod reroute;
pub mod search;
pub mod session;

pub use error::{MapError, OracleError, Result};

pub use cost::{CostMode, CostModel, CostParams};
pub use graph::{GeoGraph, NavigableSpace, RasterGrid};
pub use navigator::Navigator;
pub use oracle::{ObstacleEngine, ObstacleOracle};
pub use reroute::{ReroutePlanner, RouteStatus};
pub use search::{Algorithm, PathResult};
pub use session::{NavEvent, NavigationSession, SessionConfig};

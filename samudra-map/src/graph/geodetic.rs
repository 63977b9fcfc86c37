//! Sparse geodetic graph with haversine edge weights.

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::{Cell, Edge, LatLon, Node, NodeId, haversine_km};
use crate::error::{MapError, Result};
use crate::oracle::RuleLayer;

use super::NavigableSpace;

/// Bounds and resolution of a regular lat/lon lattice.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatticeSpec {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
    /// Spacing between lattice points (degrees)
    pub resolution_deg: f64,
}

impl LatticeSpec {
    /// Number of latitude rows and longitude columns
    pub fn dimensions(&self) -> (usize, usize) {
        let rows = ((self.lat_max - self.lat_min) / self.resolution_deg).round() as usize + 1;
        let cols = ((self.lon_max - self.lon_min) / self.resolution_deg).round() as usize + 1;
        (rows, cols)
    }
}

/// Geodetic navigation graph: node table plus directed adjacency lists.
#[derive(Clone, Debug, Default)]
pub struct GeoGraph {
    /// Nodes in load order
    nodes: Vec<Node>,
    /// Node id -> index into `nodes`
    index: HashMap<NodeId, usize>,
    /// Node id -> outgoing edges
    adjacency: HashMap<NodeId, Vec<Edge>>,
}

impl GeoGraph {
    /// Build a graph from a node table and adjacency lists.
    ///
    /// Fails with `GraphDataMissing` if either input is empty. Edges that
    /// reference unknown nodes are dropped.
    pub fn new(nodes: Vec<Node>, adjacency: HashMap<NodeId, Vec<Edge>>) -> Result<Self> {
        if nodes.is_empty() {
            return Err(MapError::GraphDataMissing("node table is empty".into()));
        }
        if adjacency.is_empty() {
            return Err(MapError::GraphDataMissing("adjacency is empty".into()));
        }

        let index: HashMap<NodeId, usize> =
            nodes.iter().enumerate().map(|(i, n)| (n.id, i)).collect();

        let mut dropped = 0usize;
        let adjacency = adjacency
            .into_iter()
            .filter(|(from, _)| index.contains_key(from))
            .map(|(from, edges)| {
                let before = edges.len();
                let kept: Vec<Edge> = edges
                    .into_iter()
                    .filter(|e| index.contains_key(&e.to))
                    .collect();
                dropped += before - kept.len();
                (from, kept)
            })
            .collect();

        if dropped > 0 {
            debug!("[GeoGraph] dropped {} edges to unknown nodes", dropped);
        }

        Ok(Self {
            nodes,
            index,
            adjacency,
        })
    }

    /// Build a regular lat/lon lattice.
    ///
    /// Ids are assigned row-major (latitude outer, longitude inner). Points
    /// inside the land mask of `land` are skipped. Each node links to its
    /// lattice neighbors (up to 8) with great-circle distances.
    pub fn lattice(spec: &LatticeSpec, land: Option<&RuleLayer>) -> Result<Self> {
        let (rows, cols) = spec.dimensions();
        let mut nodes = Vec::with_capacity(rows * cols);
        let mut by_cell: HashMap<Cell, NodeId> = HashMap::with_capacity(rows * cols);

        let mut next_id: NodeId = 0;
        for i in 0..rows {
            let lat = spec.lat_min + i as f64 * spec.resolution_deg;
            for j in 0..cols {
                let lon = spec.lon_min + j as f64 * spec.resolution_deg;
                let position = LatLon::new(lat, lon);
                if land.is_some_and(|rules| rules.is_land(position)) {
                    continue;
                }
                let cell = Cell::new(i as i32, j as i32);
                nodes.push(Node::new(next_id, position).with_cell(cell));
                by_cell.insert(cell, next_id);
                next_id += 1;
            }
        }

        let mut adjacency: HashMap<NodeId, Vec<Edge>> = HashMap::with_capacity(nodes.len());
        for node in &nodes {
            let Some(cell) = node.cell else { continue };
            let edges = adjacency.entry(node.id).or_default();
            for neighbor_cell in cell.neighbors_8() {
                if let Some(&neighbor_id) = by_cell.get(&neighbor_cell) {
                    let neighbor = &nodes[neighbor_id as usize];
                    let d = haversine_km(
                        node.position.lat,
                        node.position.lon,
                        neighbor.position.lat,
                        neighbor.position.lon,
                    );
                    edges.push(Edge::new(neighbor_id, d));
                }
            }
        }

        debug!(
            "[GeoGraph] lattice {}x{}: {} water nodes",
            rows,
            cols,
            nodes.len()
        );

        Self::new(nodes, adjacency)
    }

    /// Total number of directed edges
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    /// Adjacency lists (for persistence)
    pub fn adjacency(&self) -> &HashMap<NodeId, Vec<Edge>> {
        &self.adjacency
    }

    /// Node with the smallest id
    pub fn min_id(&self) -> Option<NodeId> {
        self.nodes.iter().map(|n| n.id).min()
    }

    /// Node with the largest id
    pub fn max_id(&self) -> Option<NodeId> {
        self.nodes.iter().map(|n| n.id).max()
    }
}

impl NavigableSpace for GeoGraph {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    fn nodes(&self) -> Box<dyn Iterator<Item = &Node> + '_> {
        Box::new(self.nodes.iter())
    }

    fn neighbors(&self, id: NodeId) -> Vec<Edge> {
        self.adjacency.get(&id).cloned().unwrap_or_default()
    }

    fn heuristic(&self, from: &Node, to: &Node) -> f64 {
        from.position.distance_km(&to.position)
    }
}

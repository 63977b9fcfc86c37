//! Graph persistence as JSON.
//!
//! Nodes file:
//!
//! ```json
//! [{"id": 0, "lat": 10.0, "lon": 70.0, "i": 0, "j": 0}, ...]
//! ```
//!
//! Adjacency file, keyed by node id:
//!
//! ```json
//! {"0": [[1, 5.47], [11, 5.56]], ...}
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::core::{Cell, Edge, LatLon, Node, NodeId};
use crate::error::{MapError, Result};
use crate::graph::{GeoGraph, NavigableSpace};

#[derive(Debug, Serialize, Deserialize)]
struct NodeRecord {
    id: NodeId,
    lat: f64,
    lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    i: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    j: Option<i32>,
}

impl From<NodeRecord> for Node {
    fn from(r: NodeRecord) -> Self {
        let node = Node::new(r.id, LatLon::new(r.lat, r.lon));
        match (r.i, r.j) {
            (Some(i), Some(j)) => node.with_cell(Cell::new(i, j)),
            _ => node,
        }
    }
}

impl From<&Node> for NodeRecord {
    fn from(n: &Node) -> Self {
        Self {
            id: n.id,
            lat: n.position.lat,
            lon: n.position.lon,
            i: n.cell.map(|c| c.i),
            j: n.cell.map(|c| c.j),
        }
    }
}

type AdjacencyRecord = HashMap<NodeId, Vec<(NodeId, f64)>>;

/// Load a graph from a nodes file and an adjacency file.
///
/// Fails with `GraphDataMissing` if either file is absent or empty.
pub fn load_graph(nodes_path: impl AsRef<Path>, adjacency_path: impl AsRef<Path>) -> Result<GeoGraph> {
    let nodes_path = nodes_path.as_ref();
    let adjacency_path = adjacency_path.as_ref();

    let records: Vec<NodeRecord> = read_json(nodes_path)?;
    let adjacency: AdjacencyRecord = read_json(adjacency_path)?;

    let nodes: Vec<Node> = records.into_iter().map(Node::from).collect();
    let adjacency = adjacency
        .into_iter()
        .map(|(from, edges)| {
            let edges = edges
                .into_iter()
                .map(|(to, distance)| Edge::new(to, distance))
                .collect();
            (from, edges)
        })
        .collect();

    let graph = GeoGraph::new(nodes, adjacency)?;
    info!(
        "[io] loaded {} nodes, {} edges from {}",
        graph.node_count(),
        graph.edge_count(),
        nodes_path.display()
    );
    Ok(graph)
}

/// Write a graph as a nodes file and an adjacency file.
pub fn save_graph(
    graph: &GeoGraph,
    nodes_path: impl AsRef<Path>,
    adjacency_path: impl AsRef<Path>,
) -> Result<()> {
    let records: Vec<NodeRecord> = graph.nodes().map(NodeRecord::from).collect();
    let adjacency: AdjacencyRecord = graph
        .adjacency()
        .iter()
        .map(|(from, edges)| (*from, edges.iter().map(|e| (e.to, e.distance)).collect()))
        .collect();

    write_json(nodes_path.as_ref(), &records)?;
    write_json(adjacency_path.as_ref(), &adjacency)?;
    Ok(())
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            MapError::GraphDataMissing(format!("{} not found", path.display()))
        }
        _ => MapError::Io(e),
    })?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

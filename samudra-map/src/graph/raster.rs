//! Dense raster navigable space with 8-connected neighbors.

use serde::{Deserialize, Serialize};

use crate::core::{Cell, Edge, LatLon, Node, NodeId};
use crate::error::{MapError, Result};

use super::NavigableSpace;
use super::distance_field::distance_to_land;

/// Row-major raster layers describing a water/land environment.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RasterLayers {
    pub width: usize,
    pub height: usize,
    /// True where the cell is land
    pub land: Vec<bool>,
    /// True where the cell is hazardous (bad weather, shoals). Empty means none.
    #[serde(default)]
    pub hazard: Vec<bool>,
}

impl RasterLayers {
    /// All-water layers of the given size
    pub fn open_water(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            land: vec![false; width * height],
            hazard: Vec::new(),
        }
    }

    /// Build layers from nested rows (`rows[r][c]`, non-zero = set)
    pub fn from_rows(land: &[Vec<u8>], hazard: Option<&[Vec<u8>]>) -> Result<Self> {
        let height = land.len();
        let width = land.first().map(Vec::len).unwrap_or(0);
        let flatten = |rows: &[Vec<u8>], name: &str| -> Result<Vec<bool>> {
            if rows.len() != height || rows.iter().any(|r| r.len() != width) {
                return Err(MapError::InvalidGrid(format!(
                    "{} grid is not {}x{}",
                    name, height, width
                )));
            }
            Ok(rows.iter().flatten().map(|&v| v != 0).collect())
        };

        Ok(Self {
            width,
            height,
            land: flatten(land, "land")?,
            hazard: match hazard {
                Some(rows) => flatten(rows, "hazard")?,
                None => Vec::new(),
            },
        })
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    /// Mark a cell as land
    pub fn set_land(&mut self, row: usize, col: usize, value: bool) {
        let idx = self.index(row, col);
        self.land[idx] = value;
    }

    /// Mark a cell as hazardous
    pub fn set_hazard(&mut self, row: usize, col: usize, value: bool) {
        if self.hazard.is_empty() {
            self.hazard = vec![false; self.width * self.height];
        }
        let idx = self.index(row, col);
        self.hazard[idx] = value;
    }
}

/// Raster environment as a navigable space.
///
/// Node id is `row * width + col`. Every in-bounds cell is a node, land
/// included; the cost model makes land impassable. Base distances and the
/// heuristic are Euclidean, in cell units.
#[derive(Clone, Debug)]
pub struct RasterGrid {
    width: usize,
    height: usize,
    nodes: Vec<Node>,
    /// Position of cell (0, 0)
    origin: LatLon,
    /// Cell spacing in degrees
    cell_size_deg: f64,
}

impl RasterGrid {
    /// Build a raster georeferenced at the origin with 1-degree cells.
    pub fn new(layers: RasterLayers) -> Result<Self> {
        Self::georeferenced(layers, LatLon::new(0.0, 0.0), 1.0)
    }

    /// Build a raster whose cell `(row, col)` sits at
    /// `origin + (row, col) * cell_size_deg`.
    pub fn georeferenced(layers: RasterLayers, origin: LatLon, cell_size_deg: f64) -> Result<Self> {
        let RasterLayers {
            width,
            height,
            land,
            hazard,
        } = layers;

        let cells = width * height;
        if cells == 0 {
            return Err(MapError::GraphDataMissing("raster has no cells".into()));
        }
        if land.len() != cells {
            return Err(MapError::InvalidGrid(format!(
                "land layer has {} cells, expected {}",
                land.len(),
                cells
            )));
        }
        if !hazard.is_empty() && hazard.len() != cells {
            return Err(MapError::InvalidGrid(format!(
                "hazard layer has {} cells, expected {}",
                hazard.len(),
                cells
            )));
        }
        if cell_size_deg <= 0.0 {
            return Err(MapError::InvalidGrid("cell size must be positive".into()));
        }

        let distances = distance_to_land(&land, width, height);

        let nodes = (0..cells)
            .map(|idx| {
                let (row, col) = (idx / width, idx % width);
                let position = LatLon::new(
                    origin.lat + row as f64 * cell_size_deg,
                    origin.lon + col as f64 * cell_size_deg,
                );
                let mut node = Node::new(idx as NodeId, position)
                    .with_cell(Cell::new(row as i32, col as i32))
                    .with_land(land[idx])
                    .with_hazard(hazard.get(idx).copied().unwrap_or(false));
                if let Some(d) = &distances {
                    node = node.with_distance_to_land(d[idx]);
                }
                node
            })
            .collect();

        Ok(Self {
            width,
            height,
            nodes,
            origin,
            cell_size_deg,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Node id of a cell, if in bounds
    #[inline]
    pub fn id_of(&self, cell: Cell) -> Option<NodeId> {
        if self.is_valid(cell) {
            Some(cell.i as NodeId * self.width as NodeId + cell.j as NodeId)
        } else {
            None
        }
    }

    /// Cell of a node id, if in bounds
    #[inline]
    pub fn cell_of(&self, id: NodeId) -> Option<Cell> {
        self.node(id).and_then(|n| n.cell)
    }

    #[inline]
    pub fn is_valid(&self, cell: Cell) -> bool {
        cell.i >= 0 && cell.j >= 0 && (cell.i as usize) < self.height && (cell.j as usize) < self.width
    }

    /// Geodetic position of a cell (may lie outside the raster)
    pub fn cell_position(&self, cell: Cell) -> LatLon {
        LatLon::new(
            self.origin.lat + cell.i as f64 * self.cell_size_deg,
            self.origin.lon + cell.j as f64 * self.cell_size_deg,
        )
    }
}

impl NavigableSpace for RasterGrid {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id as usize)
    }

    fn nodes(&self) -> Box<dyn Iterator<Item = &Node> + '_> {
        Box::new(self.nodes.iter())
    }

    fn neighbors(&self, id: NodeId) -> Vec<Edge> {
        let Some(cell) = self.cell_of(id) else {
            return Vec::new();
        };
        cell.neighbors_8()
            .into_iter()
            .filter_map(|n| self.id_of(n).map(|to| Edge::new(to, cell.euclidean(&n))))
            .collect()
    }

    fn heuristic(&self, from: &Node, to: &Node) -> f64 {
        match (from.cell, to.cell) {
            (Some(a), Some(b)) => a.euclidean(&b),
            _ => 0.0,
        }
    }
}

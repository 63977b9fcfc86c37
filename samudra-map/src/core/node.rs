//! Graph node and edge types.

use serde::{Deserialize, Serialize};

use super::geodesy::LatLon;

/// Node identity, stable for the lifetime of a graph snapshot.
pub type NodeId = u32;

/// Raster cell index of a node (row `i`, column `j`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    /// Row index
    pub i: i32,
    /// Column index
    pub j: i32,
}

impl Cell {
    /// Create a new cell index
    #[inline]
    pub fn new(i: i32, j: i32) -> Self {
        Self { i, j }
    }

    /// Euclidean distance to another cell, in cells
    #[inline]
    pub fn euclidean(&self, other: &Cell) -> f64 {
        let di = (other.i - self.i) as f64;
        let dj = (other.j - self.j) as f64;
        (di * di + dj * dj).sqrt()
    }

    /// The 8 surrounding cells (4 cardinal first, then diagonals)
    #[inline]
    pub fn neighbors_8(&self) -> [Cell; 8] {
        [
            Cell::new(self.i - 1, self.j),
            Cell::new(self.i + 1, self.j),
            Cell::new(self.i, self.j - 1),
            Cell::new(self.i, self.j + 1),
            Cell::new(self.i - 1, self.j - 1),
            Cell::new(self.i - 1, self.j + 1),
            Cell::new(self.i + 1, self.j - 1),
            Cell::new(self.i + 1, self.j + 1),
        ]
    }
}

/// A position in navigable space. Immutable once constructed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub position: LatLon,
    /// Raster cell, when the node comes from a gridded source
    pub cell: Option<Cell>,
    /// Land cells are impassable in every cost mode
    pub is_land: bool,
    /// Hazard cells carry a fixed penalty
    pub is_hazard: bool,
    /// Distance to the nearest land (cell units for rasters)
    pub distance_to_land: Option<f64>,
}

impl Node {
    /// Plain water node with no raster attributes
    pub fn new(id: NodeId, position: LatLon) -> Self {
        Self {
            id,
            position,
            cell: None,
            is_land: false,
            is_hazard: false,
            distance_to_land: None,
        }
    }

    pub fn with_cell(mut self, cell: Cell) -> Self {
        self.cell = Some(cell);
        self
    }

    pub fn with_land(mut self, is_land: bool) -> Self {
        self.is_land = is_land;
        self
    }

    pub fn with_hazard(mut self, is_hazard: bool) -> Self {
        self.is_hazard = is_hazard;
        self
    }

    pub fn with_distance_to_land(mut self, distance: f64) -> Self {
        self.distance_to_land = Some(distance);
        self
    }
}

/// Directed adjacency entry with its precomputed base distance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub to: NodeId,
    /// Great-circle km for geodetic graphs, cells for rasters
    pub distance: f64,
}

impl Edge {
    #[inline]
    pub fn new(to: NodeId, distance: f64) -> Self {
        Self { to, distance }
    }
}

//! Surface current field for the current-aware cost modes.

use serde::{Deserialize, Serialize};

use crate::core::Cell;
use crate::error::{MapError, Result};

/// Local flow at a cell, along the raster (row, col) axes.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct CurrentVector {
    /// Component along increasing row index
    pub u: f64,
    /// Component along increasing column index
    pub v: f64,
}

impl CurrentVector {
    #[inline]
    pub fn new(u: f64, v: f64) -> Self {
        Self { u, v }
    }

    #[inline]
    pub fn dot(&self, other: &CurrentVector) -> f64 {
        self.u * other.u + self.v * other.v
    }

    #[inline]
    pub fn magnitude(&self) -> f64 {
        (self.u * self.u + self.v * self.v).sqrt()
    }

    /// Unit vector in the same direction (zero stays zero)
    #[inline]
    pub fn normalized(&self) -> CurrentVector {
        let m = self.magnitude();
        if m > 0.0 {
            CurrentVector::new(self.u / m, self.v / m)
        } else {
            CurrentVector::default()
        }
    }
}

/// Row-major per-cell current vectors, indexed like the raster nodes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CurrentField {
    width: usize,
    height: usize,
    u: Vec<f64>,
    v: Vec<f64>,
}

impl CurrentField {
    /// Build a field from row-major component layers
    pub fn new(width: usize, height: usize, u: Vec<f64>, v: Vec<f64>) -> Result<Self> {
        let cells = width * height;
        if u.len() != cells || v.len() != cells {
            return Err(MapError::InvalidGrid(format!(
                "current layers have {}/{} cells, expected {}",
                u.len(),
                v.len(),
                cells
            )));
        }
        Ok(Self {
            width,
            height,
            u,
            v,
        })
    }

    /// Uniform flow everywhere
    pub fn uniform(width: usize, height: usize, flow: CurrentVector) -> Self {
        Self {
            width,
            height,
            u: vec![flow.u; width * height],
            v: vec![flow.v; width * height],
        }
    }

    /// Demonstration double-gyre pattern centered on the raster:
    /// `u = -(y - cy)*0.05 + sin(x/10)`, `v = (x - cx)*0.05 + cos(y/10)`
    /// with `y` the row and `x` the column.
    pub fn gyre(width: usize, height: usize) -> Self {
        let cy = (height / 2) as f64;
        let cx = (width / 2) as f64;
        let mut u = Vec::with_capacity(width * height);
        let mut v = Vec::with_capacity(width * height);
        for row in 0..height {
            let y = row as f64;
            for col in 0..width {
                let x = col as f64;
                u.push(-(y - cy) * 0.05 + (x / 10.0).sin());
                v.push((x - cx) * 0.05 + (y / 10.0).cos());
            }
        }
        Self {
            width,
            height,
            u,
            v,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Flow at a cell, None when out of bounds
    #[inline]
    pub fn at(&self, cell: Cell) -> Option<CurrentVector> {
        if cell.i < 0 || cell.j < 0 {
            return None;
        }
        let (row, col) = (cell.i as usize, cell.j as usize);
        if row >= self.height || col >= self.width {
            return None;
        }
        let idx = row * self.width + col;
        Some(CurrentVector::new(self.u[idx], self.v[idx]))
    }
}

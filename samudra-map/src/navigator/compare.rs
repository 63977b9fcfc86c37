//! Side-by-side routes under several cost modes.

use log::debug;
use serde::Serialize;

use crate::core::Cell;
use crate::cost::{CostMode, CostModel};
use crate::error::{MapError, Result};
use crate::graph::RasterGrid;
use crate::search::astar;

/// Route found under one cost mode
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ModeRoute {
    pub mode: CostMode,
    /// Cells from start to goal, empty when no route exists
    pub path: Vec<Cell>,
    /// Total cost under `mode`, None when no route exists
    pub cost: Option<f64>,
}

/// Run A* from `start` to `goal` once per mode, in the given order.
///
/// Fails if either endpoint lies outside the raster.
pub fn compare_modes(
    grid: &RasterGrid,
    costs: &CostModel,
    start: Cell,
    goal: Cell,
    modes: &[CostMode],
) -> Result<Vec<ModeRoute>> {
    let cell_id = |cell: Cell| {
        grid.id_of(cell).ok_or_else(|| {
            MapError::InvalidGrid(format!(
                "cell ({}, {}) outside {}x{} raster",
                cell.i,
                cell.j,
                grid.height(),
                grid.width()
            ))
        })
    };
    let (start_id, goal_id) = (cell_id(start)?, cell_id(goal)?);

    let routes = modes
        .iter()
        .map(|&mode| {
            let result = astar(grid, costs, start_id, goal_id, mode);
            debug!(
                "[compare] {}: success={} cost={:.2} expanded={}",
                mode, result.success, result.cost, result.nodes_expanded
            );
            ModeRoute {
                mode,
                path: result
                    .path
                    .iter()
                    .filter_map(|id| grid.cell_of(*id))
                    .collect(),
                cost: result.success.then_some(result.cost),
            }
        })
        .collect();

    Ok(routes)
}

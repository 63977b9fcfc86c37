//! Built-in raster layouts for mode comparison.

use std::fmt;
use std::str::FromStr;

use crate::core::Cell;
use crate::graph::RasterLayers;

const SIZE: usize = 60;

/// Island centers of the archipelago layout (row, col)
const ISLANDS: [(usize, usize); 15] = [
    (50, 12),
    (11, 17),
    (14, 40),
    (27, 24),
    (43, 31),
    (20, 48),
    (35, 13),
    (47, 46),
    (31, 38),
    (22, 30),
    (38, 50),
    (15, 27),
    (45, 21),
    (29, 47),
    (37, 27),
];

/// Demonstration environments (60 x 60 cells)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DemoLayout {
    /// Two land masses with a narrow strait between rows 20 and 40
    Strait,
    /// Fifteen small islands plus a storm cell in the north-west
    Archipelago,
}

impl DemoLayout {
    pub const ALL: [DemoLayout; 2] = [DemoLayout::Strait, DemoLayout::Archipelago];

    pub fn name(&self) -> &'static str {
        match self {
            DemoLayout::Strait => "strait",
            DemoLayout::Archipelago => "archipelago",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DemoLayout::Strait => "Navigate through a narrow strait with strong currents",
            DemoLayout::Archipelago => "Complex island chain with storm potential",
        }
    }

    pub fn start(&self) -> Cell {
        match self {
            DemoLayout::Strait => Cell::new(10, 5),
            DemoLayout::Archipelago => Cell::new(30, 5),
        }
    }

    pub fn goal(&self) -> Cell {
        match self {
            DemoLayout::Strait => Cell::new(10, 55),
            DemoLayout::Archipelago => Cell::new(30, 55),
        }
    }

    pub fn layers(&self) -> RasterLayers {
        let mut layers = RasterLayers::open_water(SIZE, SIZE);
        match self {
            DemoLayout::Strait => {
                for row in (0..SIZE).filter(|r| *r < 20 || *r > 40) {
                    for col in 21..40 {
                        layers.set_land(row, col, true);
                    }
                }
            }
            DemoLayout::Archipelago => {
                for &(cr, cc) in &ISLANDS {
                    for row in cr.saturating_sub(3)..(cr + 3).min(SIZE) {
                        for col in cc.saturating_sub(3)..(cc + 3).min(SIZE) {
                            layers.set_land(row, col, true);
                        }
                    }
                }
                for row in 10..20 {
                    for col in 10..20 {
                        layers.set_hazard(row, col, true);
                    }
                }
            }
        }
        layers
    }
}

impl fmt::Display for DemoLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DemoLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strait" | "1" => Ok(DemoLayout::Strait),
            "archipelago" | "2" => Ok(DemoLayout::Archipelago),
            other => Err(format!("unknown demo '{}'", other)),
        }
    }
}

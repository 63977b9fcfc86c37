//! Command line interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use samudra_map::CostMode;
use samudra_map::core::LatLon;
use samudra_map::navigator::DemoLayout;

/// Vessel navigation controller
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (defaults to ./nauka.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Plan a route ignoring dynamic obstacles
    Route(Endpoints),

    /// Plan once with obstacle rerouting
    Simulate(Endpoints),

    /// Run a live transit, printing one JSON event per line
    Navigate {
        #[command(flatten)]
        endpoints: Endpoints,

        /// Override the poll interval in milliseconds
        #[arg(long)]
        poll_ms: Option<u64>,
    },

    /// Obstacle verdicts for one or more positions
    Obstacle {
        /// Positions as "lat,lon"
        #[arg(required = true, value_parser = parse_point, allow_hyphen_values = true)]
        points: Vec<LatLon>,
    },

    /// Build a lattice graph and write it to the configured graph files
    BuildGraph {
        #[arg(long, allow_hyphen_values = true)]
        lat_min: f64,
        #[arg(long, allow_hyphen_values = true)]
        lat_max: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon_min: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon_max: f64,
        /// Lattice spacing in degrees
        #[arg(long, default_value_t = 0.1)]
        resolution: f64,
    },

    /// Compare cost modes on a built-in raster layout
    Compare {
        /// Layout name ("strait" or "archipelago")
        #[arg(default_value = "strait")]
        layout: DemoLayout,
    },
}

/// Start, goal and cost mode of a query
#[derive(clap::Args, Debug, Clone, Copy)]
pub struct Endpoints {
    /// Start position as "lat,lon"
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    pub start: LatLon,

    /// Goal position as "lat,lon"
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    pub goal: LatLon,

    /// fastest, fuel_efficient, coastal or plain_distance
    #[arg(long)]
    pub mode: Option<CostMode>,
}

/// Parse "lat,lon" in decimal degrees
pub fn parse_point(s: &str) -> Result<LatLon, String> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| format!("expected \"lat,lon\", got '{}'", s))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude '{}'", lat.trim()))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude '{}'", lon.trim()))?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(format!("position out of range: {}, {}", lat, lon));
    }
    Ok(LatLon::new(lat, lon))
}

//! Core types shared by every module:
//! - [`LatLon`] and [`haversine_km`]: geodetic positions and distances
//! - [`Node`], [`Edge`], [`Cell`]: navigable space primitives

mod geodesy;
mod node;

pub use geodesy::{EARTH_RADIUS_KM, LatLon, haversine_km};
pub use node::{Cell, Edge, Node, NodeId};

//! Error types for samudra-map.
//!
//! Only missing prerequisite data is an error. Unreachable goals and failed
//! reroutes are reported as statuses on the result types instead.

use std::time::Duration;

use thiserror::Error;

use crate::core::NodeId;

/// Errors raised by graph construction, loading and queries.
#[derive(Error, Debug)]
pub enum MapError {
    #[error("Graph data missing: {0}")]
    GraphDataMissing(String),

    #[error("Graph has no nodes")]
    EmptyGraph,

    #[error("Unknown node id {0}")]
    UnknownNode(NodeId),

    #[error("Invalid raster: {0}")]
    InvalidGrid(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for MapError {
    fn from(e: serde_json::Error) -> Self {
        MapError::Parse(e.to_string())
    }
}

/// Failures at the obstacle oracle boundary.
///
/// These never escape an oracle: every variant degrades to "not blocked".
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OracleError {
    #[error("Learned layer unavailable: {0}")]
    Unavailable(String),

    #[error("Learned layer timed out after {0:?}")]
    Timeout(Duration),

    #[error("Malformed obstacle response: {0}")]
    MalformedResponse(String),
}

pub type Result<T> = std::result::Result<T, MapError>;

//! Error types for NaukaNav

use samudra_map::MapError;
use thiserror::Error;

/// NaukaNav error type
#[derive(Error, Debug)]
pub enum NaukaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Map error: {0}")]
    Map(#[from] MapError),

    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl From<toml::de::Error> for NaukaError {
    fn from(e: toml::de::Error) -> Self {
        NaukaError::Config(e.to_string())
    }
}

impl From<serde_json::Error> for NaukaError {
    fn from(e: serde_json::Error) -> Self {
        NaukaError::Runtime(format!("failed to encode output: {}", e))
    }
}

pub type Result<T> = std::result::Result<T, NaukaError>;
